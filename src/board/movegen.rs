//! Move generation.
//!
//! Pseudo-legal attack sets come straight from the static tables (magic
//! lookups for sliders, per-square tables for the rest, blocker-gated pushes
//! for pawns). King destinations are additionally filtered against the
//! opponent's combined attack set. A post-generation validator then applies
//! each candidate, tests the mover's own king against the opponent's attacks,
//! and undoes it; this is what removes pinned-piece moves, discovered checks,
//! and king steps along an attacker's ray.

use super::error::StateCorruptionError;
use super::tables::Tables;
use super::types::{Bitboard, Color, Move, Piece, Square};
use super::Board;

impl Board {
    /// Pseudo-legal attack set of one piece standing on `sq`, against the
    /// current full occupancy.
    pub(crate) fn piece_attacks(
        &self,
        tables: &Tables,
        piece: Piece,
        color: Color,
        sq: Square,
    ) -> Bitboard {
        match piece {
            Piece::Pawn => tables.pawn_attack(color, sq),
            Piece::Knight => tables.knight_attacks[sq.index() as usize],
            Piece::King => tables.king_attacks[sq.index() as usize],
            Piece::Bishop => tables.bishop_attacks(sq, self.occupancy_all),
            Piece::Rook => tables.rook_attacks(sq, self.occupancy_all),
            Piece::Queen => tables.queen_attacks(sq, self.occupancy_all),
        }
    }

    /// Union of one side's piece attacks: the set of squares that side
    /// threatens. Used both for the opponent's king filter and by the
    /// evaluator's control features.
    #[must_use]
    pub fn attacks(&self, tables: &Tables, color: Color) -> Bitboard {
        self.pieces_of(color)
            .fold(Bitboard::EMPTY, |acc, (sq, piece)| {
                acc | self.piece_attacks(tables, piece, color, sq)
            })
    }

    /// True if `color`'s king currently stands on a square the opponent
    /// attacks.
    #[must_use]
    pub fn in_check(&self, tables: &Tables, color: Color) -> bool {
        self.attacks(tables, color.opponent())
            .contains(self.king_square(color))
    }

    fn piece_type_on(&self, bit: Bitboard) -> Option<Piece> {
        Piece::ALL
            .into_iter()
            .find(|p| !(self.occupancy_type[p.index()] & bit).is_empty())
    }

    /// Pseudo-legal moves for the side to move. Capture flags are set iff the
    /// destination intersects enemy occupancy at generation time.
    fn pseudo_legal_moves(&self, tables: &Tables) -> Vec<Move> {
        let mover = self.side_to_move;
        let own = self.occupancy_color[mover.index()];
        let enemy = self.occupancy_color[mover.opponent().index()];
        let threatened = self.attacks(tables, mover.opponent());

        let mut moves = Vec::with_capacity(48);
        for (from, piece) in self.pieces_of(mover) {
            match piece {
                Piece::Pawn => self.pawn_moves(tables, mover, from, enemy, &mut moves),
                Piece::King => {
                    let targets =
                        self.piece_attacks(tables, piece, mover, from) & !own & !threatened;
                    self.push_targets(from, piece, targets, enemy, &mut moves);
                }
                _ => {
                    let targets = self.piece_attacks(tables, piece, mover, from) & !own;
                    self.push_targets(from, piece, targets, enemy, &mut moves);
                }
            }
        }
        moves
    }

    fn push_targets(
        &self,
        from: Square,
        piece: Piece,
        targets: Bitboard,
        enemy: Bitboard,
        moves: &mut Vec<Move>,
    ) {
        for to in targets.iter() {
            let to_bit = Bitboard::from_square(to);
            let captured = if (to_bit & enemy).is_empty() {
                None
            } else {
                self.piece_type_on(to_bit)
            };
            moves.push(Move {
                from,
                to,
                piece,
                captured,
                promotion: None,
            });
        }
    }

    fn pawn_moves(
        &self,
        tables: &Tables,
        mover: Color,
        from: Square,
        enemy: Bitboard,
        moves: &mut Vec<Move>,
    ) {
        let last_rank = if mover == Color::White { 7 } else { 0 };

        // forward pushes, gated by the square immediately ahead; a blocked
        // single push also rules out the two-square initial push
        let mut pushes = tables.pawn_push(mover, from) & !self.occupancy_all;
        if !pushes.is_empty() {
            pushes |= tables.pawn_double_push(mover, from) & !self.occupancy_all;
        }
        // diagonal captures, gated by enemy occupancy
        let captures = tables.pawn_attack(mover, from) & enemy;

        for to in (pushes | captures).iter() {
            let to_bit = Bitboard::from_square(to);
            let captured = if (to_bit & captures).is_empty() {
                None
            } else {
                self.piece_type_on(to_bit)
            };
            let promotion = (to.rank() == last_rank).then_some(Piece::Queen);
            moves.push(Move {
                from,
                to,
                piece: Piece::Pawn,
                captured,
                promotion,
            });
        }
    }

    /// Legal moves for the side to move: pseudo-legal moves minus any that
    /// leave the mover's own king attacked.
    ///
    /// The corruption error can only fire if generation and state have
    /// diverged; callers abort on it rather than trust the move list.
    pub fn legal_moves(&mut self, tables: &Tables) -> Result<Vec<Move>, StateCorruptionError> {
        let candidates = self.pseudo_legal_moves(tables);
        let mut legal = Vec::with_capacity(candidates.len());
        for mv in candidates {
            self.make_move(tables, mv)?;
            // side_to_move has flipped; the mover is now the opponent
            let safe = !self.in_check(tables, self.side_to_move.opponent());
            self.unmake_move()?;
            if safe {
                legal.push(mv);
            }
        }
        Ok(legal)
    }
}
