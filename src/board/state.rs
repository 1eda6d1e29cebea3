//! Mutable position state.
//!
//! The piece table is a fixed arena: 16 slots per color, each holding either
//! an empty bitboard (captured) or a single-bit bitboard giving the piece's
//! square. A slot's color and original type are assigned once from the
//! initial placement and never move; captures empty a slot in place, and the
//! only way a slot's current type changes is queen promotion.

use std::fmt;

use super::error::StateCorruptionError;
use super::tables::Tables;
use super::types::{Bitboard, Color, Move, Piece, Square};

/// Piece slots per side.
pub const SLOTS_PER_COLOR: usize = 16;
/// Total piece slots.
pub const NUM_SLOTS: usize = 2 * SLOTS_PER_COLOR;

/// Slot offsets within a color's range, fixed by the initial placement.
const KING_SLOT: usize = 15;
#[cfg(test)]
const PAWN_SLOTS: std::ops::Range<usize> = 0..8;

/// Everything needed to reverse one `make_move` exactly.
#[derive(Clone, Copy, Debug)]
pub(crate) struct UndoRecord {
    pub(crate) mv: Move,
    pub(crate) moved_slot: usize,
    /// Slot type before the move (differs from the post-move type only on
    /// promotion).
    pub(crate) piece_before: Piece,
    pub(crate) captured_slot: Option<usize>,
    pub(crate) hash_before: u64,
}

/// The board position: slot table, occupancy bitboards, incremental hash,
/// and the undo history stack.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) side_to_move: Color,
    pub(crate) slots: [Bitboard; NUM_SLOTS],
    pub(crate) slot_piece: [Piece; NUM_SLOTS],
    pub(crate) occupancy_color: [Bitboard; 2],
    pub(crate) occupancy_type: [Bitboard; 6],
    pub(crate) occupancy_all: Bitboard,
    pub(crate) hash: u64,
    pub(crate) history: Vec<UndoRecord>,
}

/// Slot index range owned by a color.
#[inline]
pub(crate) const fn color_range(color: Color) -> std::ops::Range<usize> {
    match color {
        Color::White => 0..SLOTS_PER_COLOR,
        Color::Black => SLOTS_PER_COLOR..NUM_SLOTS,
    }
}

/// Initial (piece, square) for a slot offset within White's range. Black
/// mirrors the square with `flip`.
const fn initial_slot(offset: usize) -> (Piece, Square) {
    match offset {
        0..=7 => (Piece::Pawn, Square::new(1, offset as u8)),
        8 => (Piece::Knight, Square::new(0, 1)),
        9 => (Piece::Knight, Square::new(0, 6)),
        10 => (Piece::Bishop, Square::new(0, 2)),
        11 => (Piece::Bishop, Square::new(0, 5)),
        12 => (Piece::Rook, Square::new(0, 0)),
        13 => (Piece::Rook, Square::new(0, 7)),
        14 => (Piece::Queen, Square::new(0, 3)),
        _ => (Piece::King, Square::new(0, 4)),
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    /// The standard starting position, hashed with the global tables.
    #[must_use]
    pub fn new() -> Self {
        Board::initial(Tables::global())
    }

    /// The standard starting position.
    #[must_use]
    pub fn initial(tables: &Tables) -> Self {
        let mut slots = [Bitboard::EMPTY; NUM_SLOTS];
        let mut slot_piece = [Piece::Pawn; NUM_SLOTS];
        for offset in 0..SLOTS_PER_COLOR {
            let (piece, white_sq) = initial_slot(offset);
            slots[offset] = Bitboard::from_square(white_sq);
            slot_piece[offset] = piece;
            slots[SLOTS_PER_COLOR + offset] = Bitboard::from_square(white_sq.flip());
            slot_piece[SLOTS_PER_COLOR + offset] = piece;
        }

        let mut board = Board {
            side_to_move: Color::White,
            slots,
            slot_piece,
            occupancy_color: [Bitboard::EMPTY; 2],
            occupancy_type: [Bitboard::EMPTY; 6],
            occupancy_all: Bitboard::EMPTY,
            hash: 0,
            history: Vec::new(),
        };
        board.rebuild_occupancies();
        board.hash = board.recompute_hash(tables);
        board
    }

    #[inline]
    #[must_use]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub const fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    #[must_use]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupancy_color[color.index()]
    }

    #[inline]
    #[must_use]
    pub const fn occupancy_all(&self) -> Bitboard {
        self.occupancy_all
    }

    /// All squares occupied by pieces of one type, either color.
    #[inline]
    #[must_use]
    pub fn pieces_by_type(&self, piece: Piece) -> Bitboard {
        self.occupancy_type[piece.index()]
    }

    /// The king's square for a color. The king slot is fixed and a king is
    /// never captured in a reachable state.
    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.slots[color_range(color).start + KING_SLOT].lowest_square()
    }

    /// Piece and owner on a square, if any.
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let bit = Bitboard::from_square(sq);
        if (self.occupancy_all & bit).is_empty() {
            return None;
        }
        let color = if !(self.occupancy_color[0] & bit).is_empty() {
            Color::White
        } else {
            Color::Black
        };
        for piece in Piece::ALL {
            if !(self.occupancy_type[piece.index()] & bit).is_empty() {
                return Some((color, piece));
            }
        }
        None
    }

    /// Live (square, piece) pairs for one side, in slot order.
    pub(crate) fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        color_range(color).filter_map(move |i| {
            let bb = self.slots[i];
            if bb.is_empty() {
                None
            } else {
                Some((bb.lowest_square(), self.slot_piece[i]))
            }
        })
    }

    /// Recompute every occupancy bitboard from the slot table.
    pub(crate) fn rebuild_occupancies(&mut self) {
        self.occupancy_color = [Bitboard::EMPTY; 2];
        self.occupancy_type = [Bitboard::EMPTY; 6];
        for color in [Color::White, Color::Black] {
            for i in color_range(color) {
                let bb = self.slots[i];
                if bb.is_empty() {
                    continue;
                }
                self.occupancy_color[color.index()] |= bb;
                self.occupancy_type[self.slot_piece[i].index()] |= bb;
            }
        }
        self.occupancy_all = self.occupancy_color[0] | self.occupancy_color[1];
    }

    /// Hash from scratch: XOR of every occupied slot's contribution plus the
    /// side-to-move key. Must equal the incrementally maintained `hash` at
    /// all times; tests lean on this.
    #[must_use]
    pub fn recompute_hash(&self, tables: &Tables) -> u64 {
        let mut hash = 0u64;
        for color in [Color::White, Color::Black] {
            for (sq, piece) in self.pieces_of(color) {
                hash ^= tables.zobrist.piece_key(piece, color, sq);
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= tables.zobrist.side_to_move_key;
        }
        hash
    }

    /// Check the occupancy invariants: color occupancies disjoint and equal
    /// to `occupancy_all` in union; type occupancies pairwise disjoint and
    /// equal to `occupancy_all` in union.
    #[must_use]
    pub fn occupancies_consistent(&self) -> bool {
        let colors_disjoint = (self.occupancy_color[0] & self.occupancy_color[1]).is_empty();
        let colors_cover = (self.occupancy_color[0] | self.occupancy_color[1]) == self.occupancy_all;

        let mut union = Bitboard::EMPTY;
        let mut types_disjoint = true;
        for bb in self.occupancy_type {
            if !(union & bb).is_empty() {
                types_disjoint = false;
            }
            union |= bb;
        }
        colors_disjoint && colors_cover && types_disjoint && union == self.occupancy_all
    }

    /// Locate the slot of `color` currently sitting on `sq` with type
    /// `piece`. Bounded linear scan over the color's 16 slots.
    pub(crate) fn find_slot(
        &self,
        color: Color,
        piece: Piece,
        sq: Square,
    ) -> Result<usize, StateCorruptionError> {
        let bit = Bitboard::from_square(sq);
        color_range(color)
            .find(|&i| self.slots[i] == bit && self.slot_piece[i] == piece)
            .ok_or(StateCorruptionError::SlotNotFound {
                color,
                piece,
                square: sq,
            })
    }

    /// True while pawn slots still hold pawns; used by tests.
    #[cfg(test)]
    pub(crate) fn pawn_slot_types(&self, color: Color) -> Vec<Piece> {
        let start = color_range(color).start;
        PAWN_SLOTS.map(|o| self.slot_piece[start + o]).collect()
    }
}

impl fmt::Display for Board {
    /// Rank-by-rank ASCII diagram, rank 8 on top, White pieces uppercase.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = match self.piece_at(Square::new(rank, file)) {
                    Some((Color::White, piece)) => piece.to_char().to_ascii_uppercase(),
                    Some((Color::Black, piece)) => piece.to_char(),
                    None => '.',
                };
                write!(f, "{c} ")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        write!(f, "{:?} to move", self.side_to_move)
    }
}
