//! Applying and undoing moves with exact round-trip.
//!
//! `make_move` and `unmake_move` are strict stack partners: every recursion
//! frame in search applies exactly one move before descending and undoes
//! exactly that move before returning. `unmake_move` restores every field,
//! hash included, bit for bit.

use super::error::{BoardError, IllegalMoveError, StateCorruptionError};
use super::state::{color_range, UndoRecord};
use super::tables::Tables;
use super::types::{Bitboard, Color, Move, Piece};
use super::Board;

impl Board {
    /// Apply a caller-supplied move after checking it against `legal_moves`.
    /// Rejects illegal moves with no side effects.
    pub fn apply(&mut self, tables: &Tables, mv: Move) -> Result<(), BoardError> {
        if !self.legal_moves(tables)?.contains(&mv) {
            return Err(BoardError::IllegalMove(IllegalMoveError {
                from: mv.from,
                to: mv.to,
            }));
        }
        self.make_move(tables, mv)?;
        Ok(())
    }

    /// Undo the most recently applied move. Needs no tables: the undo record
    /// carries the pre-move hash.
    pub fn undo(&mut self) -> Result<(), StateCorruptionError> {
        self.unmake_move()
    }

    /// Apply a move that is already known to be legal (produced by the move
    /// generator against this same state). A failed slot lookup here means
    /// generation and state have diverged; the error must abort the caller.
    pub(crate) fn make_move(
        &mut self,
        tables: &Tables,
        mv: Move,
    ) -> Result<(), StateCorruptionError> {
        let mover = self.side_to_move;
        let opponent = mover.opponent();
        let from_bit = Bitboard::from_square(mv.from);
        let to_bit = Bitboard::from_square(mv.to);
        let hash_before = self.hash;

        // 1. locate the mover's slot
        let moved_slot = self.find_slot(mover, mv.piece, mv.from)?;
        let piece_after = mv.promotion.unwrap_or(mv.piece);

        // 2-3. move the slot and the mover's occupancy bits
        self.slots[moved_slot] = to_bit;
        self.slot_piece[moved_slot] = piece_after;
        self.occupancy_color[mover.index()] ^= from_bit | to_bit;
        self.occupancy_type[mv.piece.index()] &= !from_bit;

        // 4. clear the captured slot before claiming the destination bit, so
        // same-type captures stay consistent
        let captured_slot = match mv.captured {
            Some(captured) => {
                let slot = self.find_captured_slot(opponent, captured, to_bit)?;
                self.slots[slot] = Bitboard::EMPTY;
                self.occupancy_color[opponent.index()] &= !to_bit;
                self.occupancy_type[captured.index()] &= !to_bit;
                Some(slot)
            }
            None => None,
        };
        self.occupancy_type[piece_after.index()] |= to_bit;

        // 5. occupancy union
        self.occupancy_all = self.occupancy_color[0] | self.occupancy_color[1];

        // 6. incremental hash: stale contributions out, fresh in
        self.hash ^= tables.zobrist.piece_key(mv.piece, mover, mv.from);
        self.hash ^= tables.zobrist.piece_key(piece_after, mover, mv.to);
        if let Some(captured) = mv.captured {
            self.hash ^= tables.zobrist.piece_key(captured, opponent, mv.to);
        }
        self.hash ^= tables.zobrist.side_to_move_key;

        // 7-8. flip the mover and record the undo
        self.side_to_move = opponent;
        self.history.push(UndoRecord {
            mv,
            moved_slot,
            piece_before: mv.piece,
            captured_slot,
            hash_before,
        });
        Ok(())
    }

    /// Reverse the most recent `make_move` exactly.
    pub(crate) fn unmake_move(&mut self) -> Result<(), StateCorruptionError> {
        let record = self
            .history
            .pop()
            .ok_or(StateCorruptionError::HistoryUnderflow)?;
        let mv = record.mv;
        let mover = self.side_to_move.opponent();
        let opponent = self.side_to_move;
        let from_bit = Bitboard::from_square(mv.from);
        let to_bit = Bitboard::from_square(mv.to);
        let piece_after = mv.promotion.unwrap_or(mv.piece);

        self.side_to_move = mover;

        self.slots[record.moved_slot] = from_bit;
        self.slot_piece[record.moved_slot] = record.piece_before;
        self.occupancy_color[mover.index()] ^= from_bit | to_bit;
        self.occupancy_type[piece_after.index()] &= !to_bit;
        self.occupancy_type[record.piece_before.index()] |= from_bit;

        if let (Some(slot), Some(captured)) = (record.captured_slot, mv.captured) {
            self.slots[slot] = to_bit;
            self.occupancy_color[opponent.index()] |= to_bit;
            self.occupancy_type[captured.index()] |= to_bit;
        }

        self.occupancy_all = self.occupancy_color[0] | self.occupancy_color[1];
        self.hash = record.hash_before;
        Ok(())
    }

    /// Find the opponent slot holding the captured piece on the destination.
    /// Scans the opponent's 16-slot range; matching on the slot's current
    /// type keeps the scan exact even after promotions.
    fn find_captured_slot(
        &self,
        opponent: Color,
        captured: Piece,
        to_bit: Bitboard,
    ) -> Result<usize, StateCorruptionError> {
        color_range(opponent)
            .find(|&i| self.slots[i] == to_bit && self.slot_piece[i] == captured)
            .ok_or(StateCorruptionError::CapturedSlotNotFound {
                color: opponent,
                square: to_bit.lowest_square(),
            })
    }
}
