//! Zobrist hashing keys.
//!
//! One random 64-bit key per (piece type, color, square) plus a side-to-move
//! key. The board's hash is the XOR of the keys of its occupied slots (and
//! the side key when Black moves); `make_move` maintains it incrementally by
//! XORing stale contributions out and fresh ones in.

use rand::prelude::*;

use crate::board::{Color, Piece, Square};

pub struct ZobristKeys {
    // piece_keys[piece_type][color][square]
    pub(crate) piece_keys: [[[u64; 64]; 2]; 6],
    pub(crate) side_to_move_key: u64,
}

impl ZobristKeys {
    /// Fixed seed so hashes are reproducible across runs and processes.
    #[must_use]
    pub(crate) fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(9_876_543_210);
        let mut piece_keys = [[[0u64; 64]; 2]; 6];
        for piece in &mut piece_keys {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }
        ZobristKeys {
            piece_keys,
            side_to_move_key: rng.gen(),
        }
    }

    /// Key for one piece placement.
    #[inline]
    pub(crate) fn piece_key(&self, piece: Piece, color: Color, sq: Square) -> u64 {
        self.piece_keys[piece.index()][color.index()][sq.index() as usize]
    }
}
