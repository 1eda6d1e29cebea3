//! Core value types: bitboards, squares, pieces, moves.

mod bitboard;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use moves::Move;
pub use piece::{Color, Piece};
pub use square::Square;
