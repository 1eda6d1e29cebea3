//! Board representation and game logic.
//!
//! Uses bitboards for move generation and position evaluation. The state is
//! mutated in place by `make_move`/`unmake_move` with exact undo; search
//! shares one `Board` across its whole call stack.
//!
//! # Example
//! ```
//! use minimax_chess::board::{Board, Tables};
//!
//! let tables = Tables::global();
//! let mut board = Board::new();
//! let moves = board.legal_moves(tables).unwrap();
//! println!("starting position has {} legal moves", moves.len());
//! ```

mod error;
mod eval;
mod make_unmake;
mod movegen;
mod notation;
mod search;
mod state;
pub mod tables;
mod types;

#[cfg(test)]
mod tests;

pub use error::{BoardError, IllegalMoveError, NotationError, StateCorruptionError};
pub use eval::{evaluate_fresh, EvalMode, Evaluator};
pub use notation::{format_move, format_square, parse_move, parse_square};
pub use search::{
    find_best_move, find_best_move_parallel, BeamLimits, Engine, SearchLimits, SearchResult,
    SearchStats,
};
pub use state::{Board, NUM_SLOTS, SLOTS_PER_COLOR};
pub use tables::Tables;
pub use types::{Bitboard, BitboardIter, Color, Move, Piece, Square};
