//! A two-player perfect-information chess decision core.
//!
//! Bitboard board representation, magic-bitboard move generation, a tiered
//! positional evaluator, and a depth-limited alpha-beta search. Session
//! management, protocol frontends, and table persistence live outside this
//! crate; the in-process boundary is `Board`, `Tables`, the search entry
//! points, and a thin coordinate-notation adapter.

pub mod board;
pub mod zobrist;

pub use board::{
    find_best_move, find_best_move_parallel, BeamLimits, Bitboard, Board, BoardError, Color,
    Engine, EvalMode, Evaluator, IllegalMoveError, Move, NotationError, Piece, SearchLimits,
    SearchResult, SearchStats, Square, StateCorruptionError, Tables,
};
