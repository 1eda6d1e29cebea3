//! Error types for board operations.
//!
//! Boundary errors (`NotationError`, `IllegalMoveError`) are rejections with
//! no side effects. `StateCorruptionError` means an internal invariant broke;
//! callers must abort the operation rather than continue with an inconsistent
//! board.

use std::fmt;

use super::types::{Color, Piece, Square};

/// Malformed square or move text at the notation boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    /// Text has the wrong length for a square (2) or move (4-5).
    InvalidLength { found: usize },
    /// File letter outside `a`-`h` or rank digit outside `1`-`8`.
    InvalidSquare { notation: String },
    /// Promotion suffix is not `q`.
    InvalidPromotion { char: char },
}

impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotationError::InvalidLength { found } => {
                write!(f, "notation has invalid length {found}")
            }
            NotationError::InvalidSquare { notation } => {
                write!(f, "invalid square notation '{notation}'")
            }
            NotationError::InvalidPromotion { char } => {
                write!(f, "invalid promotion piece '{char}'")
            }
        }
    }
}

impl std::error::Error for NotationError {}

/// The caller asked for a move that is not in `legal_moves` for the current
/// position. Carries the squares as entered; the board is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllegalMoveError {
    pub from: Square,
    pub to: Square,
}

impl fmt::Display for IllegalMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "move {}{} is not legal in this position",
            self.from, self.to
        )
    }
}

impl std::error::Error for IllegalMoveError {}

/// An internal invariant failed. This indicates a bug in move generation or
/// state mutation and must never be swallowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateCorruptionError {
    /// No slot of the moving side holds the move's start square.
    SlotNotFound {
        color: Color,
        piece: Piece,
        square: Square,
    },
    /// No opponent slot holds the captured piece on the destination square.
    CapturedSlotNotFound { color: Color, square: Square },
    /// `undo` called with no matching `apply` on the history stack.
    HistoryUnderflow,
}

impl fmt::Display for StateCorruptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateCorruptionError::SlotNotFound {
                color,
                piece,
                square,
            } => {
                write!(f, "no {color:?} slot holds {piece:?} on {square}")
            }
            StateCorruptionError::CapturedSlotNotFound { color, square } => {
                write!(f, "no {color:?} slot holds a captured piece on {square}")
            }
            StateCorruptionError::HistoryUnderflow => {
                write!(f, "undo called with empty move history")
            }
        }
    }
}

impl std::error::Error for StateCorruptionError {}

/// Errors surfaced by the board's public mutation API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    Notation(NotationError),
    IllegalMove(IllegalMoveError),
    StateCorruption(StateCorruptionError),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::Notation(err) => err.fmt(f),
            BoardError::IllegalMove(err) => err.fmt(f),
            BoardError::StateCorruption(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for BoardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BoardError::Notation(err) => Some(err),
            BoardError::IllegalMove(err) => Some(err),
            BoardError::StateCorruption(err) => Some(err),
        }
    }
}

impl From<NotationError> for BoardError {
    fn from(err: NotationError) -> Self {
        BoardError::Notation(err)
    }
}

impl From<IllegalMoveError> for BoardError {
    fn from(err: IllegalMoveError) -> Self {
        BoardError::IllegalMove(err)
    }
}

impl From<StateCorruptionError> for BoardError {
    fn from(err: StateCorruptionError) -> Self {
        BoardError::StateCorruption(err)
    }
}
