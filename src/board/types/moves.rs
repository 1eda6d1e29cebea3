//! Move value type.

use std::fmt;

use super::piece::Piece;
use super::square::Square;

/// A single move. Immutable after creation.
///
/// `captured` is present iff the move takes an enemy piece; `promotion` is
/// present iff a pawn reaches the last rank (always `Piece::Queen` under the
/// engine's promotion policy, but carried explicitly so undo can restore the
/// slot's previous type).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promotion: Option<Piece>,
}

impl Move {
    #[must_use]
    pub const fn quiet(from: Square, to: Square, piece: Piece) -> Self {
        Move {
            from,
            to,
            piece,
            captured: None,
            promotion: None,
        }
    }

    #[must_use]
    pub const fn capture(from: Square, to: Square, piece: Piece, captured: Piece) -> Self {
        Move {
            from,
            to,
            piece,
            captured: Some(captured),
            promotion: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for Move {
    /// Coordinate notation: `e2e4`, with a promotion suffix (`a7a8q`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "{promo}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_coordinate_notation() {
        let mv = Move::quiet(Square::new(1, 4), Square::new(3, 4), Piece::Pawn);
        assert_eq!(mv.to_string(), "e2e4");
    }

    #[test]
    fn display_promotion_suffix() {
        let mut mv = Move::quiet(Square::new(6, 0), Square::new(7, 0), Piece::Pawn);
        mv.promotion = Some(Piece::Queen);
        assert_eq!(mv.to_string(), "a7a8q");
    }
}
