//! Coordinate-notation boundary adapter.
//!
//! Text comes in as algebraic squares (`a1`..`h8`) and coordinate moves
//! (`e2e4`, promotion suffix `q`). Malformed text is rejected here with
//! `NotationError` and never reaches the core; well-formed text naming a
//! move the position does not allow is `IllegalMoveError`.

use super::error::{BoardError, IllegalMoveError, NotationError};
use super::tables::Tables;
use super::types::{Move, Piece, Square};
use super::Board;

/// Parse an algebraic square like `e4`.
pub fn parse_square(text: &str) -> Result<Square, NotationError> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return Err(NotationError::InvalidLength { found: bytes.len() });
    }
    let file = bytes[0].wrapping_sub(b'a');
    let rank = bytes[1].wrapping_sub(b'1');
    if file > 7 || rank > 7 {
        return Err(NotationError::InvalidSquare {
            notation: text.to_string(),
        });
    }
    Ok(Square::new(rank, file))
}

/// Format a square as algebraic text.
#[must_use]
pub fn format_square(sq: Square) -> String {
    sq.to_string()
}

/// Format a move as coordinate text (`e2e4`, `a7a8q`).
#[must_use]
pub fn format_move(mv: Move) -> String {
    mv.to_string()
}

/// Parse coordinate move text against the current position, returning the
/// matching legal move. Promotion is implicit; a `q` suffix is accepted,
/// any other suffix is malformed.
pub fn parse_move(board: &mut Board, tables: &Tables, text: &str) -> Result<Move, BoardError> {
    let len = text.len();
    if len != 4 && len != 5 {
        return Err(NotationError::InvalidLength { found: len }.into());
    }
    if !text.is_ascii() {
        return Err(NotationError::InvalidSquare {
            notation: text.to_string(),
        }
        .into());
    }
    let from = parse_square(&text[0..2])?;
    let to = parse_square(&text[2..4])?;
    let suffix = text[4..].chars().next();
    if let Some(c) = suffix {
        if c != 'q' {
            return Err(NotationError::InvalidPromotion { char: c }.into());
        }
    }

    let mv = board
        .legal_moves(tables)?
        .into_iter()
        .find(|m| m.from == from && m.to == to)
        .ok_or(IllegalMoveError { from, to })?;
    if suffix.is_some() && mv.promotion != Some(Piece::Queen) {
        return Err(IllegalMoveError { from, to }.into());
    }
    Ok(mv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::Color;

    #[test]
    fn square_text_round_trips() {
        for sq in Square::all() {
            assert_eq!(parse_square(&format_square(sq)), Ok(sq));
        }
    }

    #[test]
    fn malformed_squares_are_rejected() {
        assert!(matches!(
            parse_square("e9"),
            Err(NotationError::InvalidSquare { .. })
        ));
        assert!(matches!(
            parse_square("i1"),
            Err(NotationError::InvalidSquare { .. })
        ));
        assert!(matches!(
            parse_square("e42"),
            Err(NotationError::InvalidLength { found: 3 })
        ));
    }

    #[test]
    fn parses_an_opening_move() {
        let tables = Tables::global();
        let mut board = Board::initial(tables);
        let mv = parse_move(&mut board, tables, "e2e4").unwrap();
        assert_eq!(mv.from, Square::new(1, 4));
        assert_eq!(mv.to, Square::new(3, 4));
        assert_eq!(mv.piece, Piece::Pawn);
        assert_eq!(format_move(mv), "e2e4");
    }

    #[test]
    fn illegal_but_well_formed_text_is_illegal_move() {
        let tables = Tables::global();
        let mut board = Board::initial(tables);
        let before = board.hash();
        match parse_move(&mut board, tables, "e2e5") {
            Err(BoardError::IllegalMove(err)) => {
                // the error reports exactly what was entered
                assert_eq!(err.to_string(), "move e2e5 is not legal in this position");
            }
            other => panic!("expected an illegal-move rejection, got {other:?}"),
        }
        assert_eq!(board.hash(), before);
        assert_eq!(board.side_to_move(), Color::White);
    }

    #[test]
    fn bad_promotion_suffix_is_notation_error() {
        let tables = Tables::global();
        let mut board = Board::initial(tables);
        assert!(matches!(
            parse_move(&mut board, tables, "e2e4n"),
            Err(BoardError::Notation(NotationError::InvalidPromotion { char: 'n' }))
        ));
    }
}
