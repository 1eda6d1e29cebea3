//! Legal move generation: perft counts from the initial position, pin
//! handling, and check evasion.

use crate::board::tables::Tables;
use crate::board::types::{Color, Piece, Square};
use crate::board::Board;

fn perft(board: &mut Board, tables: &Tables, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for mv in board.legal_moves(tables).unwrap() {
        board.make_move(tables, mv).unwrap();
        nodes += perft(board, tables, depth - 1);
        board.unmake_move().unwrap();
    }
    nodes
}

fn play(board: &mut Board, tables: &Tables, line: &[(Square, Square)]) {
    for &(from, to) in line {
        let mv = board
            .legal_moves(tables)
            .unwrap()
            .into_iter()
            .find(|m| m.from == from && m.to == to)
            .unwrap_or_else(|| panic!("move {from}{to} not legal"));
        board.make_move(tables, mv).unwrap();
    }
}

/// Reference counts for a rule set without castling and en passant; neither
/// rule can fire within three plies of the initial position, so these match
/// the standard values.
#[test]
fn perft_from_the_initial_position() {
    let tables = Tables::global();
    let mut board = Board::initial(tables);
    assert_eq!(perft(&mut board, tables, 1), 20);
    assert_eq!(perft(&mut board, tables, 2), 400);
    assert_eq!(perft(&mut board, tables, 3), 8902);
    // the walk must unwind completely
    assert!(board.history.is_empty());
    assert_eq!(board.side_to_move(), Color::White);
}

#[test]
fn pinned_pawn_has_no_moves() {
    let tables = Tables::global();
    let mut board = Board::initial(tables);
    // 1. e4 e5 2. Bb5 pins the d7 pawn against the king on e8
    play(
        &mut board,
        tables,
        &[
            (Square::new(1, 4), Square::new(3, 4)),
            (Square::new(6, 4), Square::new(4, 4)),
            (Square::new(0, 5), Square::new(4, 1)),
        ],
    );
    let moves = board.legal_moves(tables).unwrap();
    assert!(!moves.iter().any(|m| m.from == Square::new(6, 3)));
    // interposing on the pin ray is still allowed
    assert!(moves
        .iter()
        .any(|m| m.piece == Piece::Knight && m.to == Square::new(5, 2)));
}

#[test]
fn checkmate_position_has_no_legal_moves() {
    let tables = Tables::global();
    let mut board = Board::initial(tables);
    // fool's mate: 1. f3 e5 2. g4 Qh4#
    play(
        &mut board,
        tables,
        &[
            (Square::new(1, 5), Square::new(2, 5)),
            (Square::new(6, 4), Square::new(4, 4)),
            (Square::new(1, 6), Square::new(3, 6)),
            (Square::new(7, 3), Square::new(3, 7)),
        ],
    );
    assert!(board.in_check(tables, Color::White));
    assert!(board.legal_moves(tables).unwrap().is_empty());
}

#[test]
fn every_reply_to_a_check_resolves_it() {
    let tables = Tables::global();
    let mut board = Board::initial(tables);
    // 1. e4 e5 2. Nf3 f6 3. Nxe5 fxe5?? 4. Qh5+ forces g6 or Ke7
    play(
        &mut board,
        tables,
        &[
            (Square::new(1, 4), Square::new(3, 4)),
            (Square::new(6, 4), Square::new(4, 4)),
            (Square::new(0, 6), Square::new(2, 5)),
            (Square::new(6, 5), Square::new(5, 5)),
            (Square::new(2, 5), Square::new(4, 4)),
            (Square::new(5, 5), Square::new(4, 4)),
            (Square::new(0, 3), Square::new(4, 7)),
        ],
    );
    assert!(board.in_check(tables, Color::Black));
    let replies = board.legal_moves(tables).unwrap();
    assert!(!replies.is_empty());
    for mv in replies {
        board.make_move(tables, mv).unwrap();
        assert!(!board.in_check(tables, Color::Black));
        board.unmake_move().unwrap();
    }
}
