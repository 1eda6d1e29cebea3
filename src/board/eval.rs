//! Tiered, memoized position evaluation.
//!
//! Scores are centipawns from White's point of view: positive favors White.
//! Every feature is computed per side and entered as `white - black` into a
//! dot product with fixed integer weights, so the evaluation is exactly
//! antisymmetric under color swap.
//!
//! The tiers are cumulative. `Lazy` covers material, piece-square placement,
//! and development; `Normal` adds center control, mobility, and connectivity;
//! `Eager` adds pawn structure and king shelter. Search picks the tier per
//! node; results are memoized on `(zobrist hash, tier)` so revisited
//! positions cost a map lookup.

use std::collections::HashMap;

use super::tables::{Tables, PST};
use super::types::{Bitboard, Color, Piece, Square};
use super::Board;

/// Evaluation tier, cheapest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EvalMode {
    Lazy,
    Normal,
    Eager,
}

const DEVELOPMENT_WEIGHT: i32 = 10;
const CENTER_WEIGHT: i32 = 12;
const MOBILITY_WEIGHT: i32 = 3;
const CONNECTIVITY_WEIGHT: i32 = 4;
const DOUBLED_PAWN_PENALTY: i32 = 20;
const ISOLATED_PAWN_PENALTY: i32 = 15;
const SHELTER_WEIGHT: i32 = 10;

/// The four central squares, for the center-control feature.
const CENTER: [Square; 4] = [
    Square::new(3, 3),
    Square::new(3, 4),
    Square::new(4, 3),
    Square::new(4, 4),
];

/// Starting squares of the minor pieces, per color, for the development
/// feature.
fn minor_home_squares(color: Color) -> Bitboard {
    let home = Bitboard::from_square(Square::new(0, 1))
        | Bitboard::from_square(Square::new(0, 6))
        | Bitboard::from_square(Square::new(0, 2))
        | Bitboard::from_square(Square::new(0, 5));
    match color {
        Color::White => home,
        Color::Black => Bitboard(home.0.swap_bytes()),
    }
}

/// Stateful evaluator carrying the memo table. One instance lives inside an
/// `Engine` and persists across searches.
#[derive(Debug, Default)]
pub struct Evaluator {
    memo: HashMap<(u64, EvalMode), i32>,
}

impl Evaluator {
    #[must_use]
    pub fn new() -> Self {
        Evaluator::default()
    }

    /// Number of memoized entries; benches and tests use this.
    #[must_use]
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    pub fn clear(&mut self) {
        self.memo.clear();
    }

    /// Evaluate `board` at the given tier, consulting the memo first.
    pub fn evaluate(&mut self, board: &Board, tables: &Tables, mode: EvalMode) -> i32 {
        if let Some(&score) = self.memo.get(&(board.hash(), mode)) {
            return score;
        }
        let score = evaluate_fresh(board, tables, mode);
        self.memo.insert((board.hash(), mode), score);
        score
    }
}

/// Full (unmemoized) evaluation.
#[must_use]
pub fn evaluate_fresh(board: &Board, tables: &Tables, mode: EvalMode) -> i32 {
    let mut score = material_and_placement(board, Color::White)
        - material_and_placement(board, Color::Black);
    score += DEVELOPMENT_WEIGHT * (development(board, Color::White) - development(board, Color::Black));

    if mode == EvalMode::Lazy {
        return score;
    }

    let white_attacks = board.attacks(tables, Color::White);
    let black_attacks = board.attacks(tables, Color::Black);
    score += CENTER_WEIGHT * (center_control(white_attacks) - center_control(black_attacks));
    score += MOBILITY_WEIGHT * (mobility(board, Color::White, white_attacks)
        - mobility(board, Color::Black, black_attacks));
    score += CONNECTIVITY_WEIGHT * (connectivity(board, Color::White, white_attacks)
        - connectivity(board, Color::Black, black_attacks));

    if mode == EvalMode::Normal {
        return score;
    }

    score += pawn_structure(board, Color::White) - pawn_structure(board, Color::Black);
    score += SHELTER_WEIGHT * (king_shelter(board, Color::White) - king_shelter(board, Color::Black));
    score
}

fn material_and_placement(board: &Board, color: Color) -> i32 {
    board
        .pieces_of(color)
        .map(|(sq, piece)| {
            let pst_sq = match color {
                Color::White => sq.index() as usize,
                Color::Black => (sq.index() ^ 56) as usize,
            };
            piece.value() + PST[piece.index()][pst_sq]
        })
        .sum()
}

/// Minor pieces that have left their starting squares.
fn development(board: &Board, color: Color) -> i32 {
    let home = minor_home_squares(color);
    board
        .pieces_of(color)
        .filter(|&(sq, piece)| {
            matches!(piece, Piece::Knight | Piece::Bishop)
                && !home.contains(sq)
        })
        .count() as i32
}

fn center_control(attacks: Bitboard) -> i32 {
    CENTER.iter().filter(|&&sq| attacks.contains(sq)).count() as i32
}

/// Attacked squares not blocked by the side's own pieces.
fn mobility(board: &Board, color: Color, attacks: Bitboard) -> i32 {
    (attacks & !board.occupancy(color)).popcount() as i32
}

/// Own pieces covered by another own piece.
fn connectivity(board: &Board, color: Color, attacks: Bitboard) -> i32 {
    (attacks & board.occupancy(color)).popcount() as i32
}

fn pawn_structure(board: &Board, color: Color) -> i32 {
    let pawns = board.occupancy(color) & board.pieces_by_type(Piece::Pawn);
    let mut file_counts = [0i32; 8];
    for sq in pawns.iter() {
        file_counts[sq.file() as usize] += 1;
    }

    let mut penalty = 0;
    for file in 0..8usize {
        let count = file_counts[file];
        if count > 1 {
            penalty += DOUBLED_PAWN_PENALTY * (count - 1);
        }
        let left = if file > 0 { file_counts[file - 1] } else { 0 };
        let right = if file < 7 { file_counts[file + 1] } else { 0 };
        if count > 0 && left == 0 && right == 0 {
            penalty += ISOLATED_PAWN_PENALTY * count;
        }
    }
    -penalty
}

/// Own pawns on the three files around the king, one rank ahead of it.
fn king_shelter(board: &Board, color: Color) -> i32 {
    let king = board.king_square(color);
    let shelter_rank = king.rank() as i8 + color.forward();
    if !(0..8).contains(&shelter_rank) {
        return 0;
    }
    let pawns = board.occupancy(color) & board.pieces_by_type(Piece::Pawn);
    let mut covered = 0;
    for df in -1i8..=1 {
        let file = king.file() as i8 + df;
        if (0..8).contains(&file)
            && pawns.contains(Square::new(shelter_rank as u8, file as u8))
        {
            covered += 1;
        }
    }
    covered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_position_is_balanced_at_every_tier() {
        let tables = Tables::global();
        let board = Board::initial(tables);
        for mode in [EvalMode::Lazy, EvalMode::Normal, EvalMode::Eager] {
            assert_eq!(evaluate_fresh(&board, tables, mode), 0);
        }
    }

    #[test]
    fn material_advantage_shows_after_a_capture() {
        let tables = Tables::global();
        let mut board = Board::initial(tables);
        // 1. e4 d5 2. exd5: White is a pawn up
        for (from, to) in [
            (Square::new(1, 4), Square::new(3, 4)),
            (Square::new(6, 3), Square::new(4, 3)),
            (Square::new(3, 4), Square::new(4, 3)),
        ] {
            let mv = board
                .legal_moves(tables)
                .unwrap()
                .into_iter()
                .find(|m| m.from == from && m.to == to)
                .unwrap();
            board.make_move(tables, mv).unwrap();
        }
        assert!(evaluate_fresh(&board, tables, EvalMode::Lazy) > 50);
    }

    #[test]
    fn memo_hits_on_repeat_positions() {
        let tables = Tables::global();
        let board = Board::initial(tables);
        let mut evaluator = Evaluator::new();
        let first = evaluator.evaluate(&board, tables, EvalMode::Eager);
        assert_eq!(evaluator.memo_len(), 1);
        let second = evaluator.evaluate(&board, tables, EvalMode::Eager);
        assert_eq!(first, second);
        assert_eq!(evaluator.memo_len(), 1);
    }

    #[test]
    fn tiers_memoize_independently() {
        let tables = Tables::global();
        let board = Board::initial(tables);
        let mut evaluator = Evaluator::new();
        evaluator.evaluate(&board, tables, EvalMode::Lazy);
        evaluator.evaluate(&board, tables, EvalMode::Eager);
        assert_eq!(evaluator.memo_len(), 2);
    }

    #[test]
    fn developing_a_knight_raises_the_score() {
        let tables = Tables::global();
        let mut board = Board::initial(tables);
        let mv = board
            .legal_moves(tables)
            .unwrap()
            .into_iter()
            .find(|m| m.from == Square::new(0, 6) && m.to == Square::new(2, 5))
            .unwrap();
        board.make_move(tables, mv).unwrap();
        assert!(evaluate_fresh(&board, tables, EvalMode::Lazy) > 0);
    }
}
