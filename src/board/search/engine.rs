//! Stateful engine: a board plus everything worth keeping between searches.
//!
//! The evaluator memo and the principal variation survive across calls. The
//! retained PV seeds move ordering of the next search; playing a move that
//! deviates from it invalidates the rest of the line, while playing the PV
//! head keeps the tail as the hint for the reply.

use super::super::error::{BoardError, StateCorruptionError};
use super::super::eval::Evaluator;
use super::super::notation::parse_move;
use super::super::tables::Tables;
use super::super::types::Move;
use super::super::Board;
use super::alphabeta::{search_root, SearchResult};
use super::SearchLimits;

pub struct Engine {
    tables: &'static Tables,
    board: Board,
    evaluator: Evaluator,
    limits: SearchLimits,
    pv: Vec<Move>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    /// An engine on the starting position with default limits, backed by
    /// the global tables.
    #[must_use]
    pub fn new() -> Self {
        Engine::with_limits(SearchLimits::default())
    }

    /// Global-tables convenience constructor.
    #[must_use]
    pub fn with_limits(limits: SearchLimits) -> Self {
        Engine::with_tables(Tables::global(), limits)
    }

    /// An engine backed by caller-supplied tables.
    #[must_use]
    pub fn with_tables(tables: &'static Tables, limits: SearchLimits) -> Self {
        Engine {
            tables,
            board: Board::initial(tables),
            evaluator: Evaluator::new(),
            limits,
            pv: Vec::new(),
        }
    }

    #[must_use]
    pub fn tables(&self) -> &'static Tables {
        self.tables
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    pub fn set_limits(&mut self, limits: SearchLimits) {
        self.limits = limits;
    }

    /// Retained principal variation from the last search, adjusted for
    /// moves played since.
    #[must_use]
    pub fn principal_variation(&self) -> &[Move] {
        &self.pv
    }

    /// Search the current position. The retained PV seeds ordering and is
    /// replaced by the new one.
    pub fn search(&mut self) -> Result<SearchResult, StateCorruptionError> {
        let result = search_root(
            &mut self.board,
            self.tables,
            &mut self.evaluator,
            &self.limits,
            &self.pv,
        )?;
        self.pv = result.pv.clone();
        Ok(result)
    }

    /// Best move for the side to move, or `None` when there is no legal
    /// move.
    pub fn best_move(&mut self) -> Result<Option<Move>, StateCorruptionError> {
        Ok(self.search()?.best_move)
    }

    /// Play a move on the engine's board. Following the PV head keeps the
    /// tail as the hint for the reply; deviating discards the line. The
    /// evaluator memo stays valid either way, keyed by position hash.
    pub fn play(&mut self, mv: Move) -> Result<(), BoardError> {
        self.board.apply(self.tables, mv)?;
        if self.pv.first() == Some(&mv) {
            self.pv.remove(0);
        } else {
            self.pv.clear();
        }
        Ok(())
    }

    /// Parse coordinate move text and play it.
    pub fn play_text(&mut self, text: &str) -> Result<Move, BoardError> {
        let tables = self.tables;
        let mv = parse_move(&mut self.board, tables, text)?;
        self.play(mv)?;
        Ok(mv)
    }

    /// Take back the last played move. Any retained line is stale after
    /// this, so it is dropped.
    pub fn undo(&mut self) -> Result<(), StateCorruptionError> {
        self.pv.clear();
        self.board.undo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::SearchLimits;

    fn fast_limits() -> SearchLimits {
        SearchLimits {
            max_depth: 2,
            ..SearchLimits::default()
        }
    }

    #[test]
    fn engine_plays_a_full_exchange() {
        let mut engine = Engine::with_limits(fast_limits());
        engine.play_text("e2e4").unwrap();
        let reply = engine.best_move().unwrap().unwrap();
        engine.play(reply).unwrap();
        assert_eq!(engine.board().occupancy_all().popcount(), 32);
    }

    #[test]
    fn pv_head_survives_being_played() {
        let mut engine = Engine::with_limits(fast_limits());
        let best = engine.best_move().unwrap().unwrap();
        let pv_tail = engine.principal_variation()[1..].to_vec();
        engine.play(best).unwrap();
        assert_eq!(engine.principal_variation(), &pv_tail[..]);
    }

    #[test]
    fn deviating_from_the_pv_invalidates_it() {
        let mut engine = Engine::with_limits(fast_limits());
        let best = engine.best_move().unwrap().unwrap();
        let tables = Tables::global();
        let other = engine
            .board()
            .clone()
            .legal_moves(tables)
            .unwrap()
            .into_iter()
            .find(|&m| m != best)
            .unwrap();
        engine.play(other).unwrap();
        assert!(engine.principal_variation().is_empty());
    }

    #[test]
    fn engine_runs_on_caller_supplied_tables() {
        let tables: &'static Tables = Box::leak(Box::new(Tables::new()));
        let mut engine = Engine::with_tables(tables, fast_limits());
        // table construction is deterministic, so hashes agree with the
        // global instance
        assert_eq!(engine.board().hash(), Board::new().hash());
        engine.play_text("e2e4").unwrap();
        let best = engine.best_move().unwrap().unwrap();
        engine.play(best).unwrap();
        assert!(engine.board().occupancies_consistent());
    }

    #[test]
    fn undo_returns_to_the_prior_position() {
        let mut engine = Engine::with_limits(fast_limits());
        let before = engine.board().hash();
        engine.play_text("d2d4").unwrap();
        engine.undo().unwrap();
        assert_eq!(engine.board().hash(), before);
    }
}
