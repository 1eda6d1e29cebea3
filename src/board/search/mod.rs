//! Depth-limited alpha-beta search with quiescence, beam truncation,
//! iterative deepening, and an optional root-parallel split.

mod alphabeta;
mod engine;

pub use alphabeta::{find_best_move, find_best_move_parallel, SearchResult};
pub use engine::Engine;

use std::time::Duration;

use super::error::StateCorruptionError;
use super::eval::EvalMode;

/// Beam widths per depth band. The root band always searches full width;
/// the middle band and the deepest band are truncated to the best-ordered
/// moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeamLimits {
    pub middle: usize,
    pub deep: usize,
}

impl Default for BeamLimits {
    fn default() -> Self {
        BeamLimits { middle: 7, deep: 5 }
    }
}

/// Caller-facing search configuration.
#[derive(Clone, Copy, Debug)]
pub struct SearchLimits {
    /// Target depth for iterative deepening.
    pub max_depth: u32,
    /// Node budget; `None` means unbounded.
    pub max_nodes: Option<u64>,
    /// Wall-clock budget; `None` means unbounded.
    pub max_time: Option<Duration>,
    /// Beam truncation; `None` searches every ordered move.
    pub beam: Option<BeamLimits>,
    /// Evaluation tier used at leaves.
    pub eval_mode: EvalMode,
    /// When false, alpha-beta cutoffs are disabled and the search is an
    /// exhaustive minimax; exists so equivalence is testable.
    pub pruning: bool,
    /// Extra plies of capture-only quiescence past `max_depth`.
    pub quiescence_cap: u32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            max_depth: 4,
            max_nodes: None,
            max_time: None,
            beam: Some(BeamLimits::default()),
            eval_mode: EvalMode::Normal,
            pruning: true,
            quiescence_cap: 3,
        }
    }
}

impl SearchLimits {
    /// A configuration with a single fixed depth, no budgets, no beam, and
    /// pruning on. Tests build on this.
    #[must_use]
    pub fn exact_depth(depth: u32) -> Self {
        SearchLimits {
            max_depth: depth,
            beam: None,
            ..SearchLimits::default()
        }
    }
}

/// Counters reported after every search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Interior and leaf nodes visited.
    pub nodes: u64,
    /// Positions handed to the evaluator as leaves.
    pub leaves: u64,
    /// Beta cutoffs taken.
    pub cutoffs: u64,
    /// Deepest iteration that ran to completion.
    pub depth_completed: u32,
}

impl SearchStats {
    pub(crate) fn absorb(&mut self, other: SearchStats) {
        self.nodes += other.nodes;
        self.leaves += other.leaves;
        self.cutoffs += other.cutoffs;
        self.depth_completed = self.depth_completed.max(other.depth_completed);
    }
}

/// Internal control flow: a budget stop unwinds the current iteration, a
/// corruption aborts the whole search.
#[derive(Debug)]
pub(crate) enum Interrupt {
    BudgetExceeded,
    Corruption(StateCorruptionError),
}

impl From<StateCorruptionError> for Interrupt {
    fn from(err: StateCorruptionError) -> Self {
        Interrupt::Corruption(err)
    }
}
