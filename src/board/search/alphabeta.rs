//! Alpha-beta core, iterative deepening driver, and the root-parallel split.
//!
//! The search mutates a single `Board` through strict make/unmake pairs.
//! Scores stay in White's perspective throughout; White maximizes, Black
//! minimizes. Budget exhaustion unwinds the current iteration through
//! `Interrupt::BudgetExceeded` and the driver answers from the deepest
//! fully completed depth.

use std::time::Instant;

use parking_lot::Mutex;

use super::super::error::StateCorruptionError;
use super::super::eval::{evaluate_fresh, EvalMode, Evaluator};
use super::super::tables::Tables;
use super::super::types::{Color, Move};
use super::super::Board;
use super::{BeamLimits, Interrupt, SearchLimits, SearchStats};

/// Outcome of one search call.
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Best root move, `None` only when the side to move has no legal moves
    /// or no iteration completed within the budget.
    pub best_move: Option<Move>,
    /// Score of the principal variation, White's perspective.
    pub score: i32,
    /// Principal variation from the root.
    pub pv: Vec<Move>,
    pub stats: SearchStats,
}

struct Context<'a> {
    tables: &'a Tables,
    evaluator: &'a mut Evaluator,
    limits: &'a SearchLimits,
    /// Main depth of the current iteration; plies beyond it are quiescence.
    depth: u32,
    /// Principal variation seeding move ordering along the leftmost line.
    hint: Vec<Move>,
    deadline: Option<Instant>,
    stats: SearchStats,
}

impl Context<'_> {
    /// Count a node and enforce the budgets. The clock is polled at a
    /// bounded interval, not every node.
    fn tick(&mut self) -> Result<(), Interrupt> {
        self.stats.nodes += 1;
        if let Some(budget) = self.limits.max_nodes {
            if self.stats.nodes > budget {
                return Err(Interrupt::BudgetExceeded);
            }
        }
        if self.stats.nodes % 1024 == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    return Err(Interrupt::BudgetExceeded);
                }
            }
        }
        Ok(())
    }

    fn leaf(&mut self, board: &Board) -> i32 {
        self.stats.leaves += 1;
        self.evaluator
            .evaluate(board, self.tables, self.limits.eval_mode)
    }
}

/// Beam width for a ply: the root band is always full width, the deepest
/// main ply and quiescence take the narrow width, everything between the
/// middle width.
fn beam_width(beam: BeamLimits, ply: u32, depth: u32) -> Option<usize> {
    if ply == 0 {
        None
    } else if ply + 1 >= depth {
        Some(beam.deep)
    } else {
        Some(beam.middle)
    }
}

/// Order moves best-first for the side to move by applying each, taking a
/// lazy static evaluation, and undoing. Stable sort keeps the order
/// deterministic across runs.
fn order_moves(
    board: &mut Board,
    ctx: &mut Context<'_>,
    moves: &mut Vec<Move>,
    maximizing: bool,
) -> Result<(), Interrupt> {
    let mut scored = Vec::with_capacity(moves.len());
    for &mv in moves.iter() {
        board.make_move(ctx.tables, mv)?;
        let score = ctx.evaluator.evaluate(board, ctx.tables, EvalMode::Lazy);
        board.unmake_move()?;
        scored.push((score, mv));
    }
    if maximizing {
        scored.sort_by_key(|&(score, _)| std::cmp::Reverse(score));
    } else {
        scored.sort_by_key(|&(score, _)| score);
    }
    moves.clear();
    moves.extend(scored.into_iter().map(|(_, mv)| mv));
    Ok(())
}

fn alpha_beta(
    board: &mut Board,
    ctx: &mut Context<'_>,
    ply: u32,
    mut alpha: i32,
    mut beta: i32,
    on_pv: bool,
) -> Result<(i32, Vec<Move>), Interrupt> {
    ctx.tick()?;
    let maximizing = board.side_to_move() == Color::White;
    let quiescing = ply >= ctx.depth;

    if quiescing {
        // a depth-limit node is quiet unless a capture reached it; quiet
        // nodes take the static evaluation, capture-reached nodes extend
        // up to the cap
        let reached_by_capture = board
            .history
            .last()
            .map_or(false, |record| record.mv.is_capture());
        if !reached_by_capture || ply >= ctx.depth + ctx.limits.quiescence_cap {
            return Ok((ctx.leaf(board), Vec::new()));
        }
    }

    let mut moves = board.legal_moves(ctx.tables)?;
    if quiescing {
        moves.retain(Move::is_capture);
    }
    if moves.is_empty() {
        return Ok((ctx.leaf(board), Vec::new()));
    }

    order_moves(board, ctx, &mut moves, maximizing)?;
    if on_pv {
        if let Some(&hinted) = ctx.hint.get(ply as usize) {
            if let Some(pos) = moves.iter().position(|&m| m == hinted) {
                let mv = moves.remove(pos);
                moves.insert(0, mv);
            }
        }
    }
    if let Some(beam) = ctx.limits.beam {
        if let Some(width) = beam_width(beam, ply, ctx.depth) {
            moves.truncate(width.max(1));
        }
    }

    // in quiescence the stand-pat score bounds the node: the side to move
    // may always decline the remaining captures
    let mut best_score;
    let mut best_pv = Vec::new();
    if quiescing {
        best_score = ctx.leaf(board);
        if maximizing {
            alpha = alpha.max(best_score);
        } else {
            beta = beta.min(best_score);
        }
        if ctx.limits.pruning && beta <= alpha {
            return Ok((best_score, best_pv));
        }
    } else {
        best_score = if maximizing { i32::MIN } else { i32::MAX };
    }

    for mv in moves {
        let child_on_pv = on_pv && ctx.hint.get(ply as usize) == Some(&mv);
        board.make_move(ctx.tables, mv)?;
        let child = alpha_beta(board, ctx, ply + 1, alpha, beta, child_on_pv);
        board.unmake_move()?;
        let (score, child_pv) = child?;

        let improved = if maximizing {
            score > best_score
        } else {
            score < best_score
        };
        if improved {
            best_score = score;
            best_pv.clear();
            best_pv.push(mv);
            best_pv.extend(child_pv);
            if maximizing {
                alpha = alpha.max(best_score);
            } else {
                beta = beta.min(best_score);
            }
        }
        if ctx.limits.pruning && beta <= alpha {
            ctx.stats.cutoffs += 1;
            break;
        }
    }
    Ok((best_score, best_pv))
}

/// Iterative deepening root driver. `hint` seeds move ordering along the
/// leftmost line; the PV of each completed iteration seeds the next.
pub(crate) fn search_root(
    board: &mut Board,
    tables: &Tables,
    evaluator: &mut Evaluator,
    limits: &SearchLimits,
    hint: &[Move],
) -> Result<SearchResult, StateCorruptionError> {
    let mut ctx = Context {
        tables,
        evaluator,
        limits,
        depth: 0,
        hint: hint.to_vec(),
        deadline: limits.max_time.map(|budget| Instant::now() + budget),
        stats: SearchStats::default(),
    };
    let mut result = SearchResult {
        best_move: None,
        score: ctx.evaluator.evaluate(board, tables, limits.eval_mode),
        pv: Vec::new(),
        stats: SearchStats::default(),
    };

    for depth in 1..=limits.max_depth {
        ctx.depth = depth;
        match alpha_beta(board, &mut ctx, 0, i32::MIN, i32::MAX, true) {
            Ok((score, pv)) => {
                ctx.stats.depth_completed = depth;
                result.score = score;
                result.best_move = pv.first().copied();
                result.pv = pv.clone();
                ctx.hint = pv;
                #[cfg(feature = "logging")]
                log::debug!(
                    "depth {depth} score {score} nodes {} best {:?}",
                    ctx.stats.nodes,
                    result.best_move,
                );
            }
            Err(Interrupt::BudgetExceeded) => break,
            Err(Interrupt::Corruption(err)) => return Err(err),
        }
    }
    result.stats = ctx.stats;
    Ok(result)
}

/// One-shot search entry point with no ordering hint. Callers that keep
/// the evaluator around get memo reuse; for PV reuse as well, hold an
/// [`Engine`](super::Engine) instead.
pub fn find_best_move(
    board: &mut Board,
    tables: &Tables,
    evaluator: &mut Evaluator,
    limits: &SearchLimits,
) -> Result<SearchResult, StateCorruptionError> {
    search_root(board, tables, evaluator, limits, &[])
}

/// Root-parallel search: every root child is searched to `max_depth` on its
/// own scoped thread with a cloned board and a private evaluator memo, and
/// the results are merged by extremum for the side to move. Children that
/// blow their budget are dropped from the merge.
pub fn find_best_move_parallel(
    board: &Board,
    tables: &Tables,
    limits: &SearchLimits,
) -> Result<SearchResult, StateCorruptionError> {
    let mover = board.side_to_move();
    let moves = board.clone().legal_moves(tables)?;
    if moves.is_empty() {
        return Ok(SearchResult {
            best_move: None,
            score: evaluate_fresh(board, tables, limits.eval_mode),
            pv: Vec::new(),
            stats: SearchStats::default(),
        });
    }

    let results: Mutex<Vec<(Move, i32, Vec<Move>, SearchStats)>> = Mutex::new(Vec::new());
    let failure: Mutex<Option<StateCorruptionError>> = Mutex::new(None);
    let deadline = limits.max_time.map(|budget| Instant::now() + budget);

    std::thread::scope(|scope| {
        for &mv in &moves {
            let results = &results;
            let failure = &failure;
            scope.spawn(move || {
                let mut child = board.clone();
                let mut evaluator = Evaluator::new();
                let mut ctx = Context {
                    tables,
                    evaluator: &mut evaluator,
                    limits,
                    depth: limits.max_depth,
                    hint: Vec::new(),
                    deadline,
                    stats: SearchStats::default(),
                };
                if let Err(err) = child.make_move(tables, mv) {
                    *failure.lock() = Some(err);
                    return;
                }
                match alpha_beta(&mut child, &mut ctx, 1, i32::MIN, i32::MAX, false) {
                    Ok((score, pv)) => {
                        ctx.stats.depth_completed = limits.max_depth;
                        results.lock().push((mv, score, pv, ctx.stats));
                    }
                    Err(Interrupt::BudgetExceeded) => {}
                    Err(Interrupt::Corruption(err)) => *failure.lock() = Some(err),
                }
            });
        }
    });

    if let Some(err) = failure.into_inner() {
        return Err(err);
    }

    let mut merged = SearchResult {
        best_move: None,
        score: if mover == Color::White { i32::MIN } else { i32::MAX },
        pv: Vec::new(),
        stats: SearchStats::default(),
    };
    for (mv, score, child_pv, stats) in results.into_inner() {
        merged.stats.absorb(stats);
        let improved = if mover == Color::White {
            score > merged.score
        } else {
            score < merged.score
        };
        if merged.best_move.is_none() || improved {
            merged.score = score;
            merged.best_move = Some(mv);
            merged.pv.clear();
            merged.pv.push(mv);
            merged.pv.extend(child_pv);
        }
    }
    if merged.best_move.is_none() {
        // every child ran out of budget; fall back to the first root move
        merged.best_move = moves.first().copied();
        merged.score = evaluate_fresh(board, tables, limits.eval_mode);
    }
    Ok(merged)
}
