//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening with aspiration windows
//! - Principal variation search with null move pruning
//! - Quiescence search with stand-pat and SEE pruning
//! - Move ordering (TT move, killers, MVV-LVA, history)
//! - Transposition table for move ordering and cutoffs
//! - Per-iteration progress events and cooperative cancellation

mod alphabeta;
pub(crate) mod constants;
mod context;
mod iterative;
mod ordering;
mod params;
mod pv;
mod quiescence;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sync::StopFlag;
use crate::tt::{TranspositionTable, DEFAULT_TT_MB};

use super::eval::{Evaluator, MaterialEvaluator};
use super::{Board, Move};

pub use constants::{DRAW_SCORE, INFINITY, MATE_SCORE, MATE_THRESHOLD, MAX_DEPTH};
pub use ordering::{HistoryTable, KillerTable};
pub use params::SearchParams;

use context::SearchContext;

/// Snapshot of the search after a completed iteration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchReport {
    pub depth: i32,
    /// Centipawns from the side to move's point of view
    pub score: i32,
    /// Moves to mate, negative when being mated
    pub mate_in: Option<i32>,
    pub pv: Vec<Move>,
    pub nodes: u64,
    pub nps: u64,
    /// Transposition table occupancy, 0.0 to 1.0
    pub load_factor: f64,
    pub elapsed_ms: u64,
}

impl SearchReport {
    /// PV as space-separated coordinate moves.
    #[must_use]
    pub fn pv_string(&self) -> String {
        self.pv
            .iter()
            .map(|mv| mv.to_uci())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Progress notifications, delivered synchronously in depth order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchEvent {
    /// One iterative-deepening pass finished.
    Iteration(SearchReport),
    /// The search is over; carries the deepest completed iteration.
    Completed(SearchReport),
}

pub type ProgressCallback = Arc<dyn Fn(&SearchEvent) + Send + Sync>;

/// How long a search may run.
#[derive(Clone)]
pub struct SearchLimits {
    pub max_depth: i32,
    pub nodes: Option<u64>,
    pub time: Option<Duration>,
    pub stop: StopFlag,
    pub on_progress: Option<ProgressCallback>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            max_depth: MAX_DEPTH,
            nodes: None,
            time: None,
            stop: StopFlag::new(),
            on_progress: None,
        }
    }
}

impl fmt::Debug for SearchLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchLimits")
            .field("max_depth", &self.max_depth)
            .field("nodes", &self.nodes)
            .field("time", &self.time)
            .field("stop", &self.stop)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl SearchLimits {
    /// Depth-limited search.
    #[must_use]
    pub fn depth(max_depth: i32) -> Self {
        SearchLimits {
            max_depth,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_nodes(mut self, nodes: u64) -> Self {
        self.nodes = Some(nodes);
        self
    }

    #[must_use]
    pub fn with_time(mut self, time: Duration) -> Self {
        self.time = Some(time);
        self
    }

    #[must_use]
    pub fn with_stop(mut self, stop: StopFlag) -> Self {
        self.stop = stop;
        self
    }

    #[must_use]
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SearchEvent) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }
}

/// Counters for one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub qnodes: u64,
    pub tt_hits: u64,
    pub tt_cutoffs: u64,
    pub null_cutoffs: u64,
    pub seldepth: usize,
}

/// Outcome of a search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// `None` only when the side to move has no legal move
    pub best_move: Option<Move>,
    /// Expected reply, the second move of the PV
    pub ponder_move: Option<Move>,
    pub score: i32,
    /// Deepest completed iteration, 0 if none completed
    pub depth: i32,
    pub pv: Vec<Move>,
    pub stats: SearchStats,
    /// Cancelled by the stop flag or a budget before reaching `max_depth`
    pub stopped: bool,
}

/// Tables and settings that persist between searches.
pub struct SearchState {
    tt: Arc<TranspositionTable>,
    killers: KillerTable,
    history: HistoryTable,
    params: SearchParams,
    last_stats: SearchStats,
}

impl SearchState {
    /// State with a fresh table of `tt_mb` megabytes.
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        Self::with_table(Arc::new(TranspositionTable::new(tt_mb)))
    }

    /// State that uses (and may share) an existing table.
    #[must_use]
    pub fn with_table(tt: Arc<TranspositionTable>) -> Self {
        SearchState {
            tt,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            params: SearchParams::default(),
            last_stats: SearchStats::default(),
        }
    }

    #[must_use]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut SearchParams {
        &mut self.params
    }

    pub fn set_params(&mut self, params: SearchParams) {
        self.params = params;
    }

    #[must_use]
    pub fn table(&self) -> &TranspositionTable {
        &self.tt
    }

    #[must_use]
    pub fn shared_table(&self) -> Arc<TranspositionTable> {
        Arc::clone(&self.tt)
    }

    /// Counters from the most recent search.
    #[must_use]
    pub fn last_stats(&self) -> SearchStats {
        self.last_stats
    }

    /// Forget everything learned: table entries, killers and history.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.killers.reset();
        self.history.reset();
        self.last_stats = SearchStats::default();
    }

    /// Run iterative deepening on `board` within `limits`.
    ///
    /// The board is restored to its original state before this returns.
    pub fn search<E>(&mut self, board: &mut Board, evaluator: &E, limits: &SearchLimits) -> SearchResult
    where
        E: Evaluator + ?Sized,
    {
        self.tt.new_search();
        self.killers.reset();
        self.history.reset();

        let mut ctx = SearchContext::new(
            &self.tt,
            &mut self.killers,
            &mut self.history,
            &self.params,
            evaluator,
            limits,
        );
        let result = ctx.iterative_deepening(board);
        self.last_stats = result.stats;
        result
    }
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::new(DEFAULT_TT_MB)
    }
}

/// Depth-limited search with the default evaluator and a fresh table.
///
/// # Example
/// ```
/// use ferrochess::board::{find_best_move, Board};
///
/// let mut board: Board = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1".parse().unwrap();
/// let best = find_best_move(&mut board, 3).unwrap();
/// assert_eq!(best.to_string(), "a1a8");
/// ```
pub fn find_best_move(board: &mut Board, max_depth: i32) -> Option<Move> {
    let mut state = SearchState::new(1);
    state
        .search(board, &MaterialEvaluator, &SearchLimits::depth(max_depth))
        .best_move
}
