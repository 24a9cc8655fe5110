#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::MAX_PLY;

/// Tuning knobs for the search. None of these change which positions are
/// legal or how scores are defined, only how much of the tree is examined.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SearchParams {
    /// Null-move reduction R at shallow depth
    pub null_move_reduction: i32,
    /// R grows by one every this many plies of remaining depth
    pub null_move_depth_divisor: i32,
    /// Null move is only tried with at least this much depth left
    pub null_move_min_depth: i32,
    /// Half-width of the first aspiration window, in centipawns
    pub aspiration_delta: i32,
    /// Window half-width is multiplied by this after each fail
    pub aspiration_growth: i32,
    /// Iterations below this depth use a full window
    pub aspiration_min_depth: i32,
    /// Half-width past which the window is opened completely
    pub aspiration_max_delta: i32,
    /// Hard ply cap for quiescence
    pub qsearch_max_ply: usize,
    /// Nodes between wall-clock checks
    pub check_interval: u64,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            null_move_reduction: 2,
            null_move_depth_divisor: 6,
            null_move_min_depth: 3,
            aspiration_delta: 30,
            aspiration_growth: 2,
            aspiration_min_depth: 4,
            aspiration_max_delta: 1000,
            qsearch_max_ply: MAX_PLY - 1,
            check_interval: 2048,
        }
    }
}

impl SearchParams {
    /// Depth reduction for a null-move search with `depth` plies left.
    #[must_use]
    pub fn null_move_reduction_at(&self, depth: i32) -> i32 {
        self.null_move_reduction + depth / self.null_move_depth_divisor.max(1)
    }
}
