//! Score bounds and move ordering priorities.

use crate::board::MAX_PLY;

/// Score of being checkmated at the root; mated at ply `n` scores `-MATE_SCORE + n`.
pub const MATE_SCORE: i32 = 30_000;

/// Scores with absolute value at or above this are mate scores.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 2 * MAX_PLY as i32;

/// Window bound strictly outside every reachable score. Fits the table's `i16`.
pub const INFINITY: i32 = 32_000;

pub const DRAW_SCORE: i32 = 0;

/// Iterative deepening cap when the caller gives none.
pub const MAX_DEPTH: i32 = 64;

// Ordering: hash move, killers, captures and promotions, then quiet history.
pub(super) const TT_MOVE_SCORE: i32 = 1 << 20;
pub(super) const KILLER1_SCORE: i32 = 1 << 18;
pub(super) const KILLER2_SCORE: i32 = (1 << 18) - 1;
pub(super) const CAPTURE_SCORE: i32 = 1 << 17;
/// Quiet moves never reach the capture band
pub(crate) const HISTORY_MAX: i32 = (1 << 16) - 1;
