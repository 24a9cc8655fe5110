use crate::board::eval::Evaluator;
use crate::board::{Board, Move};
use crate::sync::Deadline;
use crate::tt::TranspositionTable;

use super::constants::{MATE_SCORE, MATE_THRESHOLD};
use super::ordering::{HistoryTable, KillerTable};
use super::{SearchLimits, SearchParams, SearchReport, SearchStats};

/// Everything one search call works with. The board is passed separately
/// to each recursive call so moves can be played through scoped guards.
pub(super) struct SearchContext<'a, E: Evaluator + ?Sized> {
    pub(super) tt: &'a TranspositionTable,
    pub(super) killers: &'a mut KillerTable,
    pub(super) history: &'a mut HistoryTable,
    pub(super) params: &'a SearchParams,
    pub(super) evaluator: &'a E,
    pub(super) limits: &'a SearchLimits,
    pub(super) deadline: Deadline,
    pub(super) stats: SearchStats,
    pub(super) stopped: bool,
    /// Best root move of the iteration in progress
    pub(super) root_best: Option<Move>,
}

impl<'a, E: Evaluator + ?Sized> SearchContext<'a, E> {
    pub(super) fn new(
        tt: &'a TranspositionTable,
        killers: &'a mut KillerTable,
        history: &'a mut HistoryTable,
        params: &'a SearchParams,
        evaluator: &'a E,
        limits: &'a SearchLimits,
    ) -> Self {
        SearchContext {
            tt,
            killers,
            history,
            params,
            evaluator,
            limits,
            deadline: Deadline::starting_now(limits.time),
            stats: SearchStats::default(),
            stopped: false,
            root_best: None,
        }
    }

    /// Poll the stop flag and budgets. Sticky once raised.
    pub(super) fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        let interval = self.params.check_interval.max(1);
        self.stopped = self.limits.stop.is_stopped()
            || self.limits.nodes.is_some_and(|budget| self.stats.nodes >= budget)
            || (self.stats.nodes % interval == 0 && self.deadline.expired());
        self.stopped
    }

    /// Static score, kept out of the mate band.
    pub(super) fn evaluate(&self, board: &Board) -> i32 {
        self.evaluator
            .evaluate(board)
            .clamp(-MATE_THRESHOLD + 1, MATE_THRESHOLD - 1)
    }

    pub(super) fn report(&self, depth: i32, score: i32, pv: Vec<Move>) -> SearchReport {
        SearchReport {
            depth,
            score,
            mate_in: mate_in(score),
            pv,
            nodes: self.stats.nodes,
            nps: self.deadline.nps(self.stats.nodes),
            load_factor: self.tt.load_factor(),
            elapsed_ms: self.deadline.elapsed().as_millis() as u64,
        }
    }
}

/// Full moves to mate for a mate score.
pub(super) fn mate_in(score: i32) -> Option<i32> {
    if score >= MATE_THRESHOLD {
        Some((MATE_SCORE - score + 1) / 2)
    } else if score <= -MATE_THRESHOLD {
        Some(-(MATE_SCORE + score + 1) / 2)
    } else {
        None
    }
}

/// Mate scores are stored relative to the node, not the root.
pub(super) fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply as i32
    } else if score <= -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

pub(super) fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply as i32
    } else if score <= -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mate_distance_in_moves() {
        assert_eq!(mate_in(MATE_SCORE - 1), Some(1));
        assert_eq!(mate_in(MATE_SCORE - 3), Some(2));
        assert_eq!(mate_in(-(MATE_SCORE - 2)), Some(-1));
        assert_eq!(mate_in(150), None);
    }

    #[test]
    fn tt_mate_scores_are_node_relative() {
        let at_root = MATE_SCORE - 7;
        let stored = score_to_tt(at_root - 3, 3);
        assert_eq!(stored, at_root);
        assert_eq!(score_from_tt(stored, 5), at_root - 5);

        assert_eq!(score_to_tt(-(MATE_SCORE - 4), 2), -(MATE_SCORE - 2));
        assert_eq!(score_to_tt(250, 9), 250);
        assert_eq!(score_from_tt(-250, 9), -250);
    }
}
