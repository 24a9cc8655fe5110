use crate::board::eval::Evaluator;
use crate::board::Board;

use super::constants::{DRAW_SCORE, INFINITY, MATE_SCORE, MATE_THRESHOLD};
use super::context::SearchContext;
use super::{SearchEvent, SearchReport, SearchResult};

impl<E: Evaluator + ?Sized> SearchContext<'_, E> {
    /// Search depth 1, 2, ... until `max_depth`, a proven mate or dead draw,
    /// a forced move, or cancellation. Reports only completed iterations.
    pub(super) fn iterative_deepening(&mut self, board: &mut Board) -> SearchResult {
        let root_moves = board.generate_moves();
        if root_moves.is_empty() {
            let score = if board.is_in_check() { -MATE_SCORE } else { DRAW_SCORE };
            let report = self.report(0, score, Vec::new());
            self.emit(SearchEvent::Completed(report.clone()));
            return self.finish(report, false);
        }

        let max_depth = self.limits.max_depth.max(1);
        // Material can only shrink, so a dead position stays drawn on every line
        let dead_draw = board.is_insufficient_material();
        let mut completed: Option<SearchReport> = None;

        for depth in 1..=max_depth {
            let guess = completed.as_ref().map_or(0, |report| report.score);
            let score = self.aspiration(board, depth, guess);
            if self.stopped {
                break;
            }
            let score = if dead_draw { DRAW_SCORE } else { score };
            let Some(best) = self.root_best else {
                break;
            };

            let pv = self.extract_pv(board, best, depth as usize);
            let report = self.report(depth, score, pv);
            log::debug!(
                "depth {} score {} nodes {} nps {} pv {}",
                report.depth,
                report.score,
                report.nodes,
                report.nps,
                report.pv_string()
            );
            self.emit(SearchEvent::Iteration(report.clone()));
            completed = Some(report);

            // A mate within the horizon is already the shortest one
            let mate_proven =
                score.abs() >= MATE_THRESHOLD && MATE_SCORE - score.abs() <= depth;
            if mate_proven || dead_draw || root_moves.len() == 1 {
                break;
            }
            if self.deadline.expired() || self.should_stop() {
                self.stopped = true;
                break;
            }
        }

        if self.stopped {
            log::info!(
                "search stopped after {} nodes at depth {}",
                self.stats.nodes,
                completed.as_ref().map_or(0, |report| report.depth)
            );
        }

        // Cancelled before depth 1 finished: fall back to the partial root
        // result, or the first legal move
        let report = completed.unwrap_or_else(|| {
            let mv = self.root_best.unwrap_or(root_moves[0]);
            self.report(0, 0, vec![mv])
        });
        self.emit(SearchEvent::Completed(report.clone()));
        let stopped = self.stopped;
        self.finish(report, stopped)
    }

    /// One iteration inside a window around `guess`, widened on each fail.
    fn aspiration(&mut self, board: &mut Board, depth: i32, guess: i32) -> i32 {
        let params = self.params;
        if depth < params.aspiration_min_depth || guess.abs() >= MATE_THRESHOLD {
            self.root_best = None;
            return self.alphabeta(board, -INFINITY, INFINITY, depth, 0, true);
        }

        let mut delta = params.aspiration_delta.max(1);
        let mut alpha = (guess - delta).max(-INFINITY);
        let mut beta = (guess + delta).min(INFINITY);
        loop {
            self.root_best = None;
            let score = self.alphabeta(board, alpha, beta, depth, 0, true);
            if self.stopped {
                return score;
            }

            if score <= alpha {
                log::trace!("depth {depth}: fail low at {score}, window [{alpha}, {beta}]");
                alpha = (alpha - delta).max(-INFINITY);
            } else if score >= beta {
                log::trace!("depth {depth}: fail high at {score}, window [{alpha}, {beta}]");
                beta = (beta + delta).min(INFINITY);
            } else {
                return score;
            }

            delta = delta.saturating_mul(params.aspiration_growth.max(2));
            if delta >= params.aspiration_max_delta {
                alpha = -INFINITY;
                beta = INFINITY;
            }
        }
    }

    fn emit(&self, event: SearchEvent) {
        if let Some(callback) = &self.limits.on_progress {
            callback(&event);
        }
    }

    fn finish(&self, report: SearchReport, stopped: bool) -> SearchResult {
        SearchResult {
            best_move: report.pv.first().copied(),
            ponder_move: report.pv.get(1).copied(),
            score: report.score,
            depth: report.depth,
            pv: report.pv,
            stats: self.stats,
            stopped,
        }
    }
}
