use crate::board::eval::Evaluator;
use crate::board::{Board, ScoredMoveList};

use super::constants::{INFINITY, MATE_SCORE};
use super::context::SearchContext;
use super::ordering::mvv_lva;

impl<E: Evaluator + ?Sized> SearchContext<'_, E> {
    /// Captures-only search below the horizon, or every evasion when in check.
    pub(super) fn quiescence(&mut self, board: &mut Board, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        self.stats.nodes += 1;
        self.stats.qnodes += 1;
        self.stats.seldepth = self.stats.seldepth.max(ply);
        if self.should_stop() {
            return 0;
        }
        if ply >= self.params.qsearch_max_ply {
            return self.evaluate(board);
        }

        let in_check = board.is_in_check();
        let mut best_score;
        let moves = if in_check {
            let evasions = board.generate_moves();
            if evasions.is_empty() {
                return -MATE_SCORE + ply as i32;
            }
            best_score = -INFINITY;
            evasions
        } else {
            let stand_pat = self.evaluate(board);
            if stand_pat >= beta {
                return stand_pat;
            }
            alpha = alpha.max(stand_pat);
            best_score = stand_pat;
            board.generate_captures()
        };

        let mut ordered = ScoredMoveList::new();
        for &mv in &moves {
            ordered.push(mv, mvv_lva(board, mv));
        }

        for idx in 0..ordered.len() {
            let Some(scored) = ordered.pick_best(idx) else {
                break;
            };
            let mv = scored.mv;
            // Losing exchanges cannot raise a stand-pat score
            if !in_check && board.see(mv) < 0 {
                continue;
            }

            let score = -self.quiescence(&mut board.play(mv), -beta, -alpha, ply + 1);
            if self.stopped {
                return 0;
            }

            if score > best_score {
                best_score = score;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }

        best_score
    }
}
