use crate::board::eval::Evaluator;
use crate::board::{Board, Move, MAX_PLY};
use crate::tt::BoundType;

use super::constants::{DRAW_SCORE, INFINITY, MATE_SCORE, MATE_THRESHOLD};
use super::context::{score_from_tt, score_to_tt, SearchContext};
use super::ordering::order_moves;

impl<E: Evaluator + ?Sized> SearchContext<'_, E> {
    /// Negamax alpha-beta with principal variation search.
    ///
    /// Returns a fail-soft score for the side to move. After cancellation the
    /// return value is meaningless and nothing is written to the table.
    pub(super) fn alphabeta(
        &mut self,
        board: &mut Board,
        mut alpha: i32,
        mut beta: i32,
        depth: i32,
        ply: usize,
        allow_null: bool,
    ) -> i32 {
        if ply > 0 && (board.is_threefold_repetition() || board.is_fifty_move_draw()) {
            return DRAW_SCORE;
        }

        let hash = board.hash();
        let mut tt_move = None;
        if let Some(entry) = self.tt.probe(hash) {
            self.stats.tt_hits += 1;
            tt_move = entry.best_move();
            if ply > 0 && entry.depth() >= depth {
                let score = score_from_tt(entry.score(), ply);
                match entry.bound_type() {
                    BoundType::Exact => {
                        self.stats.tt_cutoffs += 1;
                        return score;
                    }
                    BoundType::LowerBound => alpha = alpha.max(score),
                    BoundType::UpperBound => beta = beta.min(score),
                }
                if alpha >= beta {
                    self.stats.tt_cutoffs += 1;
                    return score;
                }
            }
        }

        if depth <= 0 {
            return self.quiescence(board, alpha, beta, ply);
        }

        self.stats.nodes += 1;
        if self.should_stop() {
            return 0;
        }
        if ply >= MAX_PLY - 1 {
            return self.evaluate(board);
        }

        let in_check = board.is_in_check();
        let us = board.side_to_move();

        // Null move: hand the opponent a free move. Failing high anyway means
        // a real move would too. Unsound in zugzwang, hence the pawn-ending guard.
        if allow_null
            && ply > 0
            && !in_check
            && depth >= self.params.null_move_min_depth
            && beta.abs() < MATE_THRESHOLD
            && board.has_non_pawn_material(us)
        {
            let reduction = self.params.null_move_reduction_at(depth);
            let score = {
                let mut child = board.play_null();
                -self.alphabeta(&mut child, -beta, -beta + 1, depth - 1 - reduction, ply + 1, false)
            };
            if self.stopped {
                return 0;
            }
            if score >= beta {
                self.stats.null_cutoffs += 1;
                return beta;
            }
        }

        let moves = board.generate_moves();
        if moves.is_empty() {
            return if in_check {
                -MATE_SCORE + ply as i32
            } else {
                DRAW_SCORE
            };
        }

        let mut ordered = order_moves(board, &moves, tt_move, self.killers.get(ply), &*self.history);
        let window_alpha = alpha;
        let mut best_score = -INFINITY;
        let mut best_move: Option<Move> = None;

        for idx in 0..ordered.len() {
            let Some(scored) = ordered.pick_best(idx) else {
                break;
            };
            let mv = scored.mv;
            let moving_piece = board.piece_on(mv.from());

            let score = {
                let mut child = board.play(mv);
                if idx == 0 {
                    -self.alphabeta(&mut child, -beta, -alpha, depth - 1, ply + 1, true)
                } else {
                    let probe =
                        -self.alphabeta(&mut child, -alpha - 1, -alpha, depth - 1, ply + 1, true);
                    if probe > alpha && probe < beta && !self.stopped {
                        -self.alphabeta(&mut child, -beta, -alpha, depth - 1, ply + 1, true)
                    } else {
                        probe
                    }
                }
            };
            if self.stopped {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
                if ply == 0 {
                    self.root_best = Some(mv);
                }
            }
            if alpha >= beta {
                if mv.is_quiet() {
                    self.killers.record(ply, mv);
                    if let Some(piece) = moving_piece {
                        self.history.reward(us, piece, mv, depth);
                    }
                }
                break;
            }
        }

        let bound = if best_score >= beta {
            BoundType::LowerBound
        } else if best_score > window_alpha {
            BoundType::Exact
        } else {
            BoundType::UpperBound
        };
        self.tt
            .store(hash, depth, score_to_tt(best_score, ply), bound, best_move);

        best_score
    }
}
