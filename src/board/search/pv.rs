use crate::board::eval::Evaluator;
use crate::board::{Board, Move};
use crate::tt::TranspositionTable;

use super::context::SearchContext;

impl<E: Evaluator + ?Sized> SearchContext<'_, E> {
    /// Principal variation starting with `root_move`, continued by following
    /// table moves. The board is back in its original state afterwards.
    pub(super) fn extract_pv(&self, board: &mut Board, root_move: Move, max_len: usize) -> Vec<Move> {
        let mut pv = vec![root_move];
        let mut seen = vec![board.hash()];
        let mut child = board.play(root_move);
        follow_table(self.tt, &mut child, max_len.saturating_sub(1), &mut pv, &mut seen);
        pv
    }
}

/// Each step is played through a guard, so unwinding the recursion undoes it.
fn follow_table(
    tt: &TranspositionTable,
    board: &mut Board,
    remaining: usize,
    pv: &mut Vec<Move>,
    seen: &mut Vec<u64>,
) {
    if remaining == 0 {
        return;
    }
    let hash = board.hash();
    // A repeated hash means a cycle through the table
    if seen.contains(&hash) {
        return;
    }
    let Some(mv) = tt.probe(hash).and_then(|entry| entry.best_move()) else {
        return;
    };
    if !board.generate_moves().contains(mv) {
        return;
    }

    seen.push(hash);
    pv.push(mv);
    let mut child = board.play(mv);
    follow_table(tt, &mut child, remaining - 1, pv, seen);
}
