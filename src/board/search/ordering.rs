//! Move ordering: killer moves, history heuristic and per-move scores.

use crate::board::{Board, Color, Move, MoveList, Piece, ScoredMoveList, MAX_PLY};

use super::constants::{CAPTURE_SCORE, HISTORY_MAX, KILLER1_SCORE, KILLER2_SCORE, TT_MOVE_SCORE};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KillerSlot {
    mv: Move,
    hits: u32,
}

/// Two quiet cutoff moves per ply. Each slot counts how often its move cut
/// off; a new move evicts the slot with fewer hits.
#[derive(Clone, Debug)]
pub struct KillerTable {
    slots: Box<[[KillerSlot; 2]; MAX_PLY]>,
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: Box::new([[KillerSlot::default(); 2]; MAX_PLY]),
        }
    }

    /// Note a quiet move that caused a beta cutoff at `ply`.
    pub fn record(&mut self, ply: usize, mv: Move) {
        let Some(pair) = self.slots.get_mut(ply) else {
            return;
        };
        if let Some(slot) = pair.iter_mut().find(|slot| slot.mv == mv) {
            slot.hits = slot.hits.saturating_add(1);
            return;
        }
        // Ties evict the second slot
        let victim = if pair[0].hits < pair[1].hits { 0 } else { 1 };
        pair[victim] = KillerSlot { mv, hits: 1 };
    }

    /// Killers at `ply`, most frequent first. Empty slots are `Move::NULL`.
    #[must_use]
    pub fn get(&self, ply: usize) -> [Move; 2] {
        match self.slots.get(ply) {
            Some([a, b]) if b.hits > a.hits => [b.mv, a.mv],
            Some([a, b]) => [a.mv, b.mv],
            None => [Move::NULL; 2],
        }
    }

    pub fn reset(&mut self) {
        self.slots.fill([KillerSlot::default(); 2]);
    }
}

/// Cutoff counts for quiet moves by (color, piece, destination).
#[derive(Clone, Debug)]
pub struct HistoryTable {
    entries: Box<[[[i32; 64]; 6]; 2]>,
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable {
            entries: Box::new([[[0; 64]; 6]; 2]),
        }
    }

    #[must_use]
    pub fn score(&self, color: Color, piece: Piece, mv: Move) -> i32 {
        self.entries[color.index()][piece.index()][mv.to().index()]
    }

    /// Reward a quiet cutoff move with `depth * depth`. Halves the whole
    /// table once any entry passes the quiet-move ceiling.
    pub fn reward(&mut self, color: Color, piece: Piece, mv: Move, depth: i32) {
        let bonus = depth.max(1).saturating_mul(depth.max(1)).min(HISTORY_MAX);
        let entry = &mut self.entries[color.index()][piece.index()][mv.to().index()];
        *entry = entry.saturating_add(bonus);
        if *entry > HISTORY_MAX {
            self.age();
        }
    }

    fn age(&mut self) {
        for entry in self.entries.iter_mut().flatten().flatten() {
            *entry /= 2;
        }
    }

    pub fn reset(&mut self) {
        for entry in self.entries.iter_mut().flatten().flatten() {
            *entry = 0;
        }
    }
}

/// Most valuable victim, least valuable attacker. Promotions count the
/// promoted piece as material won.
pub(super) fn mvv_lva(board: &Board, mv: Move) -> i32 {
    let victim = mv.captured().map_or(0, Piece::value);
    let promotion = mv.promotion_piece().map_or(0, Piece::value);
    let attacker = board.piece_on(mv.from()).map_or(0, |p| p.index() as i32);
    (victim + promotion) * 8 - attacker
}

pub(super) fn order_moves(
    board: &Board,
    moves: &MoveList,
    tt_move: Option<Move>,
    killers: [Move; 2],
    history: &HistoryTable,
) -> ScoredMoveList {
    let us = board.side_to_move();
    let mut scored = ScoredMoveList::new();
    for &mv in moves {
        let score = if Some(mv) == tt_move {
            TT_MOVE_SCORE
        } else if mv.is_capture() || mv.is_promotion() {
            CAPTURE_SCORE + mvv_lva(board, mv)
        } else if mv == killers[0] {
            KILLER1_SCORE
        } else if mv == killers[1] {
            KILLER2_SCORE
        } else {
            board
                .piece_on(mv.from())
                .map_or(0, |piece| history.score(us, piece, mv))
                .min(HISTORY_MAX)
        };
        scored.push(mv, score);
    }
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    fn quiet(from: u8, to: u8) -> Move {
        Move::new(Square(from), Square(to), None)
    }

    #[test]
    fn killer_hits_decide_order_and_eviction() {
        let mut killers = KillerTable::new();
        let a = quiet(12, 28);
        let b = quiet(6, 21);
        let c = quiet(1, 18);

        killers.record(3, a);
        assert_eq!(killers.get(3), [a, Move::NULL]);

        killers.record(3, b);
        killers.record(3, b);
        assert_eq!(killers.get(3), [b, a]);

        // `a` has fewer hits, so `c` takes its slot
        killers.record(3, c);
        assert_eq!(killers.get(3), [b, c]);

        assert_eq!(killers.get(4), [Move::NULL; 2]);
        assert_eq!(killers.get(MAX_PLY + 5), [Move::NULL; 2]);

        killers.reset();
        assert_eq!(killers.get(3), [Move::NULL; 2]);
    }

    #[test]
    fn history_rewards_square_of_depth_and_ages() {
        let mut history = HistoryTable::new();
        let mv = quiet(12, 28);
        history.reward(Color::White, Piece::Pawn, mv, 4);
        assert_eq!(history.score(Color::White, Piece::Pawn, mv), 16);
        assert_eq!(history.score(Color::Black, Piece::Pawn, mv), 0);

        history.reward(Color::White, Piece::Pawn, mv, 400);
        assert!(history.score(Color::White, Piece::Pawn, mv) <= HISTORY_MAX);

        history.reset();
        assert_eq!(history.score(Color::White, Piece::Pawn, mv), 0);
    }

    #[test]
    fn ordering_puts_hash_move_then_killers_then_captures() {
        let board: Board = "4k3/8/8/3p4/4P3/8/8/4K1N1 w - - 0 1".parse().unwrap();
        let moves = board.generate_moves();
        let capture = board.parse_move("e4d5").unwrap();
        let hash_move = board.parse_move("g1f3").unwrap();
        let killer = board.parse_move("e1d2").unwrap();

        let mut scored = order_moves(
            &board,
            &moves,
            Some(hash_move),
            [killer, Move::NULL],
            &HistoryTable::new(),
        );
        let first = scored.pick_best(0).unwrap();
        let second = scored.pick_best(1).unwrap();
        let third = scored.pick_best(2).unwrap();
        assert_eq!(first.mv, hash_move);
        assert_eq!(second.mv, killer);
        assert_eq!(third.mv, capture);
    }

    #[test]
    fn mvv_lva_prefers_cheaper_attacker() {
        let board: Board = "7k/8/8/3r4/2P1Q3/8/8/4K3 w - - 0 1".parse().unwrap();
        let by_pawn = board.parse_move("c4d5").unwrap();
        let by_queen = board.parse_move("e4d5").unwrap();
        assert!(mvv_lva(&board, by_pawn) > mvv_lva(&board, by_queen));
    }
}
