//! Search behavior on small tactical positions.

use crate::board::{
    Board, Color, MaterialEvaluator, SearchLimits, SearchParams, SearchState, DRAW_SCORE,
    MATE_SCORE,
};

fn search(fen: &str, depth: i32) -> crate::board::SearchResult {
    let mut board = Board::from_fen(fen).unwrap();
    let mut state = SearchState::new(1);
    state.search(&mut board, &MaterialEvaluator, &SearchLimits::depth(depth))
}

#[test]
fn finds_mate_in_one() {
    let result = search("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1", 3);
    assert_eq!(result.best_move.map(|mv| mv.to_uci()).as_deref(), Some("e1e8"));
    assert_eq!(result.score, MATE_SCORE - 1);
    assert!(!result.stopped);
}

#[test]
fn stalemated_root_has_no_move() {
    let result = search("k7/8/1QK5/8/8/8/8/8 b - - 0 1", 4);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, DRAW_SCORE);
    assert!(result.pv.is_empty());
}

#[test]
fn checkmated_root_scores_mate() {
    let result = search("7k/7Q/7K/8/8/8/8/8 b - - 0 1", 4);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, -MATE_SCORE);
}

#[test]
fn wins_undefended_queen() {
    let result = search("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1", 3);
    assert_eq!(result.best_move.map(|mv| mv.to_uci()).as_deref(), Some("d2d5"));
    assert!(result.score > 400);
}

#[test]
fn quiescence_sees_the_recapture() {
    // Qxd5 drops the queen to the rook on d8
    let result = search("3r3k/8/8/3p4/8/8/8/3QK3 w - - 0 1", 1);
    let best = result.best_move.map(|mv| mv.to_uci());
    assert_ne!(best.as_deref(), Some("d1d5"));
    assert!(result.stats.qnodes > 0);
}

#[test]
fn board_restored_after_search() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut board = Board::from_fen(fen).unwrap();
    let hash = board.hash();
    let mut state = SearchState::new(1);
    let result = state.search(&mut board, &MaterialEvaluator, &SearchLimits::depth(3));

    assert_eq!(board.to_fen(), fen);
    assert_eq!(board.hash(), hash);
    assert_eq!(board.repetition_count(), 1);
    assert_eq!(result.depth, 3);
}

#[test]
fn pv_is_legal_and_ponder_follows_it() {
    let mut board = Board::new();
    let mut state = SearchState::new(1);
    let result = state.search(&mut board, &MaterialEvaluator, &SearchLimits::depth(4));

    assert!(!result.pv.is_empty());
    assert_eq!(result.best_move, result.pv.first().copied());
    assert_eq!(result.ponder_move, result.pv.get(1).copied());

    let mut replay = Board::new();
    for &mv in &result.pv {
        assert!(replay.generate_moves().contains(mv), "{mv} not legal in PV");
        replay.make_move(mv);
    }
}

#[test]
fn table_is_reused_across_searches() {
    let mut board = Board::new();
    let mut state = SearchState::new(1);
    state.search(&mut board, &MaterialEvaluator, &SearchLimits::depth(3));
    assert!(state.table().load_factor() > 0.0);

    let result = state.search(&mut board, &MaterialEvaluator, &SearchLimits::depth(3));
    assert!(result.stats.tt_hits > 0);
    assert_eq!(state.last_stats(), result.stats);
}

#[test]
fn null_move_can_be_disabled() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
    let mut board = Board::from_fen(fen).unwrap();
    let mut state = SearchState::new(1);
    state.set_params(SearchParams {
        null_move_min_depth: i32::MAX,
        ..SearchParams::default()
    });
    let result = state.search(&mut board, &MaterialEvaluator, &SearchLimits::depth(4));
    assert_eq!(result.stats.null_cutoffs, 0);
    assert!(result.best_move.is_some());
}

#[test]
fn custom_evaluator_closure() {
    let mut board = Board::new();
    let mut state = SearchState::new(1);
    let flat = |_: &Board| 0;
    let result = state.search(&mut board, &flat, &SearchLimits::depth(2));
    assert_eq!(result.score, 0);
    assert!(board.generate_moves().contains(result.best_move.unwrap()));
}

#[test]
fn single_legal_move_stops_after_first_iteration() {
    // Rd1 is the only answer to the check
    let result = search("k7/8/8/8/3R4/8/6PP/r6K w - - 0 1", 8);
    assert_eq!(result.best_move.map(|mv| mv.to_uci()).as_deref(), Some("d4d1"));
    assert_eq!(result.depth, 1);
    assert!(!result.stopped);
}

/// Every position is lost for White unless the game ends in a draw.
fn white_is_lost(board: &Board) -> i32 {
    if board.side_to_move() == Color::White {
        -900
    } else {
        900
    }
}

#[test]
fn repetition_below_root_scores_as_draw() {
    let mut board = Board::new();
    let shuffle = ["b1c3", "g8f6", "c3b1", "f6g8"];
    board.play_moves(shuffle.iter().chain(shuffle.iter()).copied()).unwrap();
    assert_eq!(board.repetition_count(), 3);

    for depth in 1..=4 {
        let mut state = SearchState::new(1);
        let result = state.search(&mut board, &white_is_lost, &SearchLimits::depth(depth));
        assert_eq!(result.best_move.map(|mv| mv.to_uci()).as_deref(), Some("b1c3"), "depth {depth}");
        assert_eq!(result.score, DRAW_SCORE, "depth {depth}");
    }
}

#[test]
fn fifty_move_limit_below_root_scores_as_draw() {
    // Any king move reaches a halfmove clock of 100; e2e4 resets it
    let mut board = Board::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 99 80").unwrap();
    for depth in 1..=3 {
        let mut state = SearchState::new(1);
        let result = state.search(&mut board, &white_is_lost, &SearchLimits::depth(depth));
        let best = result.best_move.map(|mv| mv.to_uci()).unwrap();
        assert!(best.starts_with("e1"), "depth {depth}: {best}");
        assert_eq!(result.score, DRAW_SCORE, "depth {depth}");
    }
}

#[test]
fn dead_drawn_root_stops_after_first_iteration() {
    let result = search("8/8/4k3/8/8/3NK3/8/8 w - - 0 1", 8);
    assert_eq!(result.depth, 1);
    assert_eq!(result.score, DRAW_SCORE);
    assert!(result.best_move.is_some());
    assert!(!result.stopped);
}
