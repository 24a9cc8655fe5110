//! Search driver behavior: events, cancellation, budgets, determinism.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use ferrochess::board::{
    Board, MaterialEvaluator, SearchEvent, SearchLimits, SearchParams, SearchState, START_FEN,
};
use ferrochess::{StopFlag, TranspositionTable};

const MIDDLEGAME: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

#[test]
fn events_arrive_in_depth_order() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let limits = SearchLimits::depth(4).with_progress(move |event| {
        sink.lock().unwrap().push(event.clone());
    });

    let mut board = Board::new();
    let mut state = SearchState::new(4);
    let result = state.search(&mut board, &MaterialEvaluator, &limits);

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 5, "four iterations and a final event");

    let mut last_nodes = 0;
    for (idx, event) in events[..4].iter().enumerate() {
        let SearchEvent::Iteration(report) = event else {
            panic!("expected an iteration event, got {event:?}");
        };
        assert_eq!(report.depth, idx as i32 + 1);
        assert!(!report.pv.is_empty());
        assert!(report.nodes >= last_nodes);
        assert!((0.0..=1.0).contains(&report.load_factor));
        last_nodes = report.nodes;
    }

    let SearchEvent::Completed(last) = &events[4] else {
        panic!("search must end with a completed event");
    };
    assert_eq!(last.depth, 4);
    assert_eq!(Some(last.pv[0]), result.best_move);
    assert_eq!(last.score, result.score);
}

#[test]
fn mate_report_carries_distance() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let limits = SearchLimits::depth(6).with_progress(move |event| {
        if let SearchEvent::Completed(report) = event {
            sink.lock().unwrap().push(report.clone());
        }
    });

    let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let mut state = SearchState::new(1);
    let result = state.search(&mut board, &MaterialEvaluator, &limits);

    let reports = events.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].mate_in, Some(1));
    assert_eq!(reports[0].pv_string(), "a1a8");
    assert_eq!(result.depth, 1, "a proven mate ends the search early");
}

#[test]
fn search_is_deterministic_after_clear() {
    let mut board = Board::from_fen(MIDDLEGAME).unwrap();
    let mut state = SearchState::new(4);
    let limits = SearchLimits::depth(5);

    let first = state.search(&mut board, &MaterialEvaluator, &limits);
    state.clear();
    assert_eq!(state.table().load_factor(), 0.0);
    let second = state.search(&mut board, &MaterialEvaluator, &limits);

    assert_eq!(first.best_move, second.best_move);
    assert_eq!(first.score, second.score);
    assert_eq!(first.pv, second.pv);
    assert_eq!(first.stats, second.stats);

    let mut other = SearchState::new(4);
    let third = other.search(&mut board, &MaterialEvaluator, &limits);
    assert_eq!(first.pv, third.pv);
    assert_eq!(first.stats.nodes, third.stats.nodes);
}

#[test]
fn stop_before_start_returns_a_legal_move() {
    let stop = StopFlag::new();
    stop.stop();
    let limits = SearchLimits::depth(10).with_stop(stop);

    let mut board = Board::new();
    let mut state = SearchState::new(1);
    let result = state.search(&mut board, &MaterialEvaluator, &limits);

    assert!(result.stopped);
    assert_eq!(result.depth, 0);
    let best = result.best_move.expect("fallback move");
    assert!(board.generate_moves().contains(best));
    assert_eq!(board.to_fen(), START_FEN);
}

#[test]
fn stop_from_another_thread() {
    let stop = StopFlag::new();
    let remote = stop.clone();
    let limits = SearchLimits::depth(64).with_stop(stop);

    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        remote.stop();
    });

    let mut board = Board::from_fen(MIDDLEGAME).unwrap();
    let mut state = SearchState::new(4);
    let result = state.search(&mut board, &MaterialEvaluator, &limits);
    handle.join().unwrap();

    assert!(result.stopped);
    assert!(result.best_move.is_some());
    assert_eq!(board.to_fen(), MIDDLEGAME);
}

#[test]
fn node_budget_is_respected() {
    let limits = SearchLimits::depth(64).with_nodes(20_000);
    let mut board = Board::new();
    let mut state = SearchState::new(1);
    let result = state.search(&mut board, &MaterialEvaluator, &limits);

    assert!(result.stopped);
    assert!(result.stats.nodes <= 20_000);
    assert!(result.depth >= 1);
    assert!(result.best_move.is_some());
}

#[test]
fn time_budget_is_respected() {
    let limits = SearchLimits::depth(64).with_time(Duration::from_millis(100));
    let mut board = Board::from_fen(MIDDLEGAME).unwrap();
    let mut state = SearchState::new(1);

    let start = Instant::now();
    let result = state.search(&mut board, &MaterialEvaluator, &limits);

    assert!(result.stopped);
    assert!(result.best_move.is_some());
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn aspiration_window_does_not_change_best_line_for_mate() {
    let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
    let mut narrow = SearchState::new(1);
    narrow.set_params(SearchParams {
        aspiration_delta: 5,
        aspiration_min_depth: 1,
        ..SearchParams::default()
    });

    let mut board = Board::from_fen(fen).unwrap();
    let result = narrow.search(&mut board, &MaterialEvaluator, &SearchLimits::depth(4));
    assert_eq!(result.best_move.map(|mv| mv.to_uci()).as_deref(), Some("h5f7"));
}

#[test]
fn shared_table_across_threads() {
    let table = Arc::new(TranspositionTable::new(4));
    let handles: Vec<_> = [START_FEN, MIDDLEGAME]
        .into_iter()
        .map(|fen| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                let mut board = Board::from_fen(fen).unwrap();
                let mut state = SearchState::with_table(table);
                let result = state.search(&mut board, &MaterialEvaluator, &SearchLimits::depth(4));
                let best = result.best_move.expect("a legal move");
                assert!(board.generate_moves().contains(best));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert!(table.load_factor() > 0.0);
}
