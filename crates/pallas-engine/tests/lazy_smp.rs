//! Multi-worker searches: correctness under several thread counts and the
//! behaviour of both cancellation tiers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use pallas_core::Board;
use pallas_engine::{Engine, EngineConfig, SearchControl, SearchLimits, SearchResult, VALUE_WIN};

const SCHOLARS_MATE_FEN: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
const SICILIAN_FEN: &str = "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2";
const RUY_LOPEZ_FEN: &str = "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3";
const ENDGAME_FEN: &str = "8/8/8/3k4/8/3K4/4P3/8 w - - 0 1";

fn engine(threads: usize) -> Engine {
    Engine::new(EngineConfig { threads, hash_mb: 16 }).unwrap()
}

fn search(board: &Board, threads: usize, limits: SearchLimits) -> SearchResult {
    let control = SearchControl::new(Arc::new(AtomicBool::new(false)), limits);
    engine(threads).search(board, &control, |_| {})
}

fn is_legal(board: &Board, result: &SearchResult) -> bool {
    board
        .generate_all_legal_moves()
        .iter()
        .any(|em| em.mv == result.best_move)
}

#[test]
fn returns_legal_move_for_each_thread_count() {
    let board = Board::starting_position();
    for threads in [1, 2, 4] {
        let result = search(&board, threads, SearchLimits::depth(4));
        assert!(is_legal(&board, &result), "{threads} threads");
        assert!(result.depth >= 4);
    }
}

#[test]
fn helpers_still_find_mate_in_one() {
    let board: Board = SCHOLARS_MATE_FEN.parse().unwrap();
    let result = search(&board, 4, SearchLimits::depth(3));
    assert_eq!(result.best_move.to_uci(), "h5f7");
    assert!(result.score >= VALUE_WIN, "score {}", result.score);
}

#[test]
fn various_positions_with_four_workers() {
    for fen in [SICILIAN_FEN, RUY_LOPEZ_FEN, ENDGAME_FEN] {
        let board: Board = fen.parse().unwrap();
        let result = search(&board, 4, SearchLimits::depth(5));
        assert!(is_legal(&board, &result), "{fen}");
        assert!(result.nodes > 0, "{fen}");
    }
}

#[test]
fn reported_depths_never_regress() {
    let board: Board = RUY_LOPEZ_FEN.parse().unwrap();
    let control = SearchControl::new(Arc::new(AtomicBool::new(false)), SearchLimits::depth(7));
    let mut depths = Vec::new();
    let result = engine(4).search(&board, &control, |info| {
        assert!(!info.pv.is_empty());
        depths.push(info.depth);
    });
    assert!(depths.windows(2).all(|w| w[0] < w[1]), "{depths:?}");
    assert_eq!(depths.last(), Some(&result.depth));
}

#[test]
fn stop_flag_ends_infinite_search() {
    let stopped = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stopped);
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        flag.store(true, Ordering::Release);
    });

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let board = Board::starting_position();
        let control = SearchControl::infinite(stopped);
        let _ = tx.send(engine(4).search(&board, &control, |_| {}));
    });

    let result = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("search did not stop within 5 seconds");
    assert!(is_legal(&Board::starting_position(), &result));
}

#[test]
fn movetime_is_a_hard_deadline() {
    let board: Board = SICILIAN_FEN.parse().unwrap();
    let started = Instant::now();
    let result = search(&board, 2, SearchLimits::movetime(Duration::from_millis(200)));
    assert!(started.elapsed() < Duration::from_secs(2), "took {:?}", started.elapsed());
    assert!(is_legal(&board, &result));
}

#[test]
fn pre_set_stop_falls_back_to_ordered_root_move() {
    let board = Board::starting_position();
    let control = SearchControl::infinite(Arc::new(AtomicBool::new(true)));
    let result = engine(4).search(&board, &control, |_| {});
    assert_eq!(result.depth, 0);
    assert!(is_legal(&board, &result));
    assert_eq!(result.pv, vec![result.best_move]);
}

#[test]
fn node_budget_is_respected() {
    let board = Board::starting_position();
    let result = search(&board, 2, SearchLimits::nodes(20_000));
    assert!(is_legal(&board, &result));
    // Workers flush in batches, so the count may overshoot by a few batches.
    assert!(result.nodes < 20_000 + 4 * 1024, "nodes {}", result.nodes);
}
