//! Perft driver for checking move generation.
//!
//! Usage: `perft [depth] [fen...]`. Defaults to depth 4 from the start position.
use std::process::ExitCode;
use std::time::Instant;

use ferrochess::board::{Board, START_FEN};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"))
        .target(env_logger::Target::Stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let depth = match args.next().map(|arg| arg.parse::<usize>()) {
        None => 4,
        Some(Ok(0)) => {
            eprintln!("depth must be at least 1");
            return ExitCode::FAILURE;
        }
        Some(Ok(depth)) => depth,
        Some(Err(err)) => {
            eprintln!("invalid depth: {err}");
            return ExitCode::FAILURE;
        }
    };
    let fen: Vec<String> = args.collect();
    let fen = if fen.is_empty() {
        START_FEN.to_string()
    } else {
        fen.join(" ")
    };

    let mut board = match Board::from_fen(&fen) {
        Ok(board) => board,
        Err(err) => {
            eprintln!("invalid FEN '{fen}': {err}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("perft depth {depth} for {fen}");
    let start = Instant::now();
    let divide = board.perft_divide(depth);
    let total: u64 = divide.iter().map(|(_, nodes)| nodes).sum();
    for (mv, nodes) in &divide {
        println!("{}: {}", mv.to_uci(), nodes);
    }
    println!();
    println!("Nodes searched: {total}");

    let elapsed = start.elapsed();
    let nps = (total as f64 / elapsed.as_secs_f64().max(1e-9)) as u64;
    log::info!("{} ms, {} nps", elapsed.as_millis(), nps);
    ExitCode::SUCCESS
}
