//! `ferrochess`: a bitboard chess engine core.
//!
//! Legal move generation, a lockless transposition table and an iterative
//! deepening alpha-beta search with pluggable evaluation.

pub mod board;
pub mod sync;
pub mod tt;
mod zobrist;

pub use board::{
    Board, Color, Evaluator, MaterialEvaluator, Move, Piece, SearchLimits, SearchResult,
    SearchState, Square,
};
pub use sync::StopFlag;
pub use tt::TranspositionTable;
