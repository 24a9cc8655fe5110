//! Board representation, move generation and search.
//!
//! Positions are kept as bitboards plus a square mailbox, with an
//! incrementally updated Zobrist hash.
//!
//! # Example
//! ```
//! use ferrochess::board::Board;
//!
//! let board = Board::new();
//! let moves = board.generate_moves();
//! assert_eq!(moves.len(), 20);
//! ```

mod attack_tables;
mod error;
mod eval;
mod fen;
mod make_unmake;
mod movegen;
mod search;
mod see;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use attack_tables::init;
pub use error::{FenError, MoveParseError, SquareError};
pub use eval::{Evaluator, MaterialEvaluator};
pub use fen::START_FEN;
pub use make_unmake::{MoveGuard, NullMoveGuard};
pub use state::{Board, NullMoveInfo, UnmakeInfo};
pub use types::{
    Bitboard, BitboardIter, CastleSide, CastlingRights, Color, Move, MoveList, MoveListIntoIter,
    Piece, ScoredMove, Square,
};

pub use search::{
    find_best_move, HistoryTable, KillerTable, ProgressCallback, SearchEvent, SearchLimits,
    SearchParams, SearchReport, SearchResult, SearchState, SearchStats, DRAW_SCORE, INFINITY,
    MATE_SCORE, MATE_THRESHOLD, MAX_DEPTH,
};

pub(crate) use types::{ScoredMoveList, MAX_PLY, PROMOTION_PIECES};
