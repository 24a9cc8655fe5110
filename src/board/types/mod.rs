//! Core chess types.
//!
//! - `Piece` and `Color`
//! - `Square` - board square index (a1 = 0)
//! - `Bitboard` - 64-bit square set
//! - `Move` and `MoveList` - packed moves
//! - `CastlingRights` and `CastleSide`

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::{CastleSide, CastlingRights};
pub use moves::{Move, MoveList, MoveListIntoIter, ScoredMove};
pub use piece::{Color, Piece};
pub use square::Square;

pub(crate) use moves::{ScoredMoveList, MAX_PLY};
pub(crate) use piece::PROMOTION_PIECES;
