//! Castling rights type.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;
use super::square::Square;

pub(crate) const CASTLE_WHITE_K: u8 = 1 << 0;
pub(crate) const CASTLE_WHITE_Q: u8 = 1 << 1;
pub(crate) const CASTLE_BLACK_K: u8 = 1 << 2;
pub(crate) const CASTLE_BLACK_Q: u8 = 1 << 3;

pub(crate) const ALL_CASTLING_RIGHTS: u8 =
    CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;

/// Which wing a castling move goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::King, CastleSide::Queen];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// King destination for `color` castling to this side.
    #[must_use]
    pub const fn king_to(self, color: Color) -> Square {
        match (color, self) {
            (Color::White, CastleSide::King) => Square::G1,
            (Color::White, CastleSide::Queen) => Square::C1,
            (Color::Black, CastleSide::King) => Square::G8,
            (Color::Black, CastleSide::Queen) => Square::C8,
        }
    }

    /// Rook (origin, destination) for `color` castling to this side.
    #[must_use]
    pub const fn rook_squares(self, color: Color) -> (Square, Square) {
        match (color, self) {
            (Color::White, CastleSide::King) => (Square::H1, Square::F1),
            (Color::White, CastleSide::Queen) => (Square::A1, Square::D1),
            (Color::Black, CastleSide::King) => (Square::H8, Square::F8),
            (Color::Black, CastleSide::Queen) => (Square::A8, Square::D8),
        }
    }
}

/// The four castling rights as a bitmask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    #[must_use]
    pub const fn all() -> Self {
        CastlingRights(ALL_CASTLING_RIGHTS)
    }

    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::bit_for(color, side) != 0
    }

    #[inline]
    pub fn set(&mut self, color: Color, side: CastleSide) {
        self.0 |= Self::bit_for(color, side);
    }

    #[inline]
    pub fn remove(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::bit_for(color, side);
    }

    /// Clear every right whose king or rook home square is `sq`.
    #[inline]
    pub(crate) fn strip_for_square(&mut self, sq: Square) {
        self.0 &= !rights_touching(sq);
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bitmask, bit order K Q k q
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        CastlingRights(value & ALL_CASTLING_RIGHTS)
    }

    #[inline]
    pub(crate) const fn bit_for(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::King) => CASTLE_WHITE_K,
            (Color::White, CastleSide::Queen) => CASTLE_WHITE_Q,
            (Color::Black, CastleSide::King) => CASTLE_BLACK_K,
            (Color::Black, CastleSide::Queen) => CASTLE_BLACK_Q,
        }
    }
}

const fn rights_touching(sq: Square) -> u8 {
    match sq.0 {
        0 => CASTLE_WHITE_Q,
        4 => CASTLE_WHITE_K | CASTLE_WHITE_Q,
        7 => CASTLE_WHITE_K,
        56 => CASTLE_BLACK_Q,
        60 => CASTLE_BLACK_K | CASTLE_BLACK_Q,
        63 => CASTLE_BLACK_K,
        _ => 0,
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (bit, ch) in [
            (CASTLE_WHITE_K, 'K'),
            (CASTLE_WHITE_Q, 'Q'),
            (CASTLE_BLACK_K, 'k'),
            (CASTLE_BLACK_Q, 'q'),
        ] {
            if self.0 & bit != 0 {
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn king_move_strips_both_rights() {
        let mut rights = CastlingRights::all();
        rights.strip_for_square(Square::E1);
        assert!(!rights.has(Color::White, CastleSide::King));
        assert!(!rights.has(Color::White, CastleSide::Queen));
        assert!(rights.has(Color::Black, CastleSide::King));
        assert_eq!(rights.to_string(), "kq");
    }

    #[test]
    fn rook_corner_strips_one_right() {
        let mut rights = CastlingRights::all();
        rights.strip_for_square(Square::A8);
        assert_eq!(rights.to_string(), "KQk");
        rights.strip_for_square(Square::new(3, 3));
        assert_eq!(rights.to_string(), "KQk");
    }
}
