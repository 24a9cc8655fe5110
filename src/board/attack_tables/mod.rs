//! Attack tables for move generation.
//!
//! Leapers (knight, king, pawn) use plain per-square tables. Sliders use
//! magic bitboards; queens are the union of rook and bishop lookups.

#![allow(clippy::needless_range_loop)] // Index loops are clearer for board coordinates

mod magic;
mod tables;

pub use magic::init;

use crate::board::types::{Bitboard, Color, Square};

use tables::{BETWEEN, KING_ATTACKS, KNIGHT_ATTACKS, LINE, PAWN_ATTACKS};

#[inline]
#[must_use]
pub fn knight_attacks(sq: Square) -> Bitboard {
    Bitboard(KNIGHT_ATTACKS[sq.index()])
}

#[inline]
#[must_use]
pub fn king_attacks(sq: Square) -> Bitboard {
    Bitboard(KING_ATTACKS[sq.index()])
}

/// Squares a pawn of `color` on `sq` captures on.
#[inline]
#[must_use]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    Bitboard(PAWN_ATTACKS[color.index()][sq.index()])
}

#[inline]
#[must_use]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Bitboard(magic::rook_attacks(sq.index(), occupied.0))
}

#[inline]
#[must_use]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Bitboard(magic::bishop_attacks(sq.index(), occupied.0))
}

#[inline]
#[must_use]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

/// Squares strictly between `a` and `b` on a shared rank, file or diagonal.
#[inline]
#[must_use]
pub fn between(a: Square, b: Square) -> Bitboard {
    Bitboard(BETWEEN[a.index()][b.index()])
}

/// The whole line through `a` and `b`, or empty when they are not aligned.
#[inline]
#[must_use]
pub fn line(a: Square, b: Square) -> Bitboard {
    Bitboard(LINE[a.index()][b.index()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn knight_in_corner_has_two_targets() {
        assert_eq!(knight_attacks(Square::A1).popcount(), 2);
        assert_eq!(knight_attacks(sq("d4")).popcount(), 8);
    }

    #[test]
    fn pawn_attacks_respect_color_and_edges() {
        assert_eq!(
            pawn_attacks(Color::White, sq("a2")),
            Bitboard::from_square(sq("b3"))
        );
        assert_eq!(
            pawn_attacks(Color::Black, sq("e5")),
            Bitboard::from_square(sq("d4")) | Bitboard::from_square(sq("f4"))
        );
    }

    #[test]
    fn between_and_line_geometry() {
        assert_eq!(
            between(sq("a1"), sq("d4")),
            Bitboard::from_square(sq("b2")) | Bitboard::from_square(sq("c3"))
        );
        assert!(between(sq("a1"), sq("b3")).is_empty());
        assert!(between(sq("e1"), sq("e2")).is_empty());
        assert_eq!(line(sq("b2"), sq("c3")).popcount(), 8);
        assert!(line(sq("e4"), sq("e7")).contains(sq("e1")));
        assert!(line(sq("a1"), sq("b3")).is_empty());
    }

    #[test]
    fn queen_is_rook_plus_bishop() {
        let occ = Bitboard::from_square(sq("d6")) | Bitboard::from_square(sq("f4"));
        let q = queen_attacks(sq("d4"), occ);
        assert!(q.contains(sq("d6")));
        assert!(!q.contains(sq("d7")));
        assert!(q.contains(sq("f4")));
        assert!(!q.contains(sq("g4")));
        assert!(q.contains(sq("h8")));
    }
}
