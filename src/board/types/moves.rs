//! Move types and move list.

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::castling::CastleSide;
use super::piece::Piece;
use super::square::Square;

const FROM_MASK: u32 = 0x3F;
const TO_SHIFT: u32 = 6;
const CAPTURED_SHIFT: u32 = 12;
const PROMOTION_SHIFT: u32 = 15;
const FLAG_SHIFT: u32 = 18;
const PIECE_MASK: u32 = 0x7;

const FLAG_NORMAL: u32 = 0;
const FLAG_DOUBLE_PAWN: u32 = 1;
const FLAG_EN_PASSANT: u32 = 2;
const FLAG_CASTLE_KINGSIDE: u32 = 3;
const FLAG_CASTLE_QUEENSIDE: u32 = 4;

/// Packed move.
///
/// Encoding:
/// - bits 0-5:   from square
/// - bits 6-11:  to square
/// - bits 12-14: captured piece + 1 (0 = none)
/// - bits 15-17: promotion piece + 1 (0 = none)
/// - bits 18-20: special flag (double push, en passant, castle side)
///
/// The en-passant victim is recorded as a captured pawn.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move(u32);

#[inline]
const fn piece_code(piece: Option<Piece>) -> u32 {
    match piece {
        Some(p) => p as u32 + 1,
        None => 0,
    }
}

#[inline]
const fn decode_piece(code: u32) -> Option<Piece> {
    if code == 0 {
        None
    } else {
        Piece::from_index(code as usize - 1)
    }
}

impl Move {
    /// The null move (a1a1), used as an empty slot marker.
    pub const NULL: Move = Move(0);

    #[inline]
    const fn pack(
        from: Square,
        to: Square,
        captured: Option<Piece>,
        promotion: Option<Piece>,
        flag: u32,
    ) -> Self {
        Move(
            from.0 as u32
                | (to.0 as u32) << TO_SHIFT
                | piece_code(captured) << CAPTURED_SHIFT
                | piece_code(promotion) << PROMOTION_SHIFT
                | flag << FLAG_SHIFT,
        )
    }

    /// A plain move or capture.
    #[inline]
    #[must_use]
    pub const fn new(from: Square, to: Square, captured: Option<Piece>) -> Self {
        Move::pack(from, to, captured, None, FLAG_NORMAL)
    }

    #[inline]
    #[must_use]
    pub const fn double_pawn_push(from: Square, to: Square) -> Self {
        Move::pack(from, to, None, None, FLAG_DOUBLE_PAWN)
    }

    #[inline]
    #[must_use]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move::pack(from, to, Some(Piece::Pawn), None, FLAG_EN_PASSANT)
    }

    #[inline]
    #[must_use]
    pub const fn castle(from: Square, to: Square, side: CastleSide) -> Self {
        let flag = match side {
            CastleSide::King => FLAG_CASTLE_KINGSIDE,
            CastleSide::Queen => FLAG_CASTLE_QUEENSIDE,
        };
        Move::pack(from, to, None, None, flag)
    }

    #[inline]
    #[must_use]
    pub const fn promotion(
        from: Square,
        to: Square,
        captured: Option<Piece>,
        promotion: Piece,
    ) -> Self {
        Move::pack(from, to, captured, Some(promotion), FLAG_NORMAL)
    }

    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        Square((self.0 & FROM_MASK) as u8)
    }

    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        Square(((self.0 >> TO_SHIFT) & FROM_MASK) as u8)
    }

    #[inline]
    const fn flag(self) -> u32 {
        (self.0 >> FLAG_SHIFT) & PIECE_MASK
    }

    /// Piece removed by this move, if any
    #[inline]
    #[must_use]
    pub const fn captured(self) -> Option<Piece> {
        decode_piece((self.0 >> CAPTURED_SHIFT) & PIECE_MASK)
    }

    #[inline]
    #[must_use]
    pub const fn promotion_piece(self) -> Option<Piece> {
        decode_piece((self.0 >> PROMOTION_SHIFT) & PIECE_MASK)
    }

    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        (self.0 >> CAPTURED_SHIFT) & PIECE_MASK != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        (self.0 >> PROMOTION_SHIFT) & PIECE_MASK != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        self.flag() == FLAG_EN_PASSANT
    }

    #[inline]
    #[must_use]
    pub const fn is_double_pawn_push(self) -> bool {
        self.flag() == FLAG_DOUBLE_PAWN
    }

    #[inline]
    #[must_use]
    pub const fn castle_side(self) -> Option<CastleSide> {
        match self.flag() {
            FLAG_CASTLE_KINGSIDE => Some(CastleSide::King),
            FLAG_CASTLE_QUEENSIDE => Some(CastleSide::Queen),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_castling(self) -> bool {
        matches!(self.flag(), FLAG_CASTLE_KINGSIDE | FLAG_CASTLE_QUEENSIDE)
    }

    /// Neither a capture nor a promotion
    #[inline]
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Rebuild from a packed value, e.g. one read back from the transposition table.
    #[inline]
    #[must_use]
    pub const fn from_u32(value: u32) -> Self {
        Move(value & ((1 << (FLAG_SHIFT + 3)) - 1))
    }

    /// Coordinate form without separator (`e7e8q`).
    #[must_use]
    pub fn to_uci(self) -> String {
        let mut s = format!("{}{}", self.from(), self.to());
        if let Some(promo) = self.promotion_piece() {
            s.push(promo.to_char());
        }
        s
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self}")?;
        if let Some(captured) = self.captured() {
            write!(f, " x{captured}")?;
        }
        if self.is_castling() {
            write!(f, " castle")?;
        }
        if self.is_en_passant() {
            write!(f, " ep")?;
        }
        write!(f, ")")
    }
}

/// Long algebraic form: `e2e4`, promotions as `e7e8=Q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promo) = self.promotion_piece() {
            write!(f, "={}", promo.to_char().to_ascii_uppercase())?;
        }
        Ok(())
    }
}

pub(crate) const MAX_MOVES: usize = 256;
pub(crate) const MAX_PLY: usize = 128;

/// List of moves with fixed-size backing array.
#[derive(Clone, Debug)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        MoveList {
            moves: [Move::NULL; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES, "move list overflow");
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    /// In-place sort by a key, highest first. Stable, so equal keys keep generation order.
    pub fn sort_by_key_desc<K: Ord, F: FnMut(&Move) -> K>(&mut self, mut key: F) {
        self.as_mut_slice()
            .sort_by(|a, b| key(b).cmp(&key(a)));
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

/// Owning iterator over moves in a `MoveList`
pub struct MoveListIntoIter {
    list: MoveList,
    idx: usize,
}

impl Iterator for MoveListIntoIter {
    type Item = Move;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx < self.list.len {
            let mv = self.list.moves[self.idx];
            self.idx += 1;
            Some(mv)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.len - self.idx;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MoveListIntoIter {}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = MoveListIntoIter;

    fn into_iter(self) -> Self::IntoIter {
        MoveListIntoIter { list: self, idx: 0 }
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.as_slice()[idx]
    }
}

/// A move paired with its ordering score.
#[derive(Clone, Copy, Debug)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Fixed-size list of scored moves for incremental selection during search.
#[derive(Clone, Debug)]
pub(crate) struct ScoredMoveList {
    moves: [ScoredMove; MAX_MOVES],
    len: usize,
}

impl ScoredMoveList {
    pub(crate) fn new() -> Self {
        ScoredMoveList {
            moves: [ScoredMove {
                mv: Move::NULL,
                score: 0,
            }; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, mv: Move, score: i32) {
        self.moves[self.len] = ScoredMove { mv, score };
        self.len += 1;
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Swap the best-scoring move from `start` onwards into `start` and return it.
    /// Ties keep the earliest move, so ordering is deterministic.
    #[inline]
    pub(crate) fn pick_best(&mut self, start: usize) -> Option<ScoredMove> {
        if start >= self.len {
            return None;
        }

        let mut best_idx = start;
        let mut best_score = self.moves[start].score;
        for i in (start + 1)..self.len {
            if self.moves[i].score > best_score {
                best_score = self.moves[i].score;
                best_idx = i;
            }
        }

        if best_idx != start {
            self.moves.swap(start, best_idx);
        }

        Some(self.moves[start])
    }
}
