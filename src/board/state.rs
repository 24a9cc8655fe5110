use std::collections::HashMap;

use crate::zobrist::ZOBRIST;

use super::{Bitboard, CastlingRights, Color, Move, Piece, Square};

/// State `make_move` overwrites and cannot recover from the move alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnmakeInfo {
    pub(crate) mv: Move,
    pub(crate) previous_en_passant_target: Option<Square>,
    pub(crate) previous_castling_rights: CastlingRights,
    pub(crate) previous_hash: u64,
    pub(crate) previous_halfmove_clock: u32,
    pub(crate) previous_fullmove_number: u32,
    pub(crate) previous_repetition_count: u32,
}

impl UnmakeInfo {
    /// The move this record undoes.
    #[must_use]
    pub fn mv(&self) -> Move {
        self.mv
    }
}

/// State a null move replaces. Holds the repetition history from before
/// the pass, since no position after a null move can repeat one before it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NullMoveInfo {
    pub(crate) previous_en_passant_target: Option<Square>,
    pub(crate) previous_hash: u64,
    pub(crate) previous_repetitions: RepetitionTable,
}

/// How often each position hash occurs on the current line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RepetitionTable {
    counts: HashMap<u64, u32>,
}

impl RepetitionTable {
    pub(crate) fn new() -> Self {
        RepetitionTable {
            counts: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, hash: u64) -> u32 {
        self.counts.get(&hash).copied().unwrap_or(0)
    }

    pub(crate) fn set(&mut self, hash: u64, count: u32) {
        if count == 0 {
            self.counts.remove(&hash);
        } else {
            self.counts.insert(hash, count);
        }
    }

    /// Bump the count for `hash`, returning the count before the bump.
    pub(crate) fn increment(&mut self, hash: u64) -> u32 {
        let previous = self.get(hash);
        self.set(hash, previous.saturating_add(1));
        previous
    }

    pub(crate) fn clear(&mut self) {
        self.counts.clear();
    }
}

/// A chess position.
///
/// Piece placement is held twice: bitboards per color and piece, and a
/// square-indexed mailbox. Both are only ever changed together through
/// `set_piece`/`remove_piece`, so they always agree.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) mailbox: [Option<Piece>; 64],
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64,
    pub(crate) repetitions: RepetitionTable,
}

impl Board {
    /// The standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.iter().enumerate() {
            let file = file as u8;
            board.set_piece(Square::new(0, file), Color::White, *piece);
            board.set_piece(Square::new(7, file), Color::Black, *piece);
            board.set_piece(Square::new(1, file), Color::White, Piece::Pawn);
            board.set_piece(Square::new(6, file), Color::Black, Piece::Pawn);
        }

        board.castling_rights = CastlingRights::all();
        board.reset_hash_and_history();
        board
    }

    pub(crate) fn empty() -> Self {
        Board {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
            mailbox: [None; 64],
            side_to_move: Color::White,
            castling_rights: CastlingRights::none(),
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            repetitions: RepetitionTable::new(),
        }
    }

    /// Recompute the hash from scratch and start a fresh repetition history at this position.
    pub(crate) fn reset_hash_and_history(&mut self) {
        self.hash = self.compute_hash();
        self.repetitions.clear();
        self.repetitions.set(self.hash, 1);
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    #[must_use]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.all_occupied
    }

    /// Piece type on a square, from the mailbox.
    #[inline]
    #[must_use]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.mailbox[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        if self.occupied[0].contains(sq) {
            Some(Color::White)
        } else if self.occupied[1].contains(sq) {
            Some(Color::Black)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let piece = self.piece_on(sq)?;
        let color = self.color_on(sq)?;
        Some((color, piece))
    }

    /// Square of `color`'s king. Every board built through parsing or `new` has one.
    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        let kings = self.pieces(color, Piece::King);
        debug_assert!(kings.popcount() == 1, "{color} must have exactly one king");
        Square(kings.0.trailing_zeros() as u8)
    }

    #[inline]
    pub(crate) fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        debug_assert!(self.mailbox[sq.index()].is_none(), "{sq} already occupied");
        let bit = Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] |= bit;
        self.occupied[color.index()] |= bit;
        self.all_occupied |= bit;
        self.mailbox[sq.index()] = Some(piece);
    }

    #[inline]
    pub(crate) fn remove_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        debug_assert_eq!(self.mailbox[sq.index()], Some(piece), "mailbox out of sync at {sq}");
        let bit = !Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] &= bit;
        self.occupied[color.index()] &= bit;
        self.all_occupied &= bit;
        self.mailbox[sq.index()] = None;
    }

    #[inline]
    pub(crate) fn move_piece(&mut self, from: Square, to: Square, color: Color, piece: Piece) {
        self.remove_piece(from, color, piece);
        self.set_piece(to, color, piece);
    }

    /// Zobrist hash computed from scratch. Equals `hash()` for every reachable position.
    #[must_use]
    pub fn compute_hash(&self) -> u64 {
        let keys = &*ZOBRIST;
        let mut hash = 0u64;

        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in self.pieces(color, piece) {
                    hash ^= keys.piece(color, piece, sq);
                }
            }
        }

        if self.side_to_move == Color::Black {
            hash ^= keys.side();
        }
        hash ^= keys.castling(self.castling_rights);
        if let Some(ep) = self.en_passant_target {
            hash ^= keys.en_passant(ep);
        }
        hash
    }

    /// Times the current position has occurred on this line, itself included.
    #[must_use]
    pub fn repetition_count(&self) -> u32 {
        self.repetitions.get(self.hash)
    }

    #[must_use]
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_count() >= 3
    }

    #[must_use]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Draw by rule: fifty moves, threefold repetition or dead material.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw() || self.is_threefold_repetition() || self.is_insufficient_material()
    }

    /// Bare kings, a single minor piece, or only same-colored bishops.
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let heavy_or_pawns = [Piece::Pawn, Piece::Rook, Piece::Queen]
            .iter()
            .any(|&p| (self.pieces(Color::White, p) | self.pieces(Color::Black, p)).any());
        if heavy_or_pawns {
            return false;
        }

        let knights = self.pieces(Color::White, Piece::Knight) | self.pieces(Color::Black, Piece::Knight);
        let bishops = self.pieces(Color::White, Piece::Bishop) | self.pieces(Color::Black, Piece::Bishop);
        let minors = knights.popcount() + bishops.popcount();

        if minors <= 1 {
            return true;
        }
        knights.is_empty()
            && ((bishops & Bitboard::LIGHT_SQUARES).is_empty()
                || (bishops & Bitboard::DARK_SQUARES).is_empty())
    }

    /// True if `color` has anything besides pawns and king.
    #[must_use]
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let pawns_and_king = self.pieces(color, Piece::Pawn) | self.pieces(color, Piece::King);
        (self.occupied_by(color) & !pawns_and_king).any()
    }

    /// Check the mailbox against the bitboards and the incremental hash.
    #[cfg(debug_assertions)]
    pub(crate) fn assert_consistent(&self) {
        for idx in 0..64u8 {
            let sq = Square(idx);
            let from_bitboards = Color::BOTH.iter().find_map(|&color| {
                Piece::ALL
                    .iter()
                    .find(|&&piece| self.pieces(color, piece).contains(sq))
                    .map(|&piece| (color, piece))
            });
            assert_eq!(self.piece_at(sq), from_bitboards, "mailbox disagrees at {sq}");
        }
        assert_eq!(
            self.occupied[0] | self.occupied[1],
            self.all_occupied,
            "occupancy aggregate out of sync"
        );
        assert_eq!(self.hash, self.compute_hash(), "incremental hash drifted");
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl PartialEq for Board {
    /// Positions are equal when placement and game state match. Move history is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.side_to_move == other.side_to_move
            && self.castling_rights == other.castling_rights
            && self.en_passant_target == other.en_passant_target
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
            && self.hash == other.hash
    }
}

impl Eq for Board {}
