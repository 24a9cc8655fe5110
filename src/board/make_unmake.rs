//! Reversible move application.
//!
//! `make_move`/`unmake_move` must nest in LIFO order. `Board::play` wraps the
//! pair in a guard that undoes the move when dropped, so an early return or a
//! panic during recursion cannot leave the board mid-move.

use std::mem;
use std::ops::{Deref, DerefMut};

use crate::zobrist::ZOBRIST;

use super::{Board, Color, Move, NullMoveInfo, Piece, Square, UnmakeInfo};

impl Board {
    /// Square of the pawn removed by an en-passant capture landing on `to`.
    #[inline]
    fn en_passant_victim(to: Square, mover: Color) -> Square {
        to.offset(-mover.pawn_push())
    }

    /// Apply a legal move and return what is needed to undo it.
    pub fn make_move(&mut self, mv: Move) -> UnmakeInfo {
        let keys = &*ZOBRIST;
        let us = self.side_to_move;
        let them = us.opponent();
        let from = mv.from();
        let to = mv.to();
        let piece = self.mailbox[from.index()];
        debug_assert!(
            piece.is_some() && self.occupied_by(us).contains(from),
            "make_move {mv}: no {us} piece on {from}"
        );
        let piece = piece.unwrap_or(Piece::Pawn);

        let previous_hash = self.hash;
        let previous_en_passant_target = self.en_passant_target;
        let previous_castling_rights = self.castling_rights;
        let previous_halfmove_clock = self.halfmove_clock;
        let previous_fullmove_number = self.fullmove_number;

        let mut hash = self.hash ^ keys.side() ^ keys.castling(self.castling_rights);
        if let Some(ep) = self.en_passant_target {
            hash ^= keys.en_passant(ep);
        }

        if let Some(side) = mv.castle_side() {
            let (rook_from, rook_to) = side.rook_squares(us);
            self.move_piece(from, to, us, Piece::King);
            self.move_piece(rook_from, rook_to, us, Piece::Rook);
            hash ^= keys.piece(us, Piece::King, from) ^ keys.piece(us, Piece::King, to);
            hash ^= keys.piece(us, Piece::Rook, rook_from) ^ keys.piece(us, Piece::Rook, rook_to);
        } else {
            if let Some(captured) = mv.captured() {
                let victim_sq = if mv.is_en_passant() {
                    Self::en_passant_victim(to, us)
                } else {
                    to
                };
                debug_assert_eq!(
                    self.piece_at(victim_sq),
                    Some((them, captured)),
                    "make_move {mv}: capture flag disagrees with board"
                );
                self.remove_piece(victim_sq, them, captured);
                hash ^= keys.piece(them, captured, victim_sq);
            }

            let placed = mv.promotion_piece().unwrap_or(piece);
            self.remove_piece(from, us, piece);
            self.set_piece(to, us, placed);
            hash ^= keys.piece(us, piece, from) ^ keys.piece(us, placed, to);
        }

        // Rights only ever shrink
        self.castling_rights.strip_for_square(from);
        self.castling_rights.strip_for_square(to);
        hash ^= keys.castling(self.castling_rights);

        self.en_passant_target = None;
        if mv.is_double_pawn_push() {
            let ep = from.offset(us.pawn_push());
            self.en_passant_target = Some(ep);
            hash ^= keys.en_passant(ep);
        }

        if piece == Piece::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = them;
        self.hash = hash;
        let previous_repetition_count = self.repetitions.increment(hash);

        UnmakeInfo {
            mv,
            previous_en_passant_target,
            previous_castling_rights,
            previous_hash,
            previous_halfmove_clock,
            previous_fullmove_number,
            previous_repetition_count,
        }
    }

    /// Exact inverse of `make_move`. `info` must come from the most recent unmatched make.
    pub fn unmake_move(&mut self, mv: Move, info: UnmakeInfo) {
        debug_assert_eq!(info.mv, mv, "unmake_move does not match the last move made");

        self.repetitions.set(self.hash, info.previous_repetition_count);

        let them = self.side_to_move;
        let us = them.opponent();
        let from = mv.from();
        let to = mv.to();

        if let Some(side) = mv.castle_side() {
            let (rook_from, rook_to) = side.rook_squares(us);
            self.move_piece(rook_to, rook_from, us, Piece::Rook);
            self.move_piece(to, from, us, Piece::King);
        } else {
            let placed = self.mailbox[to.index()];
            debug_assert!(placed.is_some(), "unmake_move {mv}: {to} is empty");
            let placed = placed.unwrap_or(Piece::Pawn);
            let original = if mv.is_promotion() { Piece::Pawn } else { placed };
            self.remove_piece(to, us, placed);
            self.set_piece(from, us, original);

            if let Some(captured) = mv.captured() {
                let victim_sq = if mv.is_en_passant() {
                    Self::en_passant_victim(to, us)
                } else {
                    to
                };
                self.set_piece(victim_sq, them, captured);
            }
        }

        self.side_to_move = us;
        self.en_passant_target = info.previous_en_passant_target;
        self.castling_rights = info.previous_castling_rights;
        self.hash = info.previous_hash;
        self.halfmove_clock = info.previous_halfmove_clock;
        self.fullmove_number = info.previous_fullmove_number;
    }

    /// Pass the turn without moving. Only sound when the side to move is not in check.
    ///
    /// Repetition counting restarts at the pass: the history is set aside in
    /// the returned info and comes back on `unmake_null_move`.
    pub fn make_null_move(&mut self) -> NullMoveInfo {
        debug_assert!(!self.is_in_check(), "null move while in check");
        let keys = &*ZOBRIST;
        let info = NullMoveInfo {
            previous_en_passant_target: self.en_passant_target,
            previous_hash: self.hash,
            previous_repetitions: mem::take(&mut self.repetitions),
        };

        let mut hash = self.hash ^ keys.side();
        if let Some(ep) = self.en_passant_target.take() {
            hash ^= keys.en_passant(ep);
        }
        self.side_to_move = self.side_to_move.opponent();
        self.hash = hash;
        self.repetitions.set(hash, 1);
        info
    }

    pub fn unmake_null_move(&mut self, info: NullMoveInfo) {
        self.side_to_move = self.side_to_move.opponent();
        self.en_passant_target = info.previous_en_passant_target;
        self.hash = info.previous_hash;
        self.repetitions = info.previous_repetitions;
    }

    /// Make `mv` and return a guard that unmakes it when dropped.
    pub fn play(&mut self, mv: Move) -> MoveGuard<'_> {
        let info = self.make_move(mv);
        MoveGuard { board: self, info }
    }

    /// Make a null move and return a guard that unmakes it when dropped.
    pub fn play_null(&mut self) -> NullMoveGuard<'_> {
        let info = self.make_null_move();
        NullMoveGuard { board: self, info }
    }
}

/// A move in progress; derefs to the board after the move.
pub struct MoveGuard<'a> {
    board: &'a mut Board,
    info: UnmakeInfo,
}

impl MoveGuard<'_> {
    #[must_use]
    pub fn mv(&self) -> Move {
        self.info.mv
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.board.unmake_move(self.info.mv, self.info);
    }
}

/// A null move in progress; derefs to the board after the pass.
pub struct NullMoveGuard<'a> {
    board: &'a mut Board,
    info: NullMoveInfo,
}

impl Deref for NullMoveGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for NullMoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for NullMoveGuard<'_> {
    fn drop(&mut self) {
        let info = mem::take(&mut self.info);
        self.board.unmake_null_move(info);
    }
}
