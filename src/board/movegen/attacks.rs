//! Attack, check and pin queries.

use crate::board::attack_tables::{
    between, bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use crate::board::{Bitboard, Board, Color, Piece, Square};

impl Board {
    #[inline]
    pub(crate) fn diagonal_sliders(&self, color: Color) -> Bitboard {
        self.pieces(color, Piece::Bishop) | self.pieces(color, Piece::Queen)
    }

    #[inline]
    pub(crate) fn straight_sliders(&self, color: Color) -> Bitboard {
        self.pieces(color, Piece::Rook) | self.pieces(color, Piece::Queen)
    }

    /// Pieces of both colors attacking `sq`, with sliders blocked by `occupancy`.
    #[must_use]
    pub fn attackers_to(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let pawns = (pawn_attacks(Color::White, sq) & self.pieces(Color::Black, Piece::Pawn))
            | (pawn_attacks(Color::Black, sq) & self.pieces(Color::White, Piece::Pawn));
        let knights = knight_attacks(sq)
            & (self.pieces(Color::White, Piece::Knight) | self.pieces(Color::Black, Piece::Knight));
        let kings = king_attacks(sq)
            & (self.pieces(Color::White, Piece::King) | self.pieces(Color::Black, Piece::King));
        let diagonal = bishop_attacks(sq, occupancy)
            & (self.diagonal_sliders(Color::White) | self.diagonal_sliders(Color::Black));
        let straight = rook_attacks(sq, occupancy)
            & (self.straight_sliders(Color::White) | self.straight_sliders(Color::Black));
        pawns | knights | kings | diagonal | straight
    }

    /// Whether `by` attacks `sq` given a hypothetical occupancy.
    #[inline]
    pub(crate) fn is_attacked_with(&self, sq: Square, by: Color, occupancy: Bitboard) -> bool {
        (pawn_attacks(by.opponent(), sq) & self.pieces(by, Piece::Pawn)).any()
            || (knight_attacks(sq) & self.pieces(by, Piece::Knight)).any()
            || (king_attacks(sq) & self.pieces(by, Piece::King)).any()
            || (bishop_attacks(sq, occupancy) & self.diagonal_sliders(by)).any()
            || (rook_attacks(sq, occupancy) & self.straight_sliders(by)).any()
    }

    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        self.is_attacked_with(sq, by, self.all_occupied)
    }

    /// Enemy pieces giving check to the side to move.
    #[must_use]
    pub fn checkers(&self) -> Bitboard {
        let us = self.side_to_move;
        self.attackers_to(self.king_square(us), self.all_occupied) & self.occupied_by(us.opponent())
    }

    #[must_use]
    pub fn is_in_check(&self) -> bool {
        self.checkers().any()
    }

    /// Pieces of `color` that are the only blocker between their king and an enemy slider.
    #[must_use]
    pub fn pinned(&self, color: Color) -> Bitboard {
        let king_sq = self.king_square(color);
        let them = color.opponent();
        let snipers = (rook_attacks(king_sq, Bitboard::EMPTY) & self.straight_sliders(them))
            | (bishop_attacks(king_sq, Bitboard::EMPTY) & self.diagonal_sliders(them));

        let mut pinned = Bitboard::EMPTY;
        for sniper in snipers {
            let blockers = between(king_sq, sniper) & self.all_occupied;
            if blockers.any() && !blockers.more_than_one() {
                pinned |= blockers & self.occupied_by(color);
            }
        }
        pinned
    }

    /// En passant is legal when it answers any check and lifting both pawns
    /// does not open a slider line onto the king.
    pub(crate) fn en_passant_is_legal(
        &self,
        from: Square,
        to: Square,
        king_sq: Square,
        checkers: Bitboard,
    ) -> bool {
        let us = self.side_to_move;
        let them = us.opponent();
        let victim = to.offset(-us.pawn_push());

        if checkers.more_than_one() {
            return false;
        }
        if let Some(checker) = checkers.lsb() {
            let blocks = between(king_sq, checker).contains(to);
            if checker != victim && !blocks {
                return false;
            }
        }

        let occupancy = (self.all_occupied
            ^ Bitboard::from_square(from)
            ^ Bitboard::from_square(victim))
            | Bitboard::from_square(to);
        (rook_attacks(king_sq, occupancy) & self.straight_sliders(them)).is_empty()
            && (bishop_attacks(king_sq, occupancy) & self.diagonal_sliders(them)).is_empty()
    }
}
