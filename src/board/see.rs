//! Static exchange evaluation.
//!
//! Resolves the capture sequence on one square without making moves: each
//! side recaptures with its least valuable attacker, and the resulting gain
//! list is folded back so either side may stop when continuing would lose.

use super::attack_tables::{bishop_attacks, rook_attacks};
use super::state::Board;
use super::types::{Bitboard, Color, Move, Piece};

/// Longest exchange: every piece on the board taking part.
const MAX_EXCHANGE: usize = 32;

impl Board {
    /// Net material won by the side to move if it plays `mv` and both sides
    /// continue the exchange on the destination square only while it pays.
    ///
    /// Positive is good for the mover. Quiet moves score the cost of
    /// stepping onto an attacked square (0 or negative).
    #[must_use]
    pub fn see(&self, mv: Move) -> i32 {
        let from = mv.from();
        let to = mv.to();
        let Some(mut attacker) = self.piece_on(from) else {
            return 0;
        };

        let mut gain = [0i32; MAX_EXCHANGE];
        gain[0] = mv.captured().map_or(0, Piece::value);

        if let Some(promoted) = mv.promotion_piece() {
            gain[0] += promoted.value() - Piece::Pawn.value();
            attacker = promoted;
        }

        let mut occupancy = self.all_occupied;
        if mv.is_en_passant() {
            let victim = to.offset(-self.side_to_move.pawn_push());
            occupancy ^= Bitboard::from_square(victim);
        }

        let diagonal = self.diagonal_sliders(Color::White) | self.diagonal_sliders(Color::Black);
        let straight = self.straight_sliders(Color::White) | self.straight_sliders(Color::Black);

        let mut attackers = self.attackers_to(to, occupancy);
        let mut from_bb = Bitboard::from_square(from);
        let mut side = self.side_to_move;
        let mut depth = 0;

        loop {
            depth += 1;
            if depth >= MAX_EXCHANGE {
                break;
            }
            // What the opponent nets if it can recapture the piece now on `to`
            gain[depth] = attacker.value() - gain[depth - 1];
            if (-gain[depth - 1]).max(gain[depth]) < 0 {
                break;
            }

            occupancy ^= from_bb;
            attackers &= occupancy;
            // Sliders lined up behind the piece that just moved
            attackers |= (bishop_attacks(to, occupancy) & diagonal
                | rook_attacks(to, occupancy) & straight)
                & occupancy;

            side = side.opponent();
            let Some((piece, bb)) = self.least_valuable_attacker(attackers, side) else {
                break;
            };
            // A king may only recapture when nothing defends the square
            if piece == Piece::King && (attackers & self.occupied_by(side.opponent())).any() {
                break;
            }
            attacker = piece;
            from_bb = bb;
        }

        while depth > 1 {
            depth -= 1;
            gain[depth - 1] = -(-gain[depth - 1]).max(gain[depth]);
        }
        gain[0]
    }

    /// `see(mv) >= threshold`.
    #[inline]
    #[must_use]
    pub fn see_ge(&self, mv: Move, threshold: i32) -> bool {
        self.see(mv) >= threshold
    }

    fn least_valuable_attacker(&self, attackers: Bitboard, color: Color) -> Option<(Piece, Bitboard)> {
        Piece::ALL.iter().find_map(|&piece| {
            let candidates = attackers & self.pieces(color, piece);
            candidates
                .lsb()
                .map(|sq| (piece, Bitboard::from_square(sq)))
        })
    }
}
