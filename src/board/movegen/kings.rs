use crate::board::attack_tables::{between, king_attacks};
use crate::board::{Bitboard, Board, CastleSide, Move, MoveList, Piece, Square};

use super::{GenContext, GenMode};

impl Board {
    pub(super) fn generate_king_moves(&self, ctx: &GenContext, moves: &mut MoveList) {
        let from = ctx.king_sq;
        let mut targets = king_attacks(from) & !self.occupied_by(ctx.us);
        if ctx.mode == GenMode::Captures {
            targets &= self.occupied_by(ctx.them);
        }

        if ctx.checks_legality() {
            // Lift the king so sliders see through its current square
            let occupancy = self.all_occupied ^ Bitboard::from_square(from);
            for to in targets {
                if !self.is_attacked_with(to, ctx.them, occupancy) {
                    moves.push(Move::new(from, to, self.piece_on(to)));
                }
            }
        } else {
            self.push_targets(from, targets, moves);
        }

        if ctx.mode != GenMode::Captures && !ctx.in_check {
            self.generate_castling(ctx, moves);
        }
    }

    fn generate_castling(&self, ctx: &GenContext, moves: &mut MoveList) {
        let us = ctx.us;
        let home = Square::new(us.back_rank(), 4);
        if ctx.king_sq != home {
            return;
        }

        for side in CastleSide::BOTH {
            if !self.castling_rights.has(us, side) {
                continue;
            }
            let (rook_from, _) = side.rook_squares(us);
            if self.piece_at(rook_from) != Some((us, Piece::Rook)) {
                continue;
            }
            if (between(home, rook_from) & self.all_occupied).any() {
                continue;
            }

            let king_to = side.king_to(us);
            let path = between(home, king_to) | Bitboard::from_square(king_to);
            if path.iter().any(|sq| self.is_square_attacked(sq, ctx.them)) {
                continue;
            }
            moves.push(Move::castle(home, king_to, side));
        }
    }
}
