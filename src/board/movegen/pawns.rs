use crate::board::attack_tables::pawn_attacks;
use crate::board::{Bitboard, Board, Color, Move, MoveList, Piece, Square, PROMOTION_PIECES};

use super::{GenContext, GenMode};

impl Board {
    fn push_pawn_move(
        ctx: &GenContext,
        from: Square,
        to: Square,
        captured: Option<Piece>,
        moves: &mut MoveList,
    ) {
        let promotion_rank = ctx.them.back_rank();
        if to.rank() != promotion_rank {
            moves.push(Move::new(from, to, captured));
        } else if ctx.mode == GenMode::Captures {
            moves.push(Move::promotion(from, to, captured, Piece::Queen));
        } else {
            for piece in PROMOTION_PIECES {
                moves.push(Move::promotion(from, to, captured, piece));
            }
        }
    }

    pub(super) fn generate_pawn_moves(&self, ctx: &GenContext, moves: &mut MoveList) {
        let us = ctx.us;
        let push = us.pawn_push();
        let start_rank = match us {
            Color::White => Bitboard::RANK_2,
            Color::Black => Bitboard::RANK_7,
        };
        let last_rank = Bitboard::rank_mask(ctx.them.back_rank());
        let empty = !self.all_occupied;
        let enemies = self.occupied_by(ctx.them);

        for from in self.pieces(us, Piece::Pawn) {
            let one = from.offset(push);

            // Pushes: captures-only mode keeps promotions
            let quiet_allowed =
                ctx.mode != GenMode::Captures || last_rank.contains(one);
            if quiet_allowed && empty.contains(one) {
                let pushes = ctx.filter_pinned(from, Bitboard::from_square(one)) & ctx.evasion;
                if pushes.any() {
                    Self::push_pawn_move(ctx, from, one, None, moves);
                }
                if ctx.mode != GenMode::Captures && start_rank.contains(from) {
                    let two = one.offset(push);
                    let double = ctx.filter_pinned(from, Bitboard::from_square(two))
                        & ctx.evasion
                        & empty;
                    if double.any() {
                        moves.push(Move::double_pawn_push(from, two));
                    }
                }
            }

            let attacks = pawn_attacks(us, from);
            let captures = ctx.filter_pinned(from, attacks & enemies & ctx.evasion);
            for to in captures {
                Self::push_pawn_move(ctx, from, to, self.piece_on(to), moves);
            }

            if let Some(ep) = self.en_passant_target {
                if attacks.contains(ep)
                    && (!ctx.checks_legality()
                        || self.en_passant_is_legal(from, ep, ctx.king_sq, ctx.checkers))
                {
                    moves.push(Move::en_passant(from, ep));
                }
            }
        }
    }
}
