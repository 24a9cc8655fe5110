use crate::board::attack_tables::{bishop_attacks, queen_attacks, rook_attacks};
use crate::board::{Board, MoveList, Piece};

use super::GenContext;

impl Board {
    pub(super) fn generate_slider_moves(&self, ctx: &GenContext, moves: &mut MoveList) {
        let occupied = self.all_occupied;
        for piece in [Piece::Bishop, Piece::Rook, Piece::Queen] {
            for from in self.pieces(ctx.us, piece) {
                let attacks = match piece {
                    Piece::Bishop => bishop_attacks(from, occupied),
                    Piece::Rook => rook_attacks(from, occupied),
                    _ => queen_attacks(from, occupied),
                };
                let targets = ctx.filter_pinned(from, attacks & ctx.target);
                self.push_targets(from, targets, moves);
            }
        }
    }
}
