use crate::board::attack_tables::knight_attacks;
use crate::board::{Board, MoveList, Piece};

use super::GenContext;

impl Board {
    pub(super) fn generate_knight_moves(&self, ctx: &GenContext, moves: &mut MoveList) {
        for from in self.pieces(ctx.us, Piece::Knight) {
            // A pinned knight can never stay on its pin line
            if ctx.checks_legality() && ctx.pinned.contains(from) {
                continue;
            }
            self.push_targets(from, knight_attacks(from) & ctx.target, moves);
        }
    }
}
