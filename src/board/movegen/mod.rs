//! Move generation.
//!
//! Legal generation first finds the checkers and the pinned pieces of the side
//! to move, then restricts destinations up front: double check allows only
//! king moves, single check limits other pieces to capturing the checker or
//! blocking its ray, and pinned pieces stay on their pin line. King steps are
//! tested against enemy attacks with the king lifted off the board. En passant
//! removes two pieces at once, so it gets its own discovered-check test.

mod attacks;
mod kings;
mod knights;
mod pawns;
mod sliders;

use super::attack_tables::line;
use super::{Bitboard, Board, Color, Move, MoveList, Piece, Square};

/// Which moves a generator call produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GenMode {
    /// Every legal move.
    Legal,
    /// Legal captures and queen promotions, for quiescence.
    Captures,
    /// Moves that obey piece movement but may leave the king in check.
    PseudoLegal,
}

/// Per-call generation constraints.
pub(crate) struct GenContext {
    pub(crate) us: Color,
    pub(crate) them: Color,
    pub(crate) king_sq: Square,
    pub(crate) in_check: bool,
    pub(crate) checkers: Bitboard,
    pub(crate) pinned: Bitboard,
    /// Squares that resolve a single check (all squares when not in check).
    pub(crate) evasion: Bitboard,
    /// Destination filter for non-king pieces.
    pub(crate) target: Bitboard,
    pub(crate) mode: GenMode,
}

impl GenContext {
    #[inline]
    pub(crate) fn checks_legality(&self) -> bool {
        self.mode != GenMode::PseudoLegal
    }

    /// Restrict the destinations of a piece standing on `from`.
    #[inline]
    pub(crate) fn filter_pinned(&self, from: Square, targets: Bitboard) -> Bitboard {
        if self.checks_legality() && self.pinned.contains(from) {
            targets & line(self.king_sq, from)
        } else {
            targets
        }
    }
}

impl Board {
    fn gen_context(&self, mode: GenMode) -> GenContext {
        let us = self.side_to_move;
        let them = us.opponent();
        let king_sq = self.king_square(us);
        let checkers = self.checkers();
        let in_check = checkers.any();

        let (pinned, evasion) = if mode == GenMode::PseudoLegal {
            (Bitboard::EMPTY, Bitboard::ALL)
        } else {
            let evasion = match checkers.lsb() {
                None => Bitboard::ALL,
                Some(_) if checkers.more_than_one() => Bitboard::EMPTY,
                Some(checker) => super::attack_tables::between(king_sq, checker) | checkers,
            };
            (self.pinned(us), evasion)
        };

        let mut target = !self.occupied_by(us) & evasion;
        if mode == GenMode::Captures {
            target &= self.occupied_by(them);
        }

        GenContext {
            us,
            them,
            king_sq,
            in_check,
            checkers,
            pinned,
            evasion,
            target,
            mode,
        }
    }

    fn generate(&self, mode: GenMode) -> MoveList {
        let ctx = self.gen_context(mode);
        let mut moves = MoveList::new();

        // Double check: only the king can move
        if ctx.checks_legality() && ctx.checkers.more_than_one() {
            self.generate_king_moves(&ctx, &mut moves);
            return moves;
        }

        self.generate_pawn_moves(&ctx, &mut moves);
        self.generate_knight_moves(&ctx, &mut moves);
        self.generate_slider_moves(&ctx, &mut moves);
        self.generate_king_moves(&ctx, &mut moves);
        moves
    }

    /// All legal moves for the side to move.
    #[must_use]
    pub fn generate_moves(&self) -> MoveList {
        self.generate(GenMode::Legal)
    }

    /// Legal captures (en passant included) and queen promotions.
    #[must_use]
    pub fn generate_captures(&self) -> MoveList {
        self.generate(GenMode::Captures)
    }

    /// Moves that follow piece movement rules without checking king safety.
    /// Filter with `is_legal` before playing them.
    #[must_use]
    pub fn generate_pseudo_legal_moves(&self) -> MoveList {
        self.generate(GenMode::PseudoLegal)
    }

    /// Full legality test for a move produced by `generate_pseudo_legal_moves`.
    #[must_use]
    pub fn is_legal(&self, mv: Move) -> bool {
        let us = self.side_to_move;
        let from = mv.from();
        let to = mv.to();

        if mv.is_castling() {
            // Castling is only generated when the transit squares are safe
            return true;
        }

        if self.piece_on(from) == Some(Piece::King) {
            let occupancy = self.all_occupied ^ Bitboard::from_square(from);
            return !self.is_attacked_with(to, us.opponent(), occupancy);
        }

        let king_sq = self.king_square(us);
        let checkers = self.checkers();
        if mv.is_en_passant() {
            return self.en_passant_is_legal(from, to, king_sq, checkers);
        }

        if let Some(checker) = checkers.lsb() {
            if checkers.more_than_one() {
                return false;
            }
            let evasion = super::attack_tables::between(king_sq, checker) | checkers;
            if !evasion.contains(to) {
                return false;
            }
        }

        !self.pinned(us).contains(from) || line(king_sq, from).contains(to)
    }

    /// Whether the side to move is checkmated.
    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.is_in_check() && self.generate_moves().is_empty()
    }

    /// Whether the side to move is stalemated.
    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check() && self.generate_moves().is_empty()
    }

    /// Count leaf nodes of the legal move tree to `depth`.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for mv in moves {
            let mut child = self.play(mv);
            nodes += child.perft(depth - 1);
        }
        nodes
    }

    /// Per-move leaf counts at `depth`, in generation order. Empty at depth 0,
    /// where no move is played.
    pub fn perft_divide(&mut self, depth: usize) -> Vec<(Move, u64)> {
        if depth == 0 {
            return Vec::new();
        }
        let moves = self.generate_moves();
        moves
            .into_iter()
            .map(|mv| {
                let mut child = self.play(mv);
                let nodes = if depth <= 1 { 1 } else { child.perft(depth - 1) };
                (mv, nodes)
            })
            .collect()
    }

    /// Emit one move per target square, recording whatever stands there as captured.
    #[inline]
    pub(crate) fn push_targets(&self, from: Square, targets: Bitboard, moves: &mut MoveList) {
        for to in targets {
            moves.push(Move::new(from, to, self.piece_on(to)));
        }
    }
}
