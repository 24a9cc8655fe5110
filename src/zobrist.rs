//! Zobrist hashing keys.
//!
//! One random key per (color, piece, square), per castling-right bit, per
//! en-passant file, plus a side-to-move key. Generated once from a fixed seed
//! so hashes are stable across runs.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{CastlingRights, Color, Piece, Square};

pub(crate) struct ZobristKeys {
    // piece_keys[color][piece][square]
    piece_keys: [[[u64; 64]; 6]; 2],
    black_to_move_key: u64,
    // One key per castling bit, in K Q k q order
    castling_keys: [u64; 4],
    en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(1234567890_u64);
        let mut piece_keys = [[[0; 64]; 6]; 2];

        for color in &mut piece_keys {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let black_to_move_key = rng.gen();
        let castling_keys = [rng.gen(), rng.gen(), rng.gen(), rng.gen()];
        let mut en_passant_keys = [0; 8];
        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }

    #[inline]
    pub(crate) fn piece(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.piece_keys[color.index()][piece.index()][sq.index()]
    }

    #[inline]
    pub(crate) fn side(&self) -> u64 {
        self.black_to_move_key
    }

    /// XOR of the keys of every right set in `rights`.
    #[inline]
    pub(crate) fn castling(&self, rights: CastlingRights) -> u64 {
        let bits = rights.as_u8();
        self.castling_keys
            .iter()
            .enumerate()
            .filter(|(i, _)| bits & (1 << i) != 0)
            .fold(0, |acc, (_, key)| acc ^ key)
    }

    #[inline]
    pub(crate) fn en_passant(&self, sq: Square) -> u64 {
        self.en_passant_keys[sq.file() as usize]
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castling_key_is_xor_of_bits() {
        let keys = &*ZOBRIST;
        let all = keys.castling(CastlingRights::all());
        let mut folded = 0;
        for bit in 0..4 {
            folded ^= keys.castling(CastlingRights::from_u8(1 << bit));
        }
        assert_eq!(all, folded);
        assert_eq!(keys.castling(CastlingRights::none()), 0);
    }

    #[test]
    fn keys_are_distinct() {
        let keys = &*ZOBRIST;
        let a = keys.piece(Color::White, Piece::Pawn, Square(8));
        let b = keys.piece(Color::Black, Piece::Pawn, Square(8));
        assert_ne!(a, b);
        assert_ne!(keys.side(), 0);
    }
}
