//! Precomputed attack tables for leaper pieces and square-pair geometry.

use once_cell::sync::Lazy;

use super::magic::{bishop_rays_slow, rook_rays_slow};

fn leaper_table(deltas: &[(i8, i8)]) -> [u64; 64] {
    let mut attacks = [0u64; 64];
    for (sq, slot) in attacks.iter_mut().enumerate() {
        let r = (sq / 8) as i8;
        let f = (sq % 8) as i8;
        let mut mask = 0u64;
        for &(dr, df) in deltas {
            let nr = r + dr;
            let nf = f + df;
            if (0..8).contains(&nr) && (0..8).contains(&nf) {
                mask |= 1u64 << (nr * 8 + nf);
            }
        }
        *slot = mask;
    }
    attacks
}

pub(crate) static KNIGHT_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| {
    leaper_table(&[
        (2, 1),
        (1, 2),
        (-1, 2),
        (-2, 1),
        (-2, -1),
        (-1, -2),
        (1, -2),
        (2, -1),
    ])
});

pub(crate) static KING_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| {
    leaper_table(&[
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ])
});

/// Pawn capture targets indexed by [color][square].
pub(crate) static PAWN_ATTACKS: Lazy<[[u64; 64]; 2]> =
    Lazy::new(|| [leaper_table(&[(1, -1), (1, 1)]), leaper_table(&[(-1, -1), (-1, 1)])]);

/// Squares strictly between two aligned squares, empty when not aligned.
pub(crate) static BETWEEN: Lazy<Box<[[u64; 64]; 64]>> = Lazy::new(|| {
    let mut table = Box::new([[0u64; 64]; 64]);
    for a in 0..64 {
        for b in 0..64 {
            if a == b {
                continue;
            }
            let b_bit = 1u64 << b;
            let a_bit = 1u64 << a;
            if rook_rays_slow(a, 0) & b_bit != 0 {
                table[a][b] = rook_rays_slow(a, b_bit) & rook_rays_slow(b, a_bit);
            } else if bishop_rays_slow(a, 0) & b_bit != 0 {
                table[a][b] = bishop_rays_slow(a, b_bit) & bishop_rays_slow(b, a_bit);
            }
        }
    }
    table
});

/// Full edge-to-edge line through two aligned squares, empty when not aligned.
pub(crate) static LINE: Lazy<Box<[[u64; 64]; 64]>> = Lazy::new(|| {
    let mut table = Box::new([[0u64; 64]; 64]);
    for a in 0..64 {
        for b in 0..64 {
            if a == b {
                continue;
            }
            let ends = (1u64 << a) | (1u64 << b);
            if rook_rays_slow(a, 0) & (1u64 << b) != 0 {
                table[a][b] = (rook_rays_slow(a, 0) & rook_rays_slow(b, 0)) | ends;
            } else if bishop_rays_slow(a, 0) & (1u64 << b) != 0 {
                table[a][b] = (bishop_rays_slow(a, 0) & bishop_rays_slow(b, 0)) | ends;
            }
        }
    }
    table
});
