//! Magic bitboards for rook and bishop attacks.
//!
//! For every square the relevant occupancy mask (the slider's rays minus the
//! board edge) is hashed with `(occ & mask) * magic >> shift` into a dense slice
//! of one shared attack table. Magics are found once per process by a seeded
//! random search that is checked against ray-cast attacks for every occupancy
//! subset, so a lookup is always exact.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const MAGIC_SEED: u64 = 0x5EED_CAFE_F00D_0001;

#[derive(Clone, Copy, Debug, Default)]
struct MagicEntry {
    mask: u64,
    magic: u64,
    shift: u32,
    offset: usize,
}

impl MagicEntry {
    #[inline(always)]
    fn index(&self, occupied: u64) -> usize {
        self.offset + ((occupied & self.mask).wrapping_mul(self.magic) >> self.shift) as usize
    }
}

struct MagicTables {
    rook: [MagicEntry; 64],
    bishop: [MagicEntry; 64],
    attacks: Vec<u64>,
}

static MAGIC_TABLES: Lazy<MagicTables> = Lazy::new(build_tables);

/// Ray-cast attacks from `sq`, stopping at (and including) the first blocker.
pub(crate) fn slider_attacks_slow(sq: usize, occupied: u64, dirs: &[(i8, i8); 4]) -> u64 {
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;
    let mut attacks = 0u64;
    for &(dr, df) in dirs {
        let (mut r, mut f) = (rank + dr, file + df);
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if occupied & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// Squares whose occupancy can change the attack set. The last square of each ray is excluded.
fn relevant_mask(sq: usize, dirs: &[(i8, i8); 4]) -> u64 {
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;
    let mut mask = 0u64;
    for &(dr, df) in dirs {
        let (mut r, mut f) = (rank + dr, file + df);
        while (0..8).contains(&(r + dr)) && (0..8).contains(&(f + df)) {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Every subset of `mask`, via the carry-rippler walk.
fn occupancy_subsets(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1 << mask.count_ones());
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

/// Search for a collision-free magic and write its slice of the attack table.
fn find_magic(
    sq: usize,
    dirs: &[(i8, i8); 4],
    rng: &mut StdRng,
    attacks: &mut Vec<u64>,
) -> MagicEntry {
    let mask = relevant_mask(sq, dirs);
    let bits = mask.count_ones();
    let size = 1usize << bits;
    let occupancies = occupancy_subsets(mask);
    let reference: Vec<u64> = occupancies
        .iter()
        .map(|&occ| slider_attacks_slow(sq, occ, dirs))
        .collect();

    let mut table = vec![0u64; size];
    // Attempt number that last wrote each slot; avoids clearing the table per try.
    let mut epoch = vec![0u32; size];
    let mut attempt = 0u32;

    loop {
        // Sparse candidates hash well
        let magic = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        if (mask.wrapping_mul(magic) >> 56).count_ones() < 6 {
            continue;
        }
        attempt += 1;

        let entry = MagicEntry {
            mask,
            magic,
            shift: 64 - bits,
            offset: 0,
        };
        let collision_free = occupancies.iter().zip(&reference).all(|(&occ, &att)| {
            let idx = entry.index(occ);
            if epoch[idx] != attempt {
                epoch[idx] = attempt;
                table[idx] = att;
                true
            } else {
                table[idx] == att
            }
        });

        if collision_free {
            let offset = attacks.len();
            attacks.extend_from_slice(&table);
            return MagicEntry { offset, ..entry };
        }
    }
}

fn build_tables() -> MagicTables {
    let mut rng = StdRng::seed_from_u64(MAGIC_SEED);
    let mut attacks = Vec::with_capacity(102_400 + 5_248);
    let mut rook = [MagicEntry::default(); 64];
    let mut bishop = [MagicEntry::default(); 64];
    for sq in 0..64 {
        rook[sq] = find_magic(sq, &ROOK_DIRS, &mut rng, &mut attacks);
    }
    for sq in 0..64 {
        bishop[sq] = find_magic(sq, &BISHOP_DIRS, &mut rng, &mut attacks);
    }
    log::debug!("magic tables ready: {} attack entries", attacks.len());
    MagicTables {
        rook,
        bishop,
        attacks,
    }
}

/// Force table construction (otherwise done on first lookup).
pub fn init() {
    Lazy::force(&MAGIC_TABLES);
}

#[inline(always)]
pub(crate) fn rook_attacks(sq: usize, occupied: u64) -> u64 {
    let tables = &*MAGIC_TABLES;
    tables.attacks[tables.rook[sq].index(occupied)]
}

#[inline(always)]
pub(crate) fn bishop_attacks(sq: usize, occupied: u64) -> u64 {
    let tables = &*MAGIC_TABLES;
    tables.attacks[tables.bishop[sq].index(occupied)]
}

pub(crate) fn rook_rays_slow(sq: usize, occupied: u64) -> u64 {
    slider_attacks_slow(sq, occupied, &ROOK_DIRS)
}

pub(crate) fn bishop_rays_slow(sq: usize, occupied: u64) -> u64 {
    slider_attacks_slow(sq, occupied, &BISHOP_DIRS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_exclude_edges() {
        // Rook on a1: a2..a7 and b1..g1
        assert_eq!(relevant_mask(0, &ROOK_DIRS).count_ones(), 12);
        // Rook on e4: 10 relevant squares
        assert_eq!(relevant_mask(28, &ROOK_DIRS).count_ones(), 10);
        // Bishop on d4: 9 relevant squares
        assert_eq!(relevant_mask(27, &BISHOP_DIRS).count_ones(), 9);
    }

    #[test]
    fn lookups_match_ray_casting_for_random_boards() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let occ = rng.gen::<u64>() & rng.gen::<u64>();
            let sq = rng.gen_range(0..64);
            assert_eq!(rook_attacks(sq, occ), rook_rays_slow(sq, occ));
            assert_eq!(bishop_attacks(sq, occ), bishop_rays_slow(sq, occ));
        }
    }

    #[test]
    fn rook_attack_includes_first_blocker() {
        // Rook a1, blocker a4: a2, a3, a4 plus the whole first rank
        let occ = 1u64 << 24;
        let expected = (1u64 << 8) | (1u64 << 16) | (1u64 << 24) | 0xFE;
        assert_eq!(rook_attacks(0, occ), expected);
    }
}
