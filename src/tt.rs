//! Transposition table for caching search results.
//!
//! One slot per index, `hash % capacity`. A new entry replaces the occupant
//! unless the occupant was written during the current search with a strictly
//! greater depth. Entries from earlier searches are kept for probing but are
//! always replaceable.
//!
//! Slots are lockless: each holds `key ^ data` and `data` as two atomics,
//! so a torn read from a concurrent writer fails the key check and is
//! treated as a miss.

use std::mem;
use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};

use crate::board::Move;

/// Default table size in megabytes.
pub const DEFAULT_TT_MB: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundType {
    Exact,      // Score is the exact value
    LowerBound, // Score is at least this value (failed high - score >= beta)
    UpperBound, // Score is at most this value (failed low - score <= alpha)
}

impl BoundType {
    fn to_bits(self) -> u64 {
        match self {
            BoundType::Exact => 0,
            BoundType::LowerBound => 1,
            BoundType::UpperBound => 2,
        }
    }

    fn from_bits(v: u64) -> Self {
        match v & 0x3 {
            0 => BoundType::Exact,
            1 => BoundType::LowerBound,
            _ => BoundType::UpperBound,
        }
    }
}

/// Unpacked entry as returned by `probe`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    pub depth: u8,
    pub score: i16,
    pub bound_type: BoundType,
    pub best_move: Option<Move>,
    pub generation: u8,
}

impl TTEntry {
    pub fn depth(&self) -> i32 {
        i32::from(self.depth)
    }

    pub fn score(&self) -> i32 {
        i32::from(self.score)
    }

    pub fn bound_type(&self) -> BoundType {
        self.bound_type
    }

    pub fn best_move(&self) -> Option<Move> {
        self.best_move
    }
}

const MOVE_BITS: u32 = 21;
const SCORE_SHIFT: u32 = MOVE_BITS;
const DEPTH_SHIFT: u32 = SCORE_SHIFT + 16;
const BOUND_SHIFT: u32 = DEPTH_SHIFT + 8;
const GENERATION_SHIFT: u32 = BOUND_SHIFT + 2;
const GENERATION_MASK: u8 = 0x3F;
const VALID_BIT: u64 = 1 << 63;

/// Packed entry format:
/// - bits 0-20:  move (0 = no move)
/// - bits 21-36: score (i16)
/// - bits 37-44: depth (u8)
/// - bits 45-46: bound
/// - bits 47-52: generation (6 bits)
/// - bit 63:     occupied marker, so an all-zero entry is still distinguishable from empty
fn pack_entry(entry: &TTEntry) -> u64 {
    let mv = entry.best_move.map_or(0, Move::as_u32) as u64 & ((1 << MOVE_BITS) - 1);
    let score = u64::from(entry.score as u16);
    mv | score << SCORE_SHIFT
        | u64::from(entry.depth) << DEPTH_SHIFT
        | entry.bound_type.to_bits() << BOUND_SHIFT
        | u64::from(entry.generation & GENERATION_MASK) << GENERATION_SHIFT
        | VALID_BIT
}

fn unpack_entry(data: u64) -> TTEntry {
    let mv_bits = (data & ((1 << MOVE_BITS) - 1)) as u32;
    TTEntry {
        depth: ((data >> DEPTH_SHIFT) & 0xFF) as u8,
        score: ((data >> SCORE_SHIFT) & 0xFFFF) as u16 as i16,
        bound_type: BoundType::from_bits(data >> BOUND_SHIFT),
        best_move: (mv_bits != 0).then(|| Move::from_u32(mv_bits)),
        generation: ((data >> GENERATION_SHIFT) as u8) & GENERATION_MASK,
    }
}

struct TTSlot {
    /// hash ^ packed data
    key_xor: AtomicU64,
    data: AtomicU64,
}

impl TTSlot {
    fn new() -> Self {
        TTSlot {
            key_xor: AtomicU64::new(0),
            data: AtomicU64::new(0),
        }
    }

    fn store(&self, hash: u64, packed: u64) {
        self.data.store(packed, Ordering::Relaxed);
        self.key_xor.store(hash ^ packed, Ordering::Relaxed);
    }

    fn probe(&self, hash: u64) -> Option<TTEntry> {
        let key_xor = self.key_xor.load(Ordering::Relaxed);
        let data = self.data.load(Ordering::Relaxed);
        if data != 0 && key_xor ^ data == hash {
            Some(unpack_entry(data))
        } else {
            None
        }
    }

    /// Occupant regardless of key.
    fn occupant(&self) -> Option<TTEntry> {
        let data = self.data.load(Ordering::Relaxed);
        (data != 0).then(|| unpack_entry(data))
    }

    fn clear(&self) {
        self.key_xor.store(0, Ordering::Relaxed);
        self.data.store(0, Ordering::Relaxed);
    }
}

/// Fixed-capacity, depth-preferred transposition table.
///
/// Shared by reference (`&self` everywhere) so one table can serve several searches.
pub struct TranspositionTable {
    slots: Vec<TTSlot>,
    filled: AtomicUsize,
    generation: AtomicU8,
}

impl TranspositionTable {
    /// Table sized to roughly `size_mb` megabytes.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        Self::with_capacity(Self::slots_for_mb(size_mb))
    }

    /// Table with exactly `capacity` slots (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, TTSlot::new);
        log::debug!("transposition table allocated with {capacity} slots");
        TranspositionTable {
            slots,
            filled: AtomicUsize::new(0),
            generation: AtomicU8::new(0),
        }
    }

    fn slots_for_mb(size_mb: usize) -> usize {
        (size_mb * 1024 * 1024) / mem::size_of::<TTSlot>()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn slot(&self, hash: u64) -> &TTSlot {
        &self.slots[(hash % self.slots.len() as u64) as usize]
    }

    /// Entry stored for `hash`, if the slot holds that key.
    pub fn probe(&self, hash: u64) -> Option<TTEntry> {
        self.slot(hash).probe(hash)
    }

    /// Store a search result under the current generation.
    ///
    /// The incoming entry wins unless the occupant belongs to this search and
    /// is strictly deeper. Depth saturates at 255 and score at the `i16` range.
    pub fn store(
        &self,
        hash: u64,
        depth: i32,
        score: i32,
        bound_type: BoundType,
        best_move: Option<Move>,
    ) {
        let generation = self.generation();
        let depth = depth.clamp(0, i32::from(u8::MAX)) as u8;
        let slot = self.slot(hash);

        match slot.occupant() {
            Some(old) if old.generation == generation && old.depth > depth => return,
            Some(_) => {}
            None => {
                self.filled.fetch_add(1, Ordering::Relaxed);
            }
        }

        let entry = TTEntry {
            depth,
            score: score.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16,
            bound_type,
            best_move: best_move.filter(|mv| !mv.is_null()),
            generation,
        };
        slot.store(hash, pack_entry(&entry));
    }

    /// Start a new search epoch. Entries from older epochs become replaceable.
    pub fn new_search(&self) {
        let next = self.generation().wrapping_add(1) & GENERATION_MASK;
        self.generation.store(next, Ordering::Relaxed);
    }

    #[must_use]
    pub fn generation(&self) -> u8 {
        self.generation.load(Ordering::Relaxed)
    }

    /// Fraction of slots in use, 0.0 to 1.0.
    #[must_use]
    pub fn load_factor(&self) -> f64 {
        self.filled.load(Ordering::Relaxed) as f64 / self.slots.len() as f64
    }

    /// Load factor in per mille (0-1000).
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        (self.load_factor() * 1000.0).round() as u32
    }

    /// Empty every slot and reset load tracking and the epoch.
    pub fn clear(&self) {
        for slot in &self.slots {
            slot.clear();
        }
        self.filled.store(0, Ordering::Relaxed);
        self.generation.store(0, Ordering::Relaxed);
        log::debug!("transposition table cleared ({} slots)", self.slots.len());
    }

    /// Reallocate to roughly `size_mb` megabytes, dropping all entries.
    pub fn resize(&mut self, size_mb: usize) {
        *self = Self::new(size_mb);
        log::debug!("transposition table resized to {size_mb} MB");
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(DEFAULT_TT_MB)
    }
}
