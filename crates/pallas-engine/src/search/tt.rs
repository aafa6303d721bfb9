//! Lockless transposition table shared by every search worker.
//!
//! Each slot is two `AtomicU64` words written without locks. A torn write
//! from a racing worker is caught by an XOR check and reported as a miss.
//!
//! ```text
//! word0: [63:32] key32 | [31:27] generation | [26:25] bound | [23:16] depth | [15:0] move
//! word1: [63:32] key32 ^ low32(word0)       | [15:0] value (i16)
//! ```

use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use pallas_core::Move;

use crate::search::{MATE, VALUE_WIN};

const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn check() {
        assert_send_sync::<TranspositionTable>();
    }
    let _ = check;
};

/// What a stored value says about the true score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Bound {
    /// Failed low: the true score is at most the value.
    Alpha = 1,
    /// Failed high: the true score is at least the value.
    Beta = 2,
    Exact = 3,
}

impl Bound {
    const fn from_bits(bits: u64) -> Option<Bound> {
        match bits & 0x03 {
            1 => Some(Bound::Alpha),
            2 => Some(Bound::Beta),
            3 => Some(Bound::Exact),
            _ => None,
        }
    }
}

/// A successful probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    /// Value relative to the probing ply.
    pub value: i32,
    pub depth: u8,
    pub mv: Move,
    pub bound: Bound,
}

/// Mate values are stored relative to the node rather than the root.
fn value_to_tt(value: i32, ply: usize) -> i16 {
    let ply = ply as i32;
    let adjusted = if value >= VALUE_WIN {
        value + ply
    } else if value <= -VALUE_WIN {
        value - ply
    } else {
        value
    };
    adjusted.clamp(-MATE, MATE) as i16
}

fn value_from_tt(value: i16, ply: usize) -> i32 {
    let (value, ply) = (value as i32, ply as i32);
    if value >= VALUE_WIN {
        value - ply
    } else if value <= -VALUE_WIN {
        value + ply
    } else {
        value
    }
}

struct Slot {
    word0: AtomicU64,
    word1: AtomicU64,
}

impl Slot {
    const fn empty() -> Slot {
        Slot {
            word0: AtomicU64::new(0),
            word1: AtomicU64::new(0),
        }
    }

    fn pack(key32: u32, generation: u8, bound: Bound, depth: u8, mv: Move, value: i16) -> (u64, u64) {
        let w0 = ((key32 as u64) << 32)
            | (((generation & 0x1F) as u64) << 27)
            | ((bound as u64) << 25)
            | ((depth as u64) << 16)
            | mv.raw() as u64;
        let check = key32 ^ (w0 as u32);
        let w1 = ((check as u64) << 32) | (value as u16 as u64);
        (w0, w1)
    }

    /// Both words, or `None` when they come from different writes.
    fn load(&self) -> Option<(u64, u64)> {
        let w0 = self.word0.load(Ordering::Relaxed);
        let w1 = self.word1.load(Ordering::Relaxed);
        ((w0 >> 32) as u32 ^ w0 as u32 == (w1 >> 32) as u32).then_some((w0, w1))
    }
}

/// Fixed-size table of search results keyed by Zobrist hash.
pub struct TranspositionTable {
    slots: Box<[Slot]>,
    mask: u64,
    generation: AtomicU8,
}

impl TranspositionTable {
    /// Allocate roughly `mb` megabytes, rounded down to a power of two slots.
    pub fn new(mb: usize) -> TranspositionTable {
        let bytes = mb.max(1) * 1024 * 1024;
        let fit = (bytes / std::mem::size_of::<Slot>()).max(1);
        let count = 1usize << fit.ilog2();
        TranspositionTable {
            slots: (0..count).map(|_| Slot::empty()).collect(),
            mask: (count - 1) as u64,
            generation: AtomicU8::new(0),
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&self) {
        for slot in self.slots.iter() {
            slot.word0.store(0, Ordering::Relaxed);
            slot.word1.store(0, Ordering::Relaxed);
        }
        self.generation.store(0, Ordering::Relaxed);
    }

    /// Age every stored entry by one search. Called once per search.
    pub fn new_generation(&self) {
        let current = self.generation.load(Ordering::Relaxed);
        self.generation
            .store(current.wrapping_add(1) & 0x1F, Ordering::Relaxed);
    }

    fn slot(&self, key: u64) -> &Slot {
        &self.slots[(key & self.mask) as usize]
    }

    /// Look up `key`, translating mate values to distance from `ply`.
    pub fn get(&self, key: u64, ply: usize) -> Option<TtEntry> {
        let (w0, w1) = self.slot(key).load()?;
        if (w0 >> 32) as u32 != (key >> 32) as u32 {
            return None;
        }
        let bound = Bound::from_bits(w0 >> 25)?;
        Some(TtEntry {
            value: value_from_tt(w1 as u16 as i16, ply),
            depth: (w0 >> 16) as u8,
            mv: Move::from_raw(w0 as u16),
            bound,
        })
    }

    /// Store a result. An existing entry survives only when it belongs to
    /// this search, is deeper, and the new bound is not exact.
    pub fn set(&self, key: u64, value: i32, depth: i32, mv: Move, bound: Bound, ply: usize) {
        let slot = self.slot(key);
        let generation = self.generation.load(Ordering::Relaxed);
        let depth = depth.clamp(0, u8::MAX as i32) as u8;

        let existing = slot.word0.load(Ordering::Relaxed);
        let replace = Bound::from_bits(existing >> 25).is_none()
            || ((existing >> 27) & 0x1F) as u8 != generation
            || depth >= (existing >> 16) as u8
            || bound == Bound::Exact;
        if !replace {
            return;
        }

        let (w0, w1) = Slot::pack(
            (key >> 32) as u32,
            generation,
            bound,
            depth,
            mv,
            value_to_tt(value, ply),
        );
        slot.word0.store(w0, Ordering::Relaxed);
        slot.word1.store(w1, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("slots", &self.slots.len())
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pallas_core::{Move, Square};

    use super::*;

    const KEY: u64 = 0xDEAD_BEEF_1234_5678;

    #[test]
    fn slot_is_16_bytes() {
        assert_eq!(std::mem::size_of::<Slot>(), 16);
    }

    #[test]
    fn set_then_get() {
        let tt = TranspositionTable::new(1);
        let mv = Move::double_push(Square::E2, Square::E4);
        tt.set(KEY, -35, 7, mv, Bound::Exact, 3);
        assert_eq!(
            tt.get(KEY, 3),
            Some(TtEntry { value: -35, depth: 7, mv, bound: Bound::Exact })
        );
    }

    #[test]
    fn miss_and_foreign_key() {
        let tt = TranspositionTable::new(1);
        assert!(tt.get(KEY, 0).is_none());
        tt.set(KEY, 10, 1, Move::NONE, Bound::Beta, 0);
        // Same slot, different upper half.
        assert!(tt.get(KEY ^ 0xFFFF_0000_0000_0000, 0).is_none());
    }

    #[test]
    fn mate_values_are_node_relative() {
        let tt = TranspositionTable::new(1);
        // Mate found 5 plies below a node at ply 4: stored as mate in 5 from that node.
        let at_ply_4 = MATE - 9;
        tt.set(KEY, at_ply_4, 6, Move::NONE, Bound::Exact, 4);
        assert_eq!(tt.get(KEY, 4).map(|e| e.value), Some(at_ply_4));
        assert_eq!(tt.get(KEY, 2).map(|e| e.value), Some(MATE - 7));

        tt.set(KEY, -MATE + 9, 6, Move::NONE, Bound::Exact, 4);
        assert_eq!(tt.get(KEY, 1).map(|e| e.value), Some(-MATE + 6));
    }

    #[test]
    fn ordinary_values_untouched_by_ply() {
        assert_eq!(value_from_tt(value_to_tt(150, 40), 40), 150);
        assert_eq!(value_from_tt(value_to_tt(-VALUE_WIN + 1, 9), 0), -VALUE_WIN + 1);
    }

    #[test]
    fn shallower_write_keeps_deeper_entry() {
        let tt = TranspositionTable::new(1);
        let first = Move::quiet(Square::G1, Square::F3);
        let second = Move::quiet(Square::B1, Square::C3);
        tt.set(KEY, 20, 9, first, Bound::Beta, 0);
        tt.set(KEY, 30, 3, second, Bound::Alpha, 0);
        assert_eq!(tt.get(KEY, 0).map(|e| e.mv), Some(first));

        // An exact bound always wins.
        tt.set(KEY, 30, 3, second, Bound::Exact, 0);
        assert_eq!(tt.get(KEY, 0).map(|e| e.mv), Some(second));
    }

    #[test]
    fn older_generation_is_replaced() {
        let tt = TranspositionTable::new(1);
        let first = Move::quiet(Square::G1, Square::F3);
        let second = Move::quiet(Square::B1, Square::C3);
        tt.set(KEY, 20, 12, first, Bound::Beta, 0);
        tt.new_generation();
        tt.set(KEY, 30, 1, second, Bound::Alpha, 0);
        let entry = tt.get(KEY, 0).unwrap();
        assert_eq!((entry.mv, entry.depth, entry.bound), (second, 1, Bound::Alpha));
    }

    #[test]
    fn depth_is_clamped() {
        let tt = TranspositionTable::new(1);
        tt.set(KEY, 0, -3, Move::NONE, Bound::Alpha, 0);
        assert_eq!(tt.get(KEY, 0).map(|e| e.depth), Some(0));
        tt.set(KEY, 0, 900, Move::NONE, Bound::Alpha, 0);
        assert_eq!(tt.get(KEY, 0).map(|e| e.depth), Some(u8::MAX));
    }

    #[test]
    fn clear_empties_table() {
        let tt = TranspositionTable::new(1);
        tt.set(KEY, 1, 1, Move::NONE, Bound::Exact, 0);
        tt.clear();
        assert!(tt.get(KEY, 0).is_none());
    }

    #[test]
    fn torn_write_reads_as_miss() {
        let tt = TranspositionTable::new(1);
        tt.set(KEY, 100, 5, Move::NONE, Bound::Exact, 0);
        let slot = tt.slot(KEY);
        let w1 = slot.word1.load(Ordering::Relaxed);
        slot.word1.store(w1 ^ 0x0001_0000_0000_0000, Ordering::Relaxed);
        assert!(tt.get(KEY, 0).is_none());
    }

    #[test]
    fn capacity_is_power_of_two() {
        let tt = TranspositionTable::new(1);
        assert!(tt.capacity().is_power_of_two());
        assert_eq!(tt.capacity(), 1024 * 1024 / 16);
    }

    #[test]
    fn concurrent_writers_never_panic() {
        let tt = TranspositionTable::new(2);
        std::thread::scope(|s| {
            for t in 0..8u64 {
                let tt = &tt;
                s.spawn(move || {
                    for i in 0u64..10_000 {
                        let key = t
                            .wrapping_mul(6_364_136_223_846_793_005)
                            .wrapping_add(i.wrapping_mul(2_862_933_555_777_941_757));
                        tt.set(key, (i % 300) as i32, (i % 20) as i32, Move::NONE, Bound::Beta, 0);
                        if let Some(entry) = tt.get(key, 0) {
                            assert!(entry.value.abs() <= MATE);
                        }
                    }
                });
            }
        });
    }
}
