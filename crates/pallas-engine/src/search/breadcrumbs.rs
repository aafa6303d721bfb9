//! Advisory markers telling workers which deep subtrees another worker is
//! already inside.
//!
//! Marking is best effort: the owner and hash words are written separately,
//! so a racing reader can see a half-claimed slot. Aliasing hashes share a
//! slot. Both only ever produce a spurious "elsewhere", which nothing relies
//! on for correctness.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

const SLOTS: usize = 1024;

/// Marks are only placed on nodes with more remaining depth than this.
pub const MIN_MARK_DEPTH: i32 = 8;

struct Crumb {
    /// Worker id plus one, zero when free.
    owner: AtomicUsize,
    hash: AtomicU64,
}

/// Shared marker table, one per engine.
pub struct Breadcrumbs {
    crumbs: Box<[Crumb]>,
}

/// Outcome of [`Breadcrumbs::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mark {
    /// Another worker already holds this position.
    pub elsewhere: bool,
    /// This call claimed the slot and must release it.
    pub owning: bool,
}

impl Breadcrumbs {
    pub fn new() -> Breadcrumbs {
        Breadcrumbs {
            crumbs: (0..SLOTS)
                .map(|_| Crumb {
                    owner: AtomicUsize::new(0),
                    hash: AtomicU64::new(0),
                })
                .collect(),
        }
    }

    fn crumb(&self, hash: u64) -> &Crumb {
        &self.crumbs[hash as usize & (SLOTS - 1)]
    }

    pub fn clear(&self) {
        for crumb in self.crumbs.iter() {
            crumb.owner.store(0, Ordering::Relaxed);
            crumb.hash.store(0, Ordering::Relaxed);
        }
    }

    pub fn mark(&self, worker: usize, hash: u64, depth: i32) -> Mark {
        if depth <= MIN_MARK_DEPTH {
            return Mark::default();
        }
        let crumb = self.crumb(hash);
        let me = worker + 1;
        match crumb.owner.load(Ordering::Acquire) {
            0 => {
                crumb.hash.store(hash, Ordering::Relaxed);
                crumb.owner.store(me, Ordering::Release);
                Mark { elsewhere: false, owning: true }
            }
            owner if owner != me && crumb.hash.load(Ordering::Relaxed) == hash => Mark {
                elsewhere: true,
                owning: false,
            },
            _ => Mark::default(),
        }
    }

    /// Release the slot for `hash`. Harmless when it was never marked.
    pub fn unmark(&self, hash: u64) {
        self.crumb(hash).owner.store(0, Ordering::Release);
    }

    /// Mark `hash` and release it again when the returned guard drops.
    pub fn enter(&self, worker: usize, hash: u64, depth: i32) -> CrumbGuard<'_> {
        let mark = self.mark(worker, hash, depth);
        CrumbGuard {
            table: self,
            hash,
            mark,
        }
    }
}

impl Default for Breadcrumbs {
    fn default() -> Self {
        Breadcrumbs::new()
    }
}

impl std::fmt::Debug for Breadcrumbs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let held = self
            .crumbs
            .iter()
            .filter(|c| c.owner.load(Ordering::Relaxed) != 0)
            .count();
        f.debug_struct("Breadcrumbs").field("held", &held).finish()
    }
}

/// Scope of one mark. Unmarks on drop when the mark was claimed, including
/// when the search unwinds through an abort.
pub struct CrumbGuard<'a> {
    table: &'a Breadcrumbs,
    hash: u64,
    mark: Mark,
}

impl CrumbGuard<'_> {
    pub fn mark(&self) -> Mark {
        self.mark
    }
}

impl Drop for CrumbGuard<'_> {
    fn drop(&mut self) {
        if self.mark.owning {
            self.table.unmark(self.hash);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: u64 = 0x1234_5678_9ABC_DEF0;

    #[test]
    fn shallow_nodes_are_not_marked() {
        let crumbs = Breadcrumbs::new();
        assert_eq!(crumbs.mark(0, HASH, MIN_MARK_DEPTH), Mark::default());
        assert!(crumbs.mark(1, HASH, MIN_MARK_DEPTH + 1).owning);
    }

    #[test]
    fn claim_then_seen_elsewhere() {
        let crumbs = Breadcrumbs::new();
        assert_eq!(crumbs.mark(0, HASH, 10), Mark { elsewhere: false, owning: true });
        assert_eq!(crumbs.mark(1, HASH, 10), Mark { elsewhere: true, owning: false });
        // The owner itself is not "elsewhere".
        assert_eq!(crumbs.mark(0, HASH, 10), Mark::default());
    }

    #[test]
    fn aliasing_hash_is_not_elsewhere() {
        let crumbs = Breadcrumbs::new();
        crumbs.mark(0, HASH, 10);
        let alias = HASH ^ 0xFFFF_0000_0000_0000;
        assert_eq!(crumbs.mark(1, alias, 10), Mark::default());
    }

    #[test]
    fn unmark_frees_slot_and_is_idempotent() {
        let crumbs = Breadcrumbs::new();
        crumbs.unmark(HASH);
        crumbs.mark(0, HASH, 10);
        crumbs.unmark(HASH);
        crumbs.unmark(HASH);
        assert!(crumbs.mark(1, HASH, 10).owning);
    }

    #[test]
    fn guard_releases_owned_mark() {
        let crumbs = Breadcrumbs::new();
        {
            let guard = crumbs.enter(2, HASH, 12);
            assert!(guard.mark().owning);
            let other = crumbs.enter(3, HASH, 12);
            assert!(other.mark().elsewhere);
        }
        assert!(crumbs.mark(3, HASH, 12).owning);
    }
}
