//! Search budgets and the two cancellation tiers.
//!
//! The soft tier is consulted by the orchestrator between completed depths.
//! The hard tier is consulted by every worker at node granularity and
//! unwinds the recursion through [`Aborted`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// The hard limit tripped mid-search. Only ever produced by node counting
/// and consumed once at the top of each worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("search aborted")]
pub struct Aborted;

/// How much a search may spend. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchLimits {
    /// Stop once a result at this depth is accepted.
    pub depth: Option<i32>,
    /// Node budget, enforced at both tiers.
    pub nodes: Option<u64>,
    /// Do not start reporting deeper results after this.
    pub soft_time: Option<Duration>,
    /// Abort in-flight recursion after this.
    pub hard_time: Option<Duration>,
}

impl SearchLimits {
    pub fn infinite() -> SearchLimits {
        SearchLimits::default()
    }

    pub fn depth(depth: i32) -> SearchLimits {
        SearchLimits {
            depth: Some(depth.max(1)),
            ..SearchLimits::default()
        }
    }

    pub fn nodes(nodes: u64) -> SearchLimits {
        SearchLimits {
            nodes: Some(nodes),
            ..SearchLimits::default()
        }
    }

    /// Spend exactly `time`: both tiers fire at the same instant.
    pub fn movetime(time: Duration) -> SearchLimits {
        SearchLimits {
            soft_time: Some(time),
            hard_time: Some(time),
            ..SearchLimits::default()
        }
    }
}

/// Shared by the orchestrator and every worker of one search.
#[derive(Debug)]
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Instant,
    limits: SearchLimits,
    nodes: AtomicU64,
}

impl SearchControl {
    /// Start the clock now. `stopped` may be set from any thread to end the
    /// search as soon as possible.
    pub fn new(stopped: Arc<AtomicBool>, limits: SearchLimits) -> SearchControl {
        SearchControl {
            stopped,
            start: Instant::now(),
            limits,
            nodes: AtomicU64::new(0),
        }
    }

    pub fn infinite(stopped: Arc<AtomicBool>) -> SearchControl {
        SearchControl::new(stopped, SearchLimits::infinite())
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Nodes flushed by the workers so far.
    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    pub fn add_nodes(&self, count: u64) {
        self.nodes.fetch_add(count, Ordering::Relaxed);
    }

    /// Cheap per-node check of the stop flag alone.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Hard tier. A tripped deadline or node budget raises the stop flag so
    /// every other worker unwinds at its next node.
    pub fn should_abort(&self) -> bool {
        if self.is_stopped() {
            return true;
        }
        let out_of_time = self.limits.hard_time.is_some_and(|hard| self.elapsed() >= hard);
        let out_of_nodes = self.limits.nodes.is_some_and(|max| self.nodes() >= max);
        if out_of_time || out_of_nodes {
            self.stop();
            return true;
        }
        false
    }

    /// Soft tier, asked once per accepted depth.
    pub fn is_soft_timeout(&self, depth: i32, nodes: u64) -> bool {
        self.limits.depth.is_some_and(|max| depth >= max)
            || self.limits.nodes.is_some_and(|max| nodes >= max)
            || self.limits.soft_time.is_some_and(|soft| self.elapsed() >= soft)
    }

    /// Time left before the hard deadline, if there is one.
    pub fn hard_remaining(&self) -> Option<Duration> {
        self.limits
            .hard_time
            .map(|hard| hard.saturating_sub(self.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(limits: SearchLimits) -> SearchControl {
        SearchControl::new(Arc::new(AtomicBool::new(false)), limits)
    }

    #[test]
    fn infinite_never_trips() {
        let c = control(SearchLimits::infinite());
        c.add_nodes(1 << 40);
        assert!(!c.should_abort());
        assert!(!c.is_soft_timeout(100, c.nodes()));
        assert_eq!(c.hard_remaining(), None);
    }

    #[test]
    fn external_flag_aborts() {
        let flag = Arc::new(AtomicBool::new(false));
        let c = SearchControl::infinite(Arc::clone(&flag));
        flag.store(true, Ordering::Relaxed);
        assert!(c.is_stopped());
        assert!(c.should_abort());
    }

    #[test]
    fn node_budget_raises_the_flag() {
        let c = control(SearchLimits::nodes(5000));
        c.add_nodes(4096);
        assert!(!c.should_abort());
        assert!(!c.is_soft_timeout(3, c.nodes()));
        c.add_nodes(1024);
        assert!(c.should_abort());
        assert!(c.is_stopped());
    }

    #[test]
    fn depth_limit_is_soft_only() {
        let c = control(SearchLimits::depth(4));
        assert!(!c.is_soft_timeout(3, 0));
        assert!(c.is_soft_timeout(4, 0));
        assert!(!c.should_abort());
    }

    #[test]
    fn zero_movetime_expires_immediately() {
        let c = control(SearchLimits::movetime(Duration::ZERO));
        assert!(c.should_abort());
        assert!(c.is_soft_timeout(1, 0));
        assert_eq!(c.hard_remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn generous_movetime_leaves_room() {
        let c = control(SearchLimits::movetime(Duration::from_secs(60)));
        assert!(!c.should_abort());
        assert!(c.hard_remaining().is_some_and(|left| left > Duration::from_secs(50)));
    }
}
