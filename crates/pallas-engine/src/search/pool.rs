//! Lazy SMP orchestration.
//!
//! Every worker runs its own iterative deepening over a private copy of the
//! root moves and reports each completed depth through one channel. The
//! orchestrator keeps the deepest result, forwards it to the progress
//! callback and decides when to stop. Workers are scoped threads, so the
//! shared tables are borrowed rather than reference counted.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use pallas_core::{Board, EvaledMove};
use tracing::{debug, trace, warn};

use crate::search::breadcrumbs::Breadcrumbs;
use crate::search::control::{Aborted, SearchControl};
use crate::search::negamax::SearchContext;
use crate::search::root::{Iteration, iterative_deepening};
use crate::search::tt::TranspositionTable;
use crate::search::{MAX_HEIGHT, SearchInfo, VALUE_WIN, depth_to_mate};

/// Stack for each worker thread. The recursion keeps a move picker per ply.
const WORKER_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Borrowed state for one parallel search.
pub struct Orchestrator<'a> {
    pub threads: usize,
    pub tt: &'a TranspositionTable,
    pub crumbs: &'a Breadcrumbs,
    pub played: &'a HashMap<u64, u32>,
    pub control: &'a SearchControl,
}

impl Orchestrator<'_> {
    /// Search `root` with `threads` workers until a stop condition holds.
    /// Returns the deepest accepted iteration, or `None` if the hard limit
    /// fired before any worker completed a depth.
    pub fn run<F>(&self, root: &Board, root_moves: &[EvaledMove], mut on_info: F) -> Option<Iteration>
    where
        F: FnMut(&SearchInfo<'_>),
    {
        let (tx, rx) = mpsc::channel();
        thread::scope(|s| {
            for id in 0..self.threads.max(1) {
                let results = tx.clone();
                let mut moves = root_moves.to_vec();
                let spawned = thread::Builder::new()
                    .name(format!("pallas-worker-{id}"))
                    .stack_size(WORKER_STACK_SIZE)
                    .spawn_scoped(s, move || self.worker(id, root, &mut moves, &results));
                if let Err(err) = spawned {
                    warn!(worker = id, %err, "failed to spawn search worker");
                }
            }
            drop(tx);

            let best = self.collect(&rx, &mut on_info);
            self.control.stop();
            best
        })
    }

    fn worker(&self, id: usize, root: &Board, moves: &mut [EvaledMove], results: &Sender<Iteration>) {
        let mut ctx = SearchContext::new(id, root, self.tt, self.crumbs, self.played, self.control);
        if let Err(Aborted) = iterative_deepening(&mut ctx, moves, results) {
            trace!(worker = id, "worker aborted");
        }
        ctx.flush_nodes();
        if ctx.crumb_hits > 0 {
            debug!(worker = id, hits = ctx.crumb_hits, "deep nodes already searched elsewhere");
        }
    }

    /// Block on the channel until a stop condition holds, every worker has
    /// hung up, or the hard deadline passes.
    fn collect<F>(&self, rx: &Receiver<Iteration>, on_info: &mut F) -> Option<Iteration>
    where
        F: FnMut(&SearchInfo<'_>),
    {
        let mut best: Option<Iteration> = None;
        loop {
            let received = match self.control.hard_remaining() {
                Some(left) => rx.recv_timeout(left).ok(),
                None => rx.recv().ok(),
            };
            let Some(iteration) = received else {
                break;
            };

            if best.as_ref().is_some_and(|b| iteration.depth <= b.depth) {
                continue;
            }
            if iteration.mv.is_none() {
                break;
            }

            let nodes = self.control.nodes();
            on_info(&SearchInfo {
                score: iteration.value,
                depth: iteration.depth,
                nodes,
                pv: &iteration.pv,
            });
            debug!(
                depth = iteration.depth,
                score = iteration.value,
                nodes,
                best = %iteration.mv,
                "depth completed"
            );

            let depth = iteration.depth;
            let mate_found = iteration.value >= VALUE_WIN && depth_to_mate(iteration.value) <= depth;
            best = Some(iteration);

            if mate_found || depth >= MAX_HEIGHT as i32 - 1 || self.control.is_soft_timeout(depth, nodes) {
                break;
            }
        }
        best
    }
}
