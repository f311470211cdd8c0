//! In-process multi-rank cluster: one thread per rank.
//!
//! Reductions go through a shared slot vector and a [`Barrier`]:
//! write own slot, wait, read every slot, wait. The second wait keeps a
//! fast rank from overwriting its slot before a slow rank has read it.

use std::sync::{Arc, Barrier, Mutex, PoisonError};
use std::thread;

use super::{Communicator, ReduceOp};
use crate::types::RankIndex;

struct Shared {
    slots: Mutex<Vec<f64>>,
    barrier: Barrier,
}

/// Communicator handle for one rank of a [`LocalCluster`].
#[derive(Clone)]
pub struct LocalCommunicator {
    rank: usize,
    size: usize,
    shared: Arc<Shared>,
}

impl Communicator for LocalCommunicator {
    fn rank(&self) -> RankIndex {
        RankIndex::new(self.rank)
    }

    fn size(&self) -> usize {
        self.size
    }

    fn all_reduce_f64(&self, value: f64, op: ReduceOp) -> f64 {
        {
            let mut slots = self
                .shared
                .slots
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            slots[self.rank] = value;
        }
        self.shared.barrier.wait();

        let result = {
            let slots = self
                .shared
                .slots
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            op.reduce(&slots)
        };
        self.shared.barrier.wait();
        result
    }

    fn barrier(&self) {
        self.shared.barrier.wait();
    }
}

/// Runs a closure on `size` ranks, each on its own scoped thread.
pub struct LocalCluster;

impl LocalCluster {
    /// Build the per-rank communicators without spawning anything.
    pub fn communicators(size: usize) -> Vec<LocalCommunicator> {
        assert!(size > 0, "Cluster needs at least one rank");
        let shared = Arc::new(Shared {
            slots: Mutex::new(vec![0.0; size]),
            barrier: Barrier::new(size),
        });
        (0..size)
            .map(|rank| LocalCommunicator {
                rank,
                size,
                shared: Arc::clone(&shared),
            })
            .collect()
    }

    /// Run `f` on every rank and return the results in rank order.
    ///
    /// Panics if any rank panics.
    pub fn run<F, R>(size: usize, f: F) -> Vec<R>
    where
        F: Fn(LocalCommunicator) -> R + Sync,
        R: Send,
    {
        let comms = Self::communicators(size);
        let f = &f;
        thread::scope(|scope| {
            let handles: Vec<_> = comms
                .into_iter()
                .map(|comm| scope.spawn(move || f(comm)))
                .collect();
            handles
                .into_iter()
                .map(|h| match h.join() {
                    Ok(r) => r,
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect()
        })
    }
}
