//! Worker pool management.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;
use log::{debug, info, warn};

use crate::crypto::{AddressDeriver, EntropySource, Identity, KeygenError, OsEntropy};
use crate::matcher::Pattern;

use super::cpu::{CpuWorker, SearchStats, WorkerOutcome};
use super::handoff::result_slot;

/// Result of a successful vanity address search.
#[derive(Debug, Clone)]
pub struct VanityResult {
    /// The matching identity
    pub identity: Identity,
    /// The ID of the worker that found this result
    pub worker_id: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("workers must be at least 1")]
    NoWorkers,
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("worker {worker_id} aborted the search: {source}")]
    Randomness {
        worker_id: usize,
        #[source]
        source: KeygenError,
    },
    #[error("search cancelled before a match was found")]
    Cancelled,
    #[error("all workers exited without a result")]
    WorkersExited,
}

/// Runs a fixed set of workers until the first match.
///
/// Workers share an attempt counter and a stop flag. The first match is
/// handed to the pool through a single-slot channel; [`WorkerPool::wait`]
/// then stops and joins every worker before returning it.
pub struct WorkerPool {
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Receiving side of the result hand-off
    result_rx: Receiver<WorkerOutcome>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Shared statistics
    stats: Arc<SearchStats>,
}

impl WorkerPool {
    /// Creates a pool of workers backed by the OS CSPRNG.
    pub fn new(
        num_workers: usize,
        pattern: Pattern,
        deriver: AddressDeriver,
    ) -> Result<Self, SearchError> {
        Self::with_entropy(num_workers, pattern, deriver, |_| OsEntropy)
    }

    /// Creates a pool whose workers draw key material from `make_entropy(worker_id)`.
    pub fn with_entropy<E, F>(
        num_workers: usize,
        pattern: Pattern,
        deriver: AddressDeriver,
        make_entropy: F,
    ) -> Result<Self, SearchError>
    where
        E: EntropySource + Send + 'static,
        F: Fn(usize) -> E,
    {
        if num_workers == 0 {
            return Err(SearchError::NoWorkers);
        }

        let pattern = Arc::new(pattern);
        let deriver = Arc::new(deriver);
        let (slot, result_rx) = result_slot();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(SearchStats::new());

        let mut handles = Vec::with_capacity(num_workers);
        for id in 0..num_workers {
            let worker = CpuWorker::new(
                id,
                pattern.clone(),
                deriver.clone(),
                make_entropy(id),
                slot.clone(),
                stop_flag.clone(),
                stats.clone(),
            );

            let spawned = thread::Builder::new()
                .name(format!("vanity-worker-{}", id))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    stop_flag.store(true, Ordering::Release);
                    for handle in handles {
                        if handle.join().is_err() {
                            warn!("a worker thread panicked");
                        }
                    }
                    return Err(SearchError::Spawn(e));
                }
            }
        }
        debug!("spawned {} workers for pattern {}", num_workers, pattern);

        Ok(Self {
            handles: Some(handles),
            result_rx,
            stop_flag,
            stats,
        })
    }

    /// Blocks until the first outcome, then stops and joins every worker.
    ///
    /// Returns the winning result, the first entropy failure, or
    /// [`SearchError::Cancelled`] when the stop flag was raised externally.
    pub fn wait(mut self) -> Result<VanityResult, SearchError> {
        let outcome = self.result_rx.recv();
        let stopped_externally = self.is_stopped();
        self.join_workers();

        match outcome {
            Ok(WorkerOutcome::Found(result)) => {
                info!(
                    "worker {} found {} after {} attempts",
                    result.worker_id,
                    result.identity.address(),
                    self.total_attempts()
                );
                Ok(result)
            }
            Ok(WorkerOutcome::Failed { worker_id, error }) => Err(SearchError::Randomness {
                worker_id,
                source: error,
            }),
            // Every worker dropped its slot without publishing.
            Err(_) if stopped_externally => Err(SearchError::Cancelled),
            Err(_) => Err(SearchError::WorkersExited),
        }
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Release);
    }

    fn join_workers(&mut self) {
        self.stop();
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                if handle.join().is_err() {
                    warn!("a worker thread panicked");
                }
            }
        }
    }

    /// Returns the total attempts across all workers.
    pub fn total_attempts(&self) -> u64 {
        self.stats.total_attempts()
    }

    /// Returns a handle to the shared statistics (e.g., for progress display).
    pub fn stats(&self) -> Arc<SearchStats> {
        self.stats.clone()
    }

    /// Returns a clone of the stop flag for external use (e.g., signal handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Acquire)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.join_workers();
    }
}
