//! CPU-based worker for vanity address generation.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, warn};

use crate::crypto::{AddressDeriver, EntropySource, Identity, KeyPairGenerator, KeygenError, OsEntropy};
use crate::matcher::Pattern;

use super::handoff::ResultSlot;
use super::VanityResult;

/// Consecutive entropy failures after which a worker gives up.
pub const MAX_CONSECUTIVE_RNG_FAILURES: u32 = 8;

/// Shared search statistics.
#[derive(Debug, Default)]
pub struct SearchStats {
    /// Completed generate/derive/match iterations
    attempts: AtomicU64,
    /// Matches found, including ones dropped by the hand-off
    matches_found: AtomicU64,
    /// Workers that have not yet exited
    active_workers: AtomicUsize,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total attempts across all workers.
    pub fn total_attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Returns the total matches found.
    pub fn total_matches(&self) -> u64 {
        self.matches_found.load(Ordering::Relaxed)
    }

    /// Returns the number of workers still running.
    pub fn active_workers(&self) -> usize {
        self.active_workers.load(Ordering::Acquire)
    }
}

/// What a worker hands to the pool when it stops on its own.
#[derive(Debug)]
pub(crate) enum WorkerOutcome {
    Found(VanityResult),
    Failed { worker_id: usize, error: KeygenError },
}

/// A CPU worker that generates and tests identities.
pub(crate) struct CpuWorker<E = OsEntropy> {
    id: usize,
    pattern: Arc<Pattern>,
    deriver: Arc<AddressDeriver>,
    generator: KeyPairGenerator<E>,
    slot: ResultSlot<WorkerOutcome>,
    stop_flag: Arc<AtomicBool>,
    stats: Arc<SearchStats>,
}

impl<E: EntropySource> CpuWorker<E> {
    /// Creates a new CPU worker and registers it as active.
    pub(crate) fn new(
        id: usize,
        pattern: Arc<Pattern>,
        deriver: Arc<AddressDeriver>,
        entropy: E,
        slot: ResultSlot<WorkerOutcome>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<SearchStats>,
    ) -> Self {
        stats.active_workers.fetch_add(1, Ordering::AcqRel);

        Self {
            id,
            pattern,
            deriver,
            generator: KeyPairGenerator::with_entropy(entropy),
            slot,
            stop_flag,
            stats,
        }
    }

    /// Runs the worker loop.
    ///
    /// Generates identities and tests them against the pattern until:
    /// - The stop flag is observed at the top of an iteration
    /// - A match is found (offered to the hand-off, then the stop flag is raised)
    /// - The entropy source keeps failing
    pub(crate) fn run(mut self) {
        debug!("worker {} started", self.id);
        let mut consecutive_failures = 0u32;

        loop {
            if self.stop_flag.load(Ordering::Acquire) {
                break;
            }

            let (exchange, signing) = match self.generator.generate() {
                Ok(keys) => {
                    consecutive_failures = 0;
                    keys
                }
                Err(error) => {
                    consecutive_failures += 1;
                    warn!(
                        "worker {}: {} (failure {}/{})",
                        self.id, error, consecutive_failures, MAX_CONSECUTIVE_RNG_FAILURES
                    );
                    if consecutive_failures >= MAX_CONSECUTIVE_RNG_FAILURES {
                        self.slot.try_publish(WorkerOutcome::Failed {
                            worker_id: self.id,
                            error,
                        });
                        break;
                    }
                    continue;
                }
            };

            let identity = Identity::from_keys(&exchange, &signing, &self.deriver);
            self.stats.attempts.fetch_add(1, Ordering::Relaxed);

            if self.pattern.matches(identity.address()) {
                self.stats.matches_found.fetch_add(1, Ordering::Relaxed);

                let accepted = self.slot.try_publish(WorkerOutcome::Found(VanityResult {
                    identity,
                    worker_id: self.id,
                }));
                if !accepted {
                    debug!("worker {}: late match dropped", self.id);
                }

                self.stop_flag.store(true, Ordering::Release);
                break;
            }
        }

        debug!("worker {} exiting", self.id);
    }
}

impl<E> Drop for CpuWorker<E> {
    fn drop(&mut self) {
        self.stats.active_workers.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::handoff::result_slot;

    struct BrokenEntropy;

    impl EntropySource for BrokenEntropy {
        fn fill(&mut self, _dest: &mut [u8]) -> Result<(), KeygenError> {
            Err(KeygenError::RandomnessUnavailable("unavailable".into()))
        }
    }

    /// Replays fixed draws in order; `None` is a failed draw.
    struct ScriptedEntropy {
        draws: Vec<Option<[u8; 64]>>,
        next: usize,
    }

    impl EntropySource for ScriptedEntropy {
        fn fill(&mut self, dest: &mut [u8]) -> Result<(), KeygenError> {
            let draw = self.draws.get(self.next).copied().flatten();
            self.next += 1;
            match draw {
                Some(bytes) => {
                    dest.copy_from_slice(&bytes);
                    Ok(())
                }
                None => Err(KeygenError::RandomnessUnavailable("scripted failure".into())),
            }
        }
    }

    fn spawn_parts() -> (Arc<AtomicBool>, Arc<SearchStats>) {
        (Arc::new(AtomicBool::new(false)), Arc::new(SearchStats::new()))
    }

    #[test]
    fn test_worker_finds_match() {
        let (stop_flag, stats) = spawn_parts();
        let (slot, rx) = result_slot();
        let pattern = Arc::new(Pattern::parse("f", "").unwrap());

        let worker = CpuWorker::new(
            3,
            pattern,
            Arc::new(AddressDeriver::lxmf()),
            OsEntropy,
            slot,
            stop_flag.clone(),
            stats.clone(),
        );
        assert_eq!(stats.active_workers(), 1);
        worker.run();

        assert!(stop_flag.load(Ordering::Acquire));
        assert_eq!(stats.active_workers(), 0);
        assert!(stats.total_attempts() >= 1);
        assert_eq!(stats.total_matches(), 1);

        match rx.try_recv().unwrap() {
            WorkerOutcome::Found(result) => {
                assert_eq!(result.worker_id, 3);
                assert!(result.identity.address().to_hex().starts_with('f'));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_worker_honors_stop_flag() {
        let (stop_flag, stats) = spawn_parts();
        stop_flag.store(true, Ordering::Release);
        let (slot, rx) = result_slot();

        CpuWorker::new(
            0,
            Arc::new(Pattern::parse("0", "").unwrap()),
            Arc::new(AddressDeriver::lxmf()),
            OsEntropy,
            slot,
            stop_flag,
            stats.clone(),
        )
        .run();

        assert_eq!(stats.total_attempts(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_worker_gives_up_on_entropy_failure() {
        let (stop_flag, stats) = spawn_parts();
        let (slot, rx) = result_slot();

        CpuWorker::new(
            1,
            Arc::new(Pattern::parse("0", "").unwrap()),
            Arc::new(AddressDeriver::lxmf()),
            BrokenEntropy,
            slot,
            stop_flag,
            stats.clone(),
        )
        .run();

        assert_eq!(stats.total_attempts(), 0);
        assert!(matches!(
            rx.try_recv().unwrap(),
            WorkerOutcome::Failed { worker_id: 1, .. }
        ));
    }

    #[test]
    fn test_each_completed_iteration_counted_once() {
        let (stop_flag, stats) = spawn_parts();
        let (slot, rx) = result_slot();
        let deriver = AddressDeriver::lxmf();

        let target = [0x5au8; 64];
        let expected = Identity::from_private_bytes(&target, &deriver);
        // The full 32-nibble address only matches the last draw.
        let pattern = Pattern::parse(&expected.address().to_hex(), "").unwrap();

        let entropy = ScriptedEntropy {
            draws: vec![Some([0x01; 64]), Some([0x02; 64]), None, Some([0x03; 64]), Some(target)],
            next: 0,
        };

        CpuWorker::new(
            0,
            Arc::new(pattern),
            Arc::new(deriver),
            entropy,
            slot,
            stop_flag,
            stats.clone(),
        )
        .run();

        // Five draws, one failed: exactly four completed iterations.
        assert_eq!(stats.total_attempts(), 4);
        assert_eq!(stats.total_matches(), 1);

        match rx.try_recv().unwrap() {
            WorkerOutcome::Found(result) => assert_eq!(result.identity.address(), expected.address()),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
