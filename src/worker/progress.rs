//! Periodic progress sampling.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, select, tick, Sender};

use super::SearchStats;

/// One reading of the attempt counter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    /// Attempts since the previous sample
    pub rate: u64,
    /// Attempts per second since the reporter started
    pub average_rate: f64,
    /// Cumulative attempts
    pub total: u64,
    /// Time since the reporter started
    pub elapsed: Duration,
}

/// Background thread that reads [`SearchStats`] at a fixed interval.
///
/// The counter is only read, never written.
pub struct ProgressReporter {
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Starts sampling every `interval`, passing each sample to `sink`.
    pub fn spawn<F>(stats: Arc<SearchStats>, interval: Duration, mut sink: F) -> std::io::Result<Self>
    where
        F: FnMut(ProgressSample) + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let ticker = tick(interval);

        let handle = thread::Builder::new()
            .name("vanity-progress".into())
            .spawn(move || {
                let start = Instant::now();
                let mut last_total = 0u64;

                loop {
                    select! {
                        recv(ticker) -> _ => {
                            let total = stats.total_attempts();
                            let elapsed = start.elapsed();
                            let secs = elapsed.as_secs_f64();

                            sink(ProgressSample {
                                // The counter may move between reads; it never goes back.
                                rate: total.saturating_sub(last_total),
                                average_rate: if secs > 0.0 { total as f64 / secs } else { 0.0 },
                                total,
                                elapsed,
                            });
                            last_total = total;
                        }
                        recv(shutdown_rx) -> _ => break,
                    }
                }
            })?;

        Ok(Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Stops sampling and waits for the thread to exit.
    pub fn finish(mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        // Dropping the sender disconnects the channel and wakes the thread.
        self.shutdown.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

/// Formats a count with K/M/B suffixes.
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::AddressDeriver;
    use crate::matcher::Pattern;
    use crate::worker::WorkerPool;
    use std::sync::Mutex;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_500), "1.50K");
        assert_eq!(format_number(2_345_678), "2.35M");
        assert_eq!(format_number(3_000_000_000), "3.00B");
    }

    #[test]
    fn test_reporter_samples_running_search() {
        let pattern = Pattern::parse(&"0".repeat(32), "").unwrap();
        let pool = WorkerPool::new(2, pattern, AddressDeriver::lxmf()).unwrap();

        let samples = Arc::new(Mutex::new(Vec::new()));
        let sink_samples = samples.clone();
        let reporter = ProgressReporter::spawn(pool.stats(), Duration::from_millis(10), move |s| {
            sink_samples.lock().unwrap().push(s);
        })
        .unwrap();

        thread::sleep(Duration::from_millis(120));
        reporter.finish();
        pool.stop();
        let _ = pool.wait();

        let samples = samples.lock().unwrap();
        assert!(samples.len() >= 2);

        let mut previous = 0;
        let mut summed = 0;
        for sample in samples.iter() {
            assert!(sample.total >= previous);
            assert_eq!(sample.rate, sample.total - previous);
            summed += sample.rate;
            previous = sample.total;
        }
        assert_eq!(summed, previous);
    }

    #[test]
    fn test_finish_without_ticks() {
        let stats = Arc::new(SearchStats::new());
        let reporter = ProgressReporter::spawn(stats, Duration::from_secs(3600), |_| {
            panic!("no sample expected");
        })
        .unwrap();
        reporter.finish();
    }
}
