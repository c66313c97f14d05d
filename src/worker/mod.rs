//! Worker pool for parallel vanity address search.
//!
//! This module provides:
//! - Multi-threaded CPU workers sharing an attempt counter and stop flag
//! - A single-slot hand-off that accepts only the first result
//! - Progress sampling for display

mod cpu;
mod handoff;
mod pool;
mod progress;

pub use cpu::{SearchStats, MAX_CONSECUTIVE_RNG_FAILURES};
pub use handoff::{result_slot, ResultSlot};
pub use pool::{SearchError, VanityResult, WorkerPool};
pub use progress::{format_number, ProgressReporter, ProgressSample};
