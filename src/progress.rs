//! Progress tracking for library builds.
//!
//! Records are processed in parallel, so the counters are atomics. A
//! [`Progress`] snapshot is handed to the [`Reporter`](crate::reporter::Reporter)
//! after each input source has been consumed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Progress snapshot during a library build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Number of FASTA records processed so far.
    pub records_processed: u64,
    /// Number of sequence symbols processed so far (before cleaning).
    pub bases_processed: u64,
    /// Number of k-mer windows counted so far.
    pub windows_counted: u64,
}

/// Thread-safe progress tracker using atomic counters.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    records: AtomicU64,
    bases: AtomicU64,
    windows: AtomicU64,
}

impl ProgressTracker {
    /// Create a new progress tracker with zero counts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: AtomicU64::new(0),
            bases: AtomicU64::new(0),
            windows: AtomicU64::new(0),
        }
    }

    /// Record that a sequence has been processed.
    pub fn record_sequence(&self, bases: u64, windows: u64) {
        self.records.fetch_add(1, Ordering::Relaxed);
        self.bases.fetch_add(bases, Ordering::Relaxed);
        self.windows.fetch_add(windows, Ordering::Relaxed);
    }

    /// Get a snapshot of the current progress.
    ///
    /// The returned values represent the state at a point in time and may
    /// change immediately after this call returns.
    pub fn snapshot(&self) -> Progress {
        Progress {
            records_processed: self.records.load(Ordering::Relaxed),
            bases_processed: self.bases.load(Ordering::Relaxed),
            windows_counted: self.windows.load(Ordering::Relaxed),
        }
    }
}
