//! Summary of a scheduler run.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::Serialize;

use crate::{
    error::CookiecutterError,
    job::{JobOutcome, JobState},
    queue::QueueOrder,
};

/// Outcome of every job launched by one [`Scheduler::run`](crate::scheduler::Scheduler::run).
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub concurrency: usize,
    pub order: QueueOrder,
    pub launched: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Highest number of jobs that were running at the same time.
    pub peak_in_flight: usize,
    /// Terminal records in completion order.
    pub outcomes: Vec<JobOutcome>,
}

impl BatchReport {
    pub(crate) const fn new(concurrency: usize, order: QueueOrder) -> Self {
        Self {
            concurrency,
            order,
            launched: 0,
            succeeded: 0,
            failed: 0,
            peak_in_flight: 0,
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, outcome: JobOutcome) {
        match outcome.state {
            JobState::Succeeded => self.succeeded += 1,
            _ => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// Jobs that reached a terminal state.
    pub const fn finished(&self) -> usize {
        self.succeeded + self.failed
    }

    pub const fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.succeeded())
    }

    /// Writes the report as pretty-printed JSON.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), CookiecutterError> {
        let path = path.as_ref();
        let report_error = |source| CookiecutterError::ReportWrite {
            source,
            path: path.to_path_buf(),
        };

        let mut buf = BufWriter::new(File::create(path).map_err(report_error)?);
        serde_json::to_writer_pretty(&mut buf, self)?;
        writeln!(buf).map_err(report_error)?;
        buf.flush().map_err(report_error)
    }
}

impl std::fmt::Display for BatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} launched, {} succeeded, {} failed (peak {} of {} concurrent)",
            self.launched, self.succeeded, self.failed, self.peak_in_flight, self.concurrency
        )
    }
}
