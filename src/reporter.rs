//! User-visible progress reporting.
//!
//! The library builder and the scheduler do not print anything themselves.
//! They call into a [`Reporter`] that the caller passes in, so there is no
//! process-wide output state. [`ConsoleReporter`] is what the binary uses;
//! [`NullReporter`] discards everything.

use std::{io::Write, path::Path};

use colored::Colorize;

use crate::{
    input::Input,
    job::{Job, JobOutcome},
    progress::Progress,
};

/// Receives progress events. Every method has a no-op default.
pub trait Reporter: Send + Sync {
    /// A library build is about to read `inputs` sources.
    fn library_started(&self, _k: usize, _inputs: usize) {}

    /// One input source has been fully consumed.
    fn source_finished(&self, _input: &Input, _progress: &Progress) {}

    /// The library file is complete on disk.
    fn library_written(&self, _path: &Path, _rows: usize) {}

    /// A job was launched; `remaining` jobs are still queued.
    fn job_launched(&self, _job: &Job, _remaining: usize) {}

    /// The scheduler is at capacity and blocks until a job finishes.
    fn waiting_for_capacity(&self, _in_flight: usize, _remaining: usize) {}

    /// A job reached a terminal state; `remaining` jobs are still queued.
    fn job_finished(&self, _outcome: &JobOutcome, _remaining: usize) {}
}

/// Discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Writes coloured progress lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    fn line(args: std::fmt::Arguments<'_>) {
        let mut err = std::io::stderr().lock();
        // Progress output is best effort.
        let _ = writeln!(err, "{args}");
    }
}

impl Reporter for ConsoleReporter {
    fn library_started(&self, k: usize, inputs: usize) {
        Self::line(format_args!(
            "{}: {}  {}: {}",
            "k-length".bold(),
            k.to_string().blue().bold(),
            "inputs".bold(),
            inputs.to_string().blue().bold()
        ));
    }

    fn source_finished(&self, input: &Input, progress: &Progress) {
        Self::line(format_args!(
            "{} {} ({} records, {} bases, {} windows so far)",
            "read".bold(),
            input.to_string().underline().blue(),
            progress.records_processed,
            progress.bases_processed,
            progress.windows_counted
        ));
    }

    fn library_written(&self, path: &Path, rows: usize) {
        Self::line(format_args!(
            "{} {} ({} k-mers)",
            "wrote".bold(),
            path.display().to_string().underline().blue(),
            rows
        ));
    }

    fn job_launched(&self, job: &Job, remaining: usize) {
        Self::line(format_args!(
            "{} {} {} (remains {})",
            "launched".bold(),
            job.id.to_string().blue(),
            job.command,
            remaining
        ));
    }

    fn waiting_for_capacity(&self, in_flight: usize, remaining: usize) {
        Self::line(format_args!(
            "{}",
            format!("waiting on {in_flight} running job(s), {remaining} queued").dimmed()
        ));
    }

    fn job_finished(&self, outcome: &JobOutcome, remaining: usize) {
        let code = outcome
            .exit_code
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        if outcome.succeeded() {
            Self::line(format_args!(
                "{} {} returned {} (remains {})",
                "ok".green().bold(),
                outcome.id,
                code,
                remaining
            ));
        } else {
            Self::line(format_args!(
                "{} {} returned error {} (remains {}): {}",
                "failed".red().bold(),
                outcome.id,
                code,
                remaining,
                outcome.command
            ));
        }
    }
}
