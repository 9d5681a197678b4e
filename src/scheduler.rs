//! Bounded-concurrency launcher for external commands.
//!
//! One control thread takes jobs off a [`JobQueue`], hands each command to
//! the platform shell, and never lets more than the configured number of
//! children run at once. Each child gets a small waiter thread that blocks
//! on its exit and sends the status back over a channel, so the control
//! thread sleeps in `recv` instead of polling.
//!
//! A job that exits non-zero is recorded as failed and the run carries on.
//! There are no retries, timeouts or cancellation: once launched, a child
//! runs to completion. [`Scheduler::run`] returns only after every launched
//! job has finished.
//!
//! # Example
//!
//! ```rust,no_run
//! use cookiecutter::queue::{JobQueue, QueueOrder};
//! use cookiecutter::scheduler::Scheduler;
//!
//! let queue = JobQueue::from_commands(["sleep 1", "false", "true"], QueueOrder::Fifo);
//! let report = Scheduler::new(2)?.run(queue)?;
//!
//! assert_eq!(report.succeeded + report.failed, 3);
//! assert!(report.peak_in_flight <= 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{
    collections::HashMap,
    io,
    num::NonZeroUsize,
    process::{Child, Command, ExitStatus, Stdio},
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    thread,
};

use crate::{
    error::{ConcurrencyError, CookiecutterError},
    job::{Job, JobId, JobState},
    queue::JobQueue,
    report::BatchReport,
    reporter::{NullReporter, Reporter},
};

#[cfg(feature = "tracing")]
use tracing::{debug, info, warn};

/// Concurrency limit used by the command line when none is given.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Exit status of one child, sent by its waiter thread.
struct Completion {
    id: JobId,
    status: io::Result<ExitStatus>,
}

/// Runs a queue of shell commands with at most `limit` in flight.
#[derive(Clone)]
pub struct Scheduler {
    limit: NonZeroUsize,
    reporter: Arc<dyn Reporter>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Creates a scheduler that runs at most `limit` jobs at a time.
    ///
    /// # Errors
    ///
    /// Returns [`ConcurrencyError`] if `limit` is zero.
    pub fn new(limit: usize) -> Result<Self, ConcurrencyError> {
        let limit = NonZeroUsize::new(limit).ok_or(ConcurrencyError)?;
        Ok(Self {
            limit,
            reporter: Arc::new(NullReporter),
        })
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub const fn limit(&self) -> usize {
        self.limit.get()
    }

    /// Launches every job in `queue` and waits for all of them.
    ///
    /// # Errors
    ///
    /// Returns [`CookiecutterError::Spawn`] as soon as a child cannot be
    /// started. Jobs already running at that point are left to finish on
    /// their own and are not part of any report.
    pub fn run(&self, mut queue: JobQueue) -> Result<BatchReport, CookiecutterError> {
        let limit = self.limit.get();
        let mut report = BatchReport::new(limit, queue.order());
        let mut in_flight: HashMap<JobId, Job> = HashMap::with_capacity(limit);
        let (tx, rx) = mpsc::channel();

        #[cfg(feature = "tracing")]
        info!(jobs = queue.len(), limit, order = %queue.order(), "Starting batch");

        while !queue.is_empty() {
            while in_flight.len() >= limit {
                self.reporter.waiting_for_capacity(in_flight.len(), queue.len());
                self.settle_next(&rx, &mut in_flight, &mut report, queue.len())?;
            }

            let Some(mut job) = queue.pop() else {
                break;
            };

            let child = spawn_shell(&job.command)?;
            watch(child, job.id, tx.clone())?;

            job.state = JobState::Running;
            report.launched += 1;

            #[cfg(feature = "tracing")]
            info!(job = %job.id, command = %job.command, remaining = queue.len(), "Launched job");

            self.reporter.job_launched(&job, queue.len());
            in_flight.insert(job.id, job);
            report.peak_in_flight = report.peak_in_flight.max(in_flight.len());
        }

        // Only waiter threads hold senders from here on, so a waiter that
        // dies without reporting shows up as a closed channel.
        drop(tx);

        while !in_flight.is_empty() {
            self.settle_next(&rx, &mut in_flight, &mut report, 0)?;
        }

        #[cfg(feature = "tracing")]
        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            peak = report.peak_in_flight,
            "Batch complete"
        );

        Ok(report)
    }

    /// Blocks until one in-flight job exits and records its outcome.
    fn settle_next(
        &self,
        rx: &Receiver<Completion>,
        in_flight: &mut HashMap<JobId, Job>,
        report: &mut BatchReport,
        remaining: usize,
    ) -> Result<(), CookiecutterError> {
        let lost = |in_flight: usize| CookiecutterError::CompletionLost { in_flight };

        let Completion { id, status } = rx.recv().map_err(|_| lost(in_flight.len()))?;
        let job = in_flight.remove(&id).ok_or_else(|| lost(in_flight.len()))?;

        let exit_code = match status {
            Ok(status) => status.code(),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                warn!(job = %id, error = %_e, "Could not collect exit status");
                None
            }
        };

        let outcome = job.finish(exit_code);

        #[cfg(feature = "tracing")]
        {
            if outcome.succeeded() {
                info!(job = %id, remaining, "Job succeeded");
            } else {
                warn!(job = %id, exit_code = ?exit_code, remaining, "Job failed");
            }
        }

        self.reporter.job_finished(&outcome, remaining);
        report.record(outcome);
        Ok(())
    }
}

/// Starts `command` through the platform shell without waiting for it.
fn spawn_shell(command: &str) -> Result<Child, CookiecutterError> {
    shell(command)
        .stdin(Stdio::null())
        .spawn()
        .map_err(|source| CookiecutterError::Spawn {
            source,
            command: command.to_string(),
        })
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

/// Hands `child` to a waiter thread that reports its exit on `tx`.
fn watch(mut child: Child, id: JobId, tx: Sender<Completion>) -> Result<(), CookiecutterError> {
    let pid = child.id();
    thread::Builder::new()
        .name(format!("job-{}", id.0))
        .spawn(move || {
            let status = child.wait();
            // The scheduler may have returned early on a spawn error.
            let _ = tx.send(Completion { id, status });
        })
        .map(|_| ())
        .map_err(|source| CookiecutterError::Spawn {
            source,
            command: format!("waiter for job {id} (pid {pid})"),
        })?;

    #[cfg(feature = "tracing")]
    debug!(job = %id, pid, "Watching child");

    Ok(())
}
