//! Async wrappers using Tokio.
//!
//! Library builds and batch runs block: one on rayon, the other on child
//! processes. These functions move that work onto Tokio's blocking thread
//! pool so other tasks keep making progress.
//!
//! # Feature Flag
//!
//! This module requires the `async` feature to be enabled:
//!
//! ```toml
//! [dependencies]
//! cookiecutter = { version = "0.1", features = ["async"] }
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use cookiecutter::async_api::run_batch_async;
//! use cookiecutter::queue::{JobQueue, QueueOrder};
//! use cookiecutter::scheduler::Scheduler;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let queue = JobQueue::from_commands(["true", "false"], QueueOrder::Fifo);
//!     let report = run_batch_async(Scheduler::new(2)?, queue).await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

use std::{path::PathBuf, sync::Arc};

use tokio::task;

use crate::{
    library::{LibraryBuilder, LibrarySummary},
    queue::JobQueue,
    report::BatchReport,
    reporter::Reporter,
    scheduler::Scheduler,
};

/// Async version of [`LibraryBuilder::write`].
///
/// # Errors
///
/// Returns the builder's error, or a join error if the blocking task panicked.
pub async fn build_library_async<P>(
    builder: LibraryBuilder,
    output: P,
    reporter: Arc<dyn Reporter>,
) -> Result<LibrarySummary, Box<dyn std::error::Error + Send + Sync>>
where
    P: Into<PathBuf>,
{
    let output = output.into();
    let summary = task::spawn_blocking(move || builder.write(output, reporter.as_ref())).await??;
    Ok(summary)
}

/// Async version of [`Scheduler::run`].
///
/// # Errors
///
/// Returns the scheduler's error, or a join error if the blocking task panicked.
pub async fn run_batch_async(
    scheduler: Scheduler,
    queue: JobQueue,
) -> Result<BatchReport, Box<dyn std::error::Error + Send + Sync>> {
    let report = task::spawn_blocking(move || scheduler.run(queue)).await??;
    Ok(report)
}
