//! Run a batch from inside a Tokio runtime.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example async_batch --features async -- "sleep 1" "false" "true"
//! ```

use std::env;
use std::sync::Arc;

use cookiecutter::async_api::run_batch_async;
use cookiecutter::queue::{JobQueue, QueueOrder};
use cookiecutter::reporter::ConsoleReporter;
use cookiecutter::scheduler::Scheduler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let commands: Vec<String> = env::args().skip(1).collect();
    let queue = JobQueue::from_commands(commands, QueueOrder::Fifo);

    let scheduler = Scheduler::new(2)?.with_reporter(Arc::new(ConsoleReporter));
    let report = run_batch_async(scheduler, queue).await?;

    println!("{report}");
    for failure in report.failures() {
        println!("  {} {}", failure.id, failure.command);
    }
    Ok(())
}
