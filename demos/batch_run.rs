//! Run a filtering tool over several FASTQ files with a concurrency limit.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example batch_run -- fragments.tsv out/ a.fq b.fq c.fq
//! ```
//!
//! Prints the commands instead of running them when `DRY_RUN` is set.

use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use cookiecutter::batch::{BatchPlan, ReadLayout, Tool};
use cookiecutter::queue::QueueOrder;
use cookiecutter::reporter::ConsoleReporter;
use cookiecutter::scheduler::{Scheduler, DEFAULT_CONCURRENCY};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        eprintln!("Usage: {} <library> <out_dir> <fastq>...", args[0]);
        process::exit(1);
    }

    let files: Vec<PathBuf> = args[3..].iter().map(PathBuf::from).collect();
    let plan = ReadLayout::single(files)
        .and_then(|layout| BatchPlan::new(Tool::Remove, layout, &args[2], &args[1]));
    let plan = match plan {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    if env::var_os("DRY_RUN").is_some() {
        for command in plan.commands() {
            println!("{command}");
        }
        return;
    }

    let scheduler = match Scheduler::new(DEFAULT_CONCURRENCY) {
        Ok(scheduler) => scheduler.with_reporter(Arc::new(ConsoleReporter)),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    match scheduler.run(plan.into_queue(QueueOrder::Fifo)) {
        Ok(report) => {
            println!("{report}");
            if !report.all_succeeded() {
                process::exit(3);
            }
        }
        Err(e) => {
            eprintln!("Batch aborted: {e}");
            process::exit(1);
        }
    }
}
