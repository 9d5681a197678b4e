//! K-mer libraries and batch read filtering.
//!
//! `cookiecutter` does two things:
//!
//! - builds a k-mer library (`<kmer>\t<count>` rows) from FASTA sequences,
//!   counting every k-mer together with its reverse complement, and
//! - runs one of the external filtering tools (`remove`, `rm_reads`,
//!   `separate`, `extract`) over many FASTQ inputs with a bounded number of
//!   tools running at once.
//!
//! # Building a library
//!
//! ```rust,no_run
//! use cookiecutter::library::make_library;
//!
//! let summary = make_library(["adapters.fa"], "fragments.tsv", 23)?;
//! println!("{} k-mers", summary.rows);
//! # Ok::<(), cookiecutter::error::CookiecutterError>(())
//! ```
//!
//! # Running a batch
//!
//! ```rust,no_run
//! use cookiecutter::batch::{BatchPlan, ReadLayout, Tool};
//! use cookiecutter::queue::QueueOrder;
//! use cookiecutter::scheduler::Scheduler;
//!
//! let layout = ReadLayout::single(vec!["a.fq".into(), "b.fq".into()])?;
//! let plan = BatchPlan::new(Tool::Remove, layout, "filtered", "fragments.tsv")?;
//!
//! let report = Scheduler::new(2)?.run(plan.into_queue(QueueOrder::Fifo))?;
//! println!("{report}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Features
//!
//! - `tracing`: structured events and spans (on by default)
//! - `gzip`: read `.gz` FASTA inputs
//! - `async`: Tokio wrappers in [`async_api`]

#[cfg(feature = "async")]
pub mod async_api;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod fasta;
pub mod input;
pub mod job;
pub mod kmer;
pub mod library;
pub mod progress;
pub mod queue;
pub mod report;
pub mod reporter;
pub mod revcomp;
pub mod scheduler;
