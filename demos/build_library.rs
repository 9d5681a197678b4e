//! Build a k-mer library with the builder API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example build_library -- adapters.fa fragments.tsv [k]
//! ```

use std::env;
use std::process;

use cookiecutter::library::LibraryBuilder;
use cookiecutter::reporter::ConsoleReporter;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <fasta_file> <output> [k]", args[0]);
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  fasta_file  Path to a FASTA file (\"-\" for stdin)");
        eprintln!("  output      Where to write the library");
        eprintln!("  k           K-mer length (default: 23)");
        process::exit(1);
    }

    let k: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(23);

    let builder = match LibraryBuilder::new().k(k) {
        Ok(builder) => builder.input(args[1].as_str()).sorted(true),
        Err(e) => {
            eprintln!("Invalid k-mer length: {e}");
            process::exit(1);
        }
    };

    match builder.write(&args[2], &ConsoleReporter) {
        Ok(summary) => {
            println!(
                "{} distinct k-mers from {} records ({} windows)",
                summary.rows, summary.progress.records_processed, summary.progress.windows_counted
            );
        }
        Err(e) => {
            eprintln!("Error building library: {e}");
            process::exit(1);
        }
    }
}
