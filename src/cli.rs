//! Command-line interface definition.

use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::{batch::Tool, queue::QueueOrder, scheduler::DEFAULT_CONCURRENCY};

/// K-mer based read filtering: build k-mer libraries and run the filtering
/// tools over many FASTQ inputs in parallel.
#[derive(Parser, Debug)]
#[command(name = "cookiecutter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Suppress informational output
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a library of k-mers from FASTA files
    MakeLibrary(MakeLibraryArgs),
    /// Run a filtering tool for many input files in parallel
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
pub struct MakeLibraryArgs {
    /// FASTA input ("-" for stdin); repeat to aggregate several files
    #[arg(short, long, required = true)]
    pub input: Vec<PathBuf>,

    /// K-mer library output
    #[arg(short, long)]
    pub output: PathBuf,

    /// Length of k-mers
    #[arg(short = 'k', long = "k", value_parser = parse_k)]
    pub k: usize,

    /// Sort rows by k-mer
    #[arg(long)]
    pub sort: bool,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("reads").required(true).args(["input", "fastq1"])))]
pub struct BatchArgs {
    /// Filtering tool to run
    #[arg(short = 'c', long = "command", value_enum)]
    pub tool: Tool,

    /// Comma-separated list of single-end read FASTQ files
    #[arg(short, long, value_delimiter = ',')]
    pub input: Vec<PathBuf>,

    /// Comma-separated list of left FASTQ files
    #[arg(short = '1', long, value_delimiter = ',', requires = "fastq2")]
    pub fastq1: Vec<PathBuf>,

    /// Comma-separated list of right FASTQ files
    #[arg(short = '2', long, value_delimiter = ',', requires = "fastq1")]
    pub fastq2: Vec<PathBuf>,

    /// Output folder
    #[arg(short, long)]
    pub out: PathBuf,

    /// K-mer library
    #[arg(short, long)]
    pub fragments: PathBuf,

    /// Maximum number of tools running at once
    #[arg(short = 'P', long, default_value_t = DEFAULT_CONCURRENCY, value_parser = parse_concurrency)]
    pub cpus: usize,

    /// Order in which queued inputs are launched
    #[arg(long, value_enum, default_value_t = QueueOrder::Fifo)]
    pub order: QueueOrder,

    /// Length of polyG/polyC track to filter out (rm_reads)
    #[arg(short = 'g', long = "polyG", default_value_t = 23)]
    pub poly_g: u32,

    /// Minimal read length (rm_reads)
    #[arg(short, long, default_value_t = 50)]
    pub length: u32,

    /// Mean read quality (rm_reads)
    #[arg(short = 'q', long, default_value_t = 20)]
    pub mq: u32,

    /// Cutoff for the DUST algorithm (rm_reads)
    #[arg(short = 'd', long = "dustcutoff", requires = "dust_k")]
    pub dust_cutoff: Option<u32>,

    /// K for the DUST algorithm (rm_reads)
    #[arg(short = 'k', long = "dustk", requires = "dust_cutoff")]
    pub dust_k: Option<u32>,

    /// Directory containing the tool executables (default: search PATH)
    #[arg(long)]
    pub tool_dir: Option<PathBuf>,

    /// Write a JSON report of every job outcome
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Print the commands without running them
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_k(s: &str) -> Result<usize, String> {
    let k: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if k == 0 {
        return Err("k-mer length must be at least 1".to_string());
    }
    Ok(k)
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if n == 0 {
        return Err("at least one job must be allowed to run".to_string());
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn make_library_args() {
        let cli = Cli::try_parse_from([
            "cookiecutter", "make-library", "-i", "a.fa", "--input", "b.fa", "-o", "lib.tsv",
            "--k", "23",
        ])
        .unwrap();
        let Command::MakeLibrary(args) = cli.command else {
            panic!("expected make-library");
        };
        assert_eq!(args.input, vec![PathBuf::from("a.fa"), PathBuf::from("b.fa")]);
        assert_eq!(args.k, 23);
        assert!(!args.sort);
    }

    #[test]
    fn k_zero_is_rejected() {
        let result = Cli::try_parse_from([
            "cookiecutter", "make-library", "-i", "a.fa", "-o", "lib.tsv", "-k", "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn batch_paired_lists() {
        let cli = Cli::try_parse_from([
            "cookiecutter", "batch", "-c", "rm_reads", "-1", "a_1.fq,b_1.fq", "-2", "a_2.fq,b_2.fq",
            "-o", "out", "-f", "lib.tsv", "-P", "2", "--order", "lifo",
        ])
        .unwrap();
        let Command::Batch(args) = cli.command else {
            panic!("expected batch");
        };
        assert_eq!(args.tool, Tool::RmReads);
        assert_eq!(args.fastq1.len(), 2);
        assert_eq!(args.fastq2.len(), 2);
        assert_eq!(args.cpus, 2);
        assert_eq!(args.order, QueueOrder::Lifo);
        assert_eq!(args.poly_g, 23);
    }

    #[test]
    fn batch_defaults() {
        let cli = Cli::try_parse_from([
            "cookiecutter", "batch", "-c", "remove", "-i", "a.fq", "-o", "out", "-f", "lib.tsv",
        ])
        .unwrap();
        let Command::Batch(args) = cli.command else {
            panic!("expected batch");
        };
        assert_eq!(args.cpus, DEFAULT_CONCURRENCY);
        assert_eq!(args.order, QueueOrder::Fifo);
        assert!(args.dust_cutoff.is_none());
    }

    #[test]
    fn batch_requires_reads() {
        let result = Cli::try_parse_from([
            "cookiecutter", "batch", "-c", "remove", "-o", "out", "-f", "lib.tsv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn batch_rejects_unknown_tool_and_zero_cpus() {
        assert!(Cli::try_parse_from([
            "cookiecutter", "batch", "-c", "dust", "-i", "a.fq", "-o", "out", "-f", "lib.tsv",
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "cookiecutter", "batch", "-c", "remove", "-i", "a.fq", "-o", "out", "-f", "lib.tsv",
            "-P", "0",
        ])
        .is_err());
    }

    #[test]
    fn dust_parameters_come_together() {
        assert!(Cli::try_parse_from([
            "cookiecutter", "batch", "-c", "rm_reads", "-i", "a.fq", "-o", "out", "-f", "lib.tsv",
            "-d", "2",
        ])
        .is_err());
    }
}
