use std::{process, sync::Arc};

use clap::Parser;
use colored::Colorize;
use cookiecutter::{
    cli::{BatchArgs, Cli, Command, MakeLibraryArgs},
    config::{BatchConfig, LibraryConfig},
    error::CookiecutterError,
    reporter::{ConsoleReporter, NullReporter, Reporter},
    scheduler::Scheduler,
};

/// Exit status when the batch ran but at least one job failed.
const EXIT_JOBS_FAILED: i32 = 3;

fn main() {
    let cli = Cli::parse();

    #[cfg(feature = "tracing")]
    init_tracing();

    let reporter: Arc<dyn Reporter> = if cli.quiet {
        Arc::new(NullReporter)
    } else {
        Arc::new(ConsoleReporter)
    };

    let result = match cli.command {
        Command::MakeLibrary(args) => make_library(&args, reporter.as_ref()),
        Command::Batch(args) => batch(args, reporter, cli.quiet),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) if e.is_config() => {
            eprintln!();
            eprintln!(
                "{}\n {}",
                "Problem parsing arguments:".blue().bold(),
                e.to_string().blue()
            );
            eprintln!();
            eprintln!(
                "{}\n {}",
                "Help menu:".blue().bold(),
                "$ cookiecutter --help".bold()
            );
            eprintln!();
            process::exit(1);
        }
        Err(e) => {
            eprintln!(
                "{}\n {}",
                "Application error:".blue().bold(),
                e.to_string().blue()
            );
            process::exit(1);
        }
    }
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn make_library(args: &MakeLibraryArgs, reporter: &dyn Reporter) -> Result<i32, CookiecutterError> {
    let config = LibraryConfig::try_from(args)?;
    config.builder().write(&config.output, reporter)?;
    Ok(0)
}

fn batch(args: BatchArgs, reporter: Arc<dyn Reporter>, quiet: bool) -> Result<i32, CookiecutterError> {
    let config = BatchConfig::try_from(args)?;

    if config.dry_run {
        for command in config.plan.commands() {
            println!("{command}");
        }
        return Ok(0);
    }

    let report = Scheduler::new(config.concurrency)?
        .with_reporter(reporter)
        .run(config.queue())?;

    if let Some(path) = &config.report {
        report.write_json(path)?;
    }

    if !quiet {
        eprintln!("{}: {}", "batch".bold(), report.to_string().blue().bold());
        for outcome in report.failures() {
            eprintln!("  {} {} {}", "failed".red().bold(), outcome.id, outcome.command);
        }
    }

    Ok(if report.all_succeeded() { 0 } else { EXIT_JOBS_FAILED })
}
