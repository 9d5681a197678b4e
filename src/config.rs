//! Validated run configuration built from parsed command-line arguments.
//!
//! Clap handles syntax. Everything checked here is a problem the user can
//! fix before any work starts, and is reported as
//! [`CookiecutterError::InvalidConfig`].

use std::{fs, path::PathBuf};

use crate::{
    batch::{BatchPlan, Dust, ReadFilters, ReadLayout},
    cli::{BatchArgs, MakeLibraryArgs},
    error::CookiecutterError,
    input::Input,
    kmer::KmerLength,
    library::LibraryBuilder,
    queue::{JobQueue, QueueOrder},
};

/// Settings for `make-library`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    pub inputs: Vec<Input>,
    pub output: PathBuf,
    pub k: KmerLength,
    pub sorted: bool,
}

impl LibraryConfig {
    pub fn builder(&self) -> LibraryBuilder {
        LibraryBuilder::new()
            .k_validated(self.k)
            .inputs(self.inputs.iter().cloned())
            .sorted(self.sorted)
    }
}

impl TryFrom<&MakeLibraryArgs> for LibraryConfig {
    type Error = CookiecutterError;

    fn try_from(args: &MakeLibraryArgs) -> Result<Self, Self::Error> {
        let k = KmerLength::new(args.k)?;

        let inputs: Vec<Input> = args.input.iter().map(|p| Input::from_path(p)).collect();
        if inputs.iter().filter(|input| input.is_stdin()).count() > 1 {
            return Err(CookiecutterError::config("standard input can only be read once"));
        }
        for path in inputs.iter().filter_map(Input::as_path) {
            if let Err(e) = fs::metadata(path) {
                return Err(CookiecutterError::config(format!(
                    "issue with FASTA path '{}': {e}",
                    path.display()
                )));
            }
        }

        Ok(Self {
            inputs,
            output: args.output.clone(),
            k,
            sorted: args.sort,
        })
    }
}

/// Settings for `batch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub plan: BatchPlan,
    pub concurrency: usize,
    pub order: QueueOrder,
    pub report: Option<PathBuf>,
    pub dry_run: bool,
}

impl BatchConfig {
    pub fn queue(&self) -> JobQueue {
        self.plan.into_queue(self.order)
    }
}

impl TryFrom<BatchArgs> for BatchConfig {
    type Error = CookiecutterError;

    fn try_from(args: BatchArgs) -> Result<Self, Self::Error> {
        if args.cpus == 0 {
            return Err(crate::error::ConcurrencyError.into());
        }

        let layout = if args.input.is_empty() {
            ReadLayout::paired(args.fastq1, args.fastq2)?
        } else {
            ReadLayout::single(args.input)?
        };

        if !args.dry_run {
            if let Err(e) = fs::metadata(&args.fragments) {
                return Err(CookiecutterError::config(format!(
                    "issue with k-mer library '{}': {e}",
                    args.fragments.display()
                )));
            }
        }

        let dust = match (args.dust_cutoff, args.dust_k) {
            (Some(cutoff), Some(k)) => Some(Dust { cutoff, k }),
            (None, None) => None,
            _ => {
                return Err(CookiecutterError::config(
                    "--dustcutoff and --dustk must be given together",
                ))
            }
        };

        let filters = ReadFilters {
            poly_g: args.poly_g,
            min_length: args.length,
            mean_quality: args.mq,
            dust,
        };

        let mut plan = BatchPlan::new(args.tool, layout, args.out, args.fragments)?.filters(filters);
        if let Some(dir) = args.tool_dir {
            plan = plan.tool_dir(dir)?;
        }

        Ok(Self {
            plan,
            concurrency: args.cpus,
            order: args.order,
            report: args.report,
            dry_run: args.dry_run,
        })
    }
}
