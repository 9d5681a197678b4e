//! Builder API for k-mer libraries.
//!
//! A library is the `<kmer>\t<count>` table the downstream filtering tools
//! load with `--fragments`. Counts from every input source are aggregated in
//! memory and written once at the end; the file only appears at its final
//! path when it is complete.
//!
//! # Example
//!
//! ```rust,no_run
//! use cookiecutter::library::LibraryBuilder;
//! use cookiecutter::reporter::NullReporter;
//!
//! let summary = LibraryBuilder::new()
//!     .k(23)?
//!     .input("adapters.fa")
//!     .input("rRNA.fa")
//!     .sorted(true)
//!     .write("fragments.tsv", &NullReporter)?;
//!
//! println!("{} distinct k-mers", summary.rows);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use rayon::prelude::{ParallelBridge, ParallelIterator};

use crate::{
    error::{CookiecutterError, KmerLengthError},
    fasta::FastaReader,
    input::Input,
    kmer::{write_tsv, KmerLength, KmerTable},
    progress::{Progress, ProgressTracker},
    reporter::{NullReporter, Reporter},
};

#[cfg(feature = "tracing")]
use tracing::{debug, info, info_span};

/// What a finished build produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibrarySummary {
    /// Distinct keys written, one row each.
    pub rows: usize,
    pub progress: Progress,
}

/// Configures and runs a library build.
#[derive(Debug, Clone, Default)]
pub struct LibraryBuilder {
    k: Option<KmerLength>,
    inputs: Vec<Input>,
    sorted: bool,
}

impl LibraryBuilder {
    /// Creates a builder with no inputs, no k, and unsorted output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the k-mer length.
    ///
    /// # Errors
    ///
    /// Returns [`KmerLengthError`] if `k` is zero.
    pub fn k(mut self, k: usize) -> Result<Self, KmerLengthError> {
        self.k = Some(KmerLength::new(k)?);
        Ok(self)
    }

    /// Sets the k-mer length from a pre-validated `KmerLength`.
    #[must_use]
    pub fn k_validated(mut self, k: KmerLength) -> Self {
        self.k = Some(k);
        self
    }

    /// Adds a FASTA source. `-` means standard input.
    #[must_use]
    pub fn input(mut self, input: impl Into<Input>) -> Self {
        self.inputs.push(input.into());
        self
    }

    #[must_use]
    pub fn inputs<I, T>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Input>,
    {
        self.inputs.extend(inputs.into_iter().map(Into::into));
        self
    }

    /// Sort rows by k-mer before writing. Off by default, in which case row
    /// order is whatever the table iterates in.
    #[must_use]
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    fn validated(&self) -> Result<KmerLength, CookiecutterError> {
        let k = self
            .k
            .ok_or_else(|| CookiecutterError::config("k-mer length not set; call .k() first"))?;
        if self.inputs.is_empty() {
            return Err(CookiecutterError::config("at least one FASTA input is required"));
        }
        Ok(k)
    }

    /// Counts k-mers across all inputs without writing anything.
    pub fn count(&self, reporter: &dyn Reporter) -> Result<(KmerTable, Progress), CookiecutterError> {
        let k = self.validated()?;
        reporter.library_started(k.get(), self.inputs.len());

        #[cfg(feature = "tracing")]
        info!(k = k.get(), inputs = self.inputs.len(), "Starting library build");

        let table = KmerTable::new();
        let tracker = ProgressTracker::new();

        for input in &self.inputs {
            #[cfg(feature = "tracing")]
            let _span = info_span!("read_fasta", input = %input).entered();

            count_source(input, k, &table, &tracker)?;
            let progress = tracker.snapshot();

            #[cfg(feature = "tracing")]
            debug!(
                records = progress.records_processed,
                distinct = table.len(),
                "Finished input source"
            );

            reporter.source_finished(input, &progress);
        }

        Ok((table, tracker.snapshot()))
    }

    /// Counts k-mers and writes the library to `output`.
    ///
    /// Nothing is created at `output` unless the whole table was written.
    pub fn write<P>(&self, output: P, reporter: &dyn Reporter) -> Result<LibrarySummary, CookiecutterError>
    where
        P: AsRef<Path>,
    {
        let output = output.as_ref();
        let (table, progress) = self.count(reporter)?;
        let rows = table.into_rows(self.sorted);

        write_atomically(output, &rows)?;

        #[cfg(feature = "tracing")]
        info!(path = ?output, rows = rows.len(), "Library written");

        reporter.library_written(output, rows.len());
        Ok(LibrarySummary {
            rows: rows.len(),
            progress,
        })
    }
}

/// Builds a library from one or more FASTA files with default settings.
pub fn make_library<I, T, P>(inputs: I, output: P, k: usize) -> Result<LibrarySummary, CookiecutterError>
where
    I: IntoIterator<Item = T>,
    T: Into<Input>,
    P: AsRef<Path>,
{
    LibraryBuilder::new()
        .k(k)?
        .inputs(inputs)
        .write(output, &NullReporter)
}

fn count_source(
    input: &Input,
    k: KmerLength,
    table: &KmerTable,
    tracker: &ProgressTracker,
) -> Result<(), CookiecutterError> {
    let path = input.display_path();

    FastaReader::new(input.open()?)
        .par_bridge()
        .try_for_each(|record| {
            let record = record.map_err(|e| read_error(e, &path))?;
            let windows = table.add_sequence(&record.sequence, k);
            tracker.record_sequence(record.sequence.chars().count() as u64, windows);
            Ok(())
        })
}

fn read_error(err: io::Error, path: &Path) -> CookiecutterError {
    if err.kind() == io::ErrorKind::InvalidData {
        CookiecutterError::FastaParse {
            details: err.to_string(),
            path: path.to_path_buf(),
        }
    } else {
        CookiecutterError::FastaRead {
            source: err,
            path: path.to_path_buf(),
        }
    }
}

/// Writes into a temporary file beside `output` and renames it into place.
fn write_atomically(output: &Path, rows: &[(String, u64)]) -> Result<(), CookiecutterError> {
    let write_error = |source| CookiecutterError::LibraryWrite {
        source,
        path: output.to_path_buf(),
    };

    let dir: PathBuf = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".cookiecutter-").suffix(".tmp");
    // Same mode as `File::create`: 0o666 masked by the umask.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(&dir).map_err(write_error)?;

    write_tsv(rows, BufWriter::new(tmp.as_file_mut())).map_err(write_error)?;
    tmp.persist(output).map_err(|e| write_error(e.error))?;
    Ok(())
}
