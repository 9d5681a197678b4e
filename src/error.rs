//! Error types for cookiecutter.
//!
//! Builder errors (unreadable FASTA, unwritable library) and scheduler launch
//! errors propagate to the caller. A job that exits non-zero is not an error:
//! it is recorded in the [`BatchReport`](crate::report::BatchReport).

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in cookiecutter operations.
#[derive(Debug, Error)]
pub enum CookiecutterError {
    /// K-mer length is zero.
    #[error("invalid k-mer length {k}: must be at least {min}")]
    InvalidKmerLength { k: usize, min: usize },

    /// Failed to open or read a FASTA source.
    #[error("failed to read FASTA input '{path}': {source}")]
    FastaRead {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// FASTA source is readable but not valid text.
    #[error("failed to parse FASTA input '{path}': {details}")]
    FastaParse { details: String, path: PathBuf },

    /// Failed to write the k-mer library.
    #[error("failed to write k-mer library '{path}': {source}")]
    LibraryWrite {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// A required parameter is missing or invalid.
    #[error("invalid configuration: {details}")]
    InvalidConfig { details: String },

    /// The operating system could not start a job.
    #[error("failed to launch job `{command}`: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
        command: String,
    },

    /// A running job's waiter went away without reporting an exit status.
    #[error("lost track of {in_flight} running job(s)")]
    CompletionLost { in_flight: usize },

    /// Failed to write the batch report.
    #[error("failed to write batch report '{path}': {source}")]
    ReportWrite {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },
}

/// Error for invalid k-mer length.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("k-mer length {k} is out of range: must be at least {min}")]
pub struct KmerLengthError {
    /// The invalid k value that was provided.
    pub k: usize,
    /// Minimum valid k-mer length.
    pub min: usize,
}

/// Error for a concurrency limit of zero.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("concurrency limit must be at least 1")]
pub struct ConcurrencyError;

impl From<serde_json::Error> for CookiecutterError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}

impl From<KmerLengthError> for CookiecutterError {
    fn from(err: KmerLengthError) -> Self {
        Self::InvalidKmerLength {
            k: err.k,
            min: err.min,
        }
    }
}

impl From<ConcurrencyError> for CookiecutterError {
    fn from(err: ConcurrencyError) -> Self {
        Self::InvalidConfig {
            details: err.to_string(),
        }
    }
}

impl CookiecutterError {
    pub(crate) fn config(details: impl Into<String>) -> Self {
        Self::InvalidConfig {
            details: details.into(),
        }
    }

    /// Returns `true` for errors detected before any work starts.
    pub const fn is_config(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. } | Self::InvalidKmerLength { .. }
        )
    }
}
