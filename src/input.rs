//! Input source abstraction for file and stdin.
//!
//! # Example
//!
//! ```rust
//! use cookiecutter::input::Input;
//! use std::path::Path;
//!
//! // From a file path
//! let input = Input::from_path(Path::new("satellites.fa"));
//! assert!(matches!(input, Input::File(_)));
//!
//! // From stdin marker
//! let input = Input::from_path(Path::new("-"));
//! assert!(matches!(input, Input::Stdin));
//! ```

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::error::CookiecutterError;

/// A FASTA source for the library builder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Input {
    /// Read from a file at the specified path.
    File(PathBuf),
    /// Read from standard input.
    #[default]
    Stdin,
}

impl Input {
    /// Creates an `Input` from a path.
    ///
    /// If the path is "-", returns [`Self::Stdin`].
    /// Otherwise, returns [`Self::File`] with the given path.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(path.to_path_buf())
        }
    }

    /// Returns `true` if this input is stdin.
    #[must_use]
    pub const fn is_stdin(&self) -> bool {
        matches!(self, Self::Stdin)
    }

    /// Returns the file path if this is a file input.
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Stdin => None,
        }
    }

    /// Path used in error messages.
    pub(crate) fn display_path(&self) -> PathBuf {
        match self {
            Self::File(path) => path.clone(),
            Self::Stdin => PathBuf::from("<stdin>"),
        }
    }

    /// Opens the source for buffered line reading.
    ///
    /// With the `gzip` feature, files ending in `.gz` are decompressed on the fly.
    pub fn open(&self) -> Result<Box<dyn BufRead + Send>, CookiecutterError> {
        match self {
            Self::Stdin => Ok(Box::new(BufReader::new(io::stdin()))),
            Self::File(path) => {
                let file = File::open(path).map_err(|source| CookiecutterError::FastaRead {
                    source,
                    path: path.clone(),
                })?;
                Ok(wrap_file(path, file))
            }
        }
    }
}

#[cfg(feature = "gzip")]
fn wrap_file(path: &Path, file: File) -> Box<dyn BufRead + Send> {
    use flate2::read::MultiGzDecoder;

    if is_gzip_path(path) {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    }
}

#[cfg(not(feature = "gzip"))]
fn wrap_file(_path: &Path, file: File) -> Box<dyn BufRead + Send> {
    Box::new(BufReader::new(file))
}

/// Check if a path has a gzip extension (.gz).
#[cfg(feature = "gzip")]
fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

impl From<PathBuf> for Input {
    fn from(path: PathBuf) -> Self {
        Self::from_path(&path)
    }
}

impl From<&Path> for Input {
    fn from(path: &Path) -> Self {
        Self::from_path(path)
    }
}

impl From<&str> for Input {
    fn from(path: &str) -> Self {
        Self::from_path(Path::new(path))
    }
}

impl std::fmt::Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => write!(f, "<stdin>"),
        }
    }
}
