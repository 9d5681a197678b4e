//! Turns lists of FASTQ files into a queue of filtering commands.
//!
//! Each input file (or left/right pair) becomes one command line for one of
//! the external filtering tools. Paths are quoted for the shell, since the
//! scheduler runs every command through `sh -c`, and must be valid UTF-8 so
//! that the command names exactly the file that was given.
//!
//! # Example
//!
//! ```rust
//! use cookiecutter::batch::{BatchPlan, ReadLayout, Tool};
//!
//! let layout = ReadLayout::paired(vec!["a_1.fq".into()], vec!["a_2.fq".into()])?;
//! let plan = BatchPlan::new(Tool::Remove, layout, "out", "fragments.tsv")?;
//!
//! assert_eq!(
//!     plan.commands(),
//!     vec!["remove -o out --fragments fragments.tsv -1 a_1.fq -2 a_2.fq"]
//! );
//! # Ok::<(), cookiecutter::error::CookiecutterError>(())
//! ```

use std::{borrow::Cow, path::PathBuf, str::FromStr};

use clap::ValueEnum;

use crate::{
    error::CookiecutterError,
    queue::{JobQueue, QueueOrder},
};

/// The external filtering executables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tool {
    /// Drop reads that contain library k-mers.
    Remove,
    /// `remove` plus poly-G/C, length, quality and DUST filters.
    #[value(name = "rm_reads")]
    RmReads,
    /// Write matched and unmatched reads to separate files.
    Separate,
    /// Keep only reads that contain library k-mers.
    Extract,
}

impl Tool {
    pub const ALL: [Self; 4] = [Self::Remove, Self::RmReads, Self::Separate, Self::Extract];

    /// Executable name.
    pub const fn program(self) -> &'static str {
        match self {
            Self::Remove => "remove",
            Self::RmReads => "rm_reads",
            Self::Separate => "separate",
            Self::Extract => "extract",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for Tool {
    type Err = CookiecutterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.program() == s)
            .ok_or_else(|| {
                let available: Vec<_> = Self::ALL.iter().map(|t| t.program()).collect();
                CookiecutterError::config(format!(
                    "unknown tool '{s}'; available: {}",
                    available.join(", ")
                ))
            })
    }
}

/// Single-end files or matched left/right pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadLayout {
    Single(Vec<String>),
    Paired { left: Vec<String>, right: Vec<String> },
}

impl ReadLayout {
    pub fn single(files: Vec<PathBuf>) -> Result<Self, CookiecutterError> {
        if files.is_empty() {
            return Err(CookiecutterError::config("no single-end FASTQ files given"));
        }
        Ok(Self::Single(utf8_paths(files, "FASTQ")?))
    }

    pub fn paired(left: Vec<PathBuf>, right: Vec<PathBuf>) -> Result<Self, CookiecutterError> {
        if left.len() != right.len() {
            return Err(CookiecutterError::config(format!(
                "not equal number of left ({}) and right ({}) FASTQ files",
                left.len(),
                right.len()
            )));
        }
        if left.is_empty() {
            return Err(CookiecutterError::config("no paired-end FASTQ files given"));
        }
        Ok(Self::Paired {
            left: utf8_paths(left, "left FASTQ")?,
            right: utf8_paths(right, "right FASTQ")?,
        })
    }

    /// Number of jobs this layout produces.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(files) => files.len(),
            Self::Paired { left, .. } => left.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn input_args(&self) -> Vec<String> {
        match self {
            Self::Single(files) => files
                .iter()
                .map(|file| format!("-i {}", quote(file)))
                .collect(),
            Self::Paired { left, right } => left
                .iter()
                .zip(right)
                .map(|(l, r)| format!("-1 {} -2 {}", quote(l), quote(r)))
                .collect(),
        }
    }
}

/// DUST low-complexity filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dust {
    pub cutoff: u32,
    pub k: u32,
}

/// Extra thresholds passed to `rm_reads`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadFilters {
    pub poly_g: u32,
    pub min_length: u32,
    pub mean_quality: u32,
    /// Passed only when set.
    pub dust: Option<Dust>,
}

impl Default for ReadFilters {
    fn default() -> Self {
        Self {
            poly_g: 23,
            min_length: 50,
            mean_quality: 20,
            dust: None,
        }
    }
}

impl ReadFilters {
    fn args(&self) -> String {
        let mut args = format!(
            " --polyG {} --length {} --mq {}",
            self.poly_g, self.min_length, self.mean_quality
        );
        if let Some(dust) = self.dust {
            args.push_str(&format!(" --dust_cutoff {} --dust_k {}", dust.cutoff, dust.k));
        }
        args
    }
}

/// Everything needed to build one command per input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    tool: Tool,
    layout: ReadLayout,
    output_dir: String,
    fragments: String,
    filters: ReadFilters,
    tool_dir: Option<String>,
}

impl BatchPlan {
    pub fn new(
        tool: Tool,
        layout: ReadLayout,
        output_dir: impl Into<PathBuf>,
        fragments: impl Into<PathBuf>,
    ) -> Result<Self, CookiecutterError> {
        let output_dir = utf8_path(output_dir.into(), "output directory")?;
        let fragments = utf8_path(fragments.into(), "k-mer library")?;
        if output_dir.is_empty() {
            return Err(CookiecutterError::config("output directory must not be empty"));
        }
        if fragments.is_empty() {
            return Err(CookiecutterError::config("k-mer library path must not be empty"));
        }
        Ok(Self {
            tool,
            layout,
            output_dir,
            fragments,
            filters: ReadFilters::default(),
            tool_dir: None,
        })
    }

    /// Thresholds for `rm_reads`; ignored by the other tools.
    #[must_use]
    pub fn filters(mut self, filters: ReadFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Directory holding the tool executables. Without it the shell looks
    /// the tool up on `PATH`.
    pub fn tool_dir(mut self, dir: impl Into<PathBuf>) -> Result<Self, CookiecutterError> {
        let dir = utf8_path(dir.into(), "tool directory")?;
        if dir.is_empty() {
            return Err(CookiecutterError::config("tool directory must not be empty"));
        }
        self.tool_dir = Some(dir);
        Ok(self)
    }

    pub const fn tool(&self) -> Tool {
        self.tool
    }

    pub fn len(&self) -> usize {
        self.layout.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// One command line per input, in input order.
    pub fn commands(&self) -> Vec<String> {
        let program = match &self.tool_dir {
            Some(dir) => quote(&program_path(dir, self.tool)).into_owned(),
            None => self.tool.program().to_string(),
        };

        let mut options = format!(
            "{program} -o {} --fragments {}",
            quote(&self.output_dir),
            quote(&self.fragments)
        );
        if self.tool == Tool::RmReads {
            options.push_str(&self.filters.args());
        }

        self.layout
            .input_args()
            .into_iter()
            .map(|input| format!("{options} {input}"))
            .collect()
    }

    pub fn into_queue(&self, order: QueueOrder) -> JobQueue {
        JobQueue::from_commands(self.commands(), order)
    }
}

fn utf8_path(path: PathBuf, what: &str) -> Result<String, CookiecutterError> {
    path.into_os_string().into_string().map_err(|raw| {
        CookiecutterError::config(format!(
            "{what} path is not valid UTF-8: {}",
            PathBuf::from(raw).display()
        ))
    })
}

fn utf8_paths(paths: Vec<PathBuf>, what: &str) -> Result<Vec<String>, CookiecutterError> {
    paths.into_iter().map(|path| utf8_path(path, what)).collect()
}

/// Path of `tool` inside `dir`. A relative directory gets a `./` prefix so
/// that a first word such as `a=b/remove` is not read as an assignment.
fn program_path(dir: &str, tool: Tool) -> String {
    let dir = dir.strip_suffix('/').filter(|d| !d.is_empty()).unwrap_or(dir);
    let prefix = if dir.starts_with('/') || dir.starts_with('.') {
        ""
    } else {
        "./"
    };
    if dir == "/" {
        format!("/{}", tool.program())
    } else {
        format!("{prefix}{dir}/{}", tool.program())
    }
}

/// Single-quotes a word for `sh` unless every character is safe bare.
fn quote(s: &str) -> Cow<'_, str> {
    let safe = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+' | ',' | ':' | '='));
    if safe {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(format!("'{}'", s.replace('\'', r"'\''")))
    }
}
