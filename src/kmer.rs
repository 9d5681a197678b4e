//! K-mer length validation and the concurrent k-mer count table.

use std::{collections::HashMap, hash::BuildHasherDefault, io::Write};

use dashmap::DashMap;
use rustc_hash::FxHasher;

use crate::{error::KmerLengthError, revcomp::reverse_complement};

/// Smallest accepted k-mer length.
pub const MIN_K: usize = 1;

/// A validated k-mer length (`k >= 1`).
///
/// ```rust
/// use cookiecutter::kmer::KmerLength;
///
/// let k = KmerLength::new(23)?;
/// assert_eq!(k.get(), 23);
/// assert!(KmerLength::new(0).is_err());
/// # Ok::<(), cookiecutter::error::KmerLengthError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KmerLength(usize);

impl KmerLength {
    pub const fn new(k: usize) -> Result<Self, KmerLengthError> {
        if k < MIN_K {
            return Err(KmerLengthError { k, min: MIN_K });
        }
        Ok(Self(k))
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for KmerLength {
    type Error = KmerLengthError;

    fn try_from(k: usize) -> Result<Self, Self::Error> {
        Self::new(k)
    }
}

impl std::fmt::Display for KmerLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A custom `DashMap` w/ `FxHasher`.
type DashFx = DashMap<String, u64, BuildHasherDefault<FxHasher>>;

/// Occurrence counts for k-mers and their reverse complements.
///
/// Every window is counted twice: once as read and once as its reverse
/// complement, under separate keys. A reverse-complement palindrome such as
/// `ACGT` therefore gains two counts per occurrence. The table can be filled
/// from several threads at once.
pub struct KmerTable {
    counts: DashFx,
}

impl Default for KmerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KmerTable {
    pub fn new() -> Self {
        Self {
            counts: DashMap::with_hasher(BuildHasherDefault::<FxHasher>::default()),
        }
    }

    /// Counts every window of length `k` in `raw`.
    ///
    /// The sequence is uppercased and stripped of all whitespace first.
    /// Returns the number of windows, which is zero when the cleaned
    /// sequence is shorter than `k`.
    pub fn add_sequence(&self, raw: &str, k: KmerLength) -> u64 {
        let seq: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect();

        let bounds: Vec<usize> = seq
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(seq.len()))
            .collect();
        let symbols = bounds.len() - 1;
        let k = k.get();
        if symbols < k {
            return 0;
        }

        let windows = symbols - k + 1;
        for i in 0..windows {
            let kmer = &seq[bounds[i]..bounds[i + k]];
            self.increment(kmer);
            self.increment(&reverse_complement(kmer));
        }
        windows as u64
    }

    fn increment(&self, kmer: &str) {
        if let Some(mut count) = self.counts.get_mut(kmer) {
            *count += 1;
        } else {
            *self.counts.entry(kmer.to_owned()).or_insert(0) += 1;
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, kmer: &str) -> Option<u64> {
        self.counts.get(kmer).map(|count| *count)
    }

    /// Consumes the table into `(kmer, count)` rows, sorted by k-mer if asked.
    pub fn into_rows(self, sorted: bool) -> Vec<(String, u64)> {
        let mut rows: Vec<_> = self.counts.into_iter().collect();
        if sorted {
            rows.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        }
        rows
    }

    pub fn into_hashmap(self) -> HashMap<String, u64> {
        self.counts.into_iter().collect()
    }
}

/// Writes rows as `<kmer>\t<count>\n`, no header.
pub fn write_tsv<W: Write>(rows: &[(String, u64)], mut out: W) -> std::io::Result<()> {
    for (kmer, count) in rows {
        writeln!(out, "{kmer}\t{count}")?;
    }
    out.flush()
}
