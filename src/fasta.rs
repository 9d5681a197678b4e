//! Streaming FASTA record reader.
//!
//! [`FastaReader`] yields one [`FastaRecord`] per `>`-delimited block without
//! holding more than the current record in memory. The reader is deliberately
//! permissive: sequence lines that appear before the first header form a
//! record of their own with no header, and the sequence alphabet is not
//! checked.
//!
//! # Example
//!
//! ```rust
//! use cookiecutter::fasta::FastaReader;
//!
//! let data = "ACGT\n>chrM\nGATT\nACA\n";
//! let records: Vec<_> = FastaReader::new(data.as_bytes())
//!     .collect::<Result<_, _>>()?;
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].header, None);
//! assert_eq!(records[1].header.as_deref(), Some("chrM"));
//! assert_eq!(records[1].sequence, "GATTACA");
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, BufRead};

/// One FASTA block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastaRecord {
    /// Header line without the leading `>`; `None` for body lines that
    /// precede any header.
    pub header: Option<String>,
    /// Body lines concatenated without their line terminators.
    pub sequence: String,
}

/// Lazily iterates over the records of a FASTA text source.
///
/// The iterator is finite and not restartable. After an I/O error it yields
/// the error once and then ends.
pub struct FastaReader<R> {
    reader: R,
    line: String,
    header: Option<String>,
    sequence: String,
    pending: bool,
    done: bool,
}

impl<R: BufRead> FastaReader<R> {
    /// Wraps a buffered text source.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            header: None,
            sequence: String::new(),
            pending: false,
            done: false,
        }
    }

    /// Hands out the accumulated record, if there is one.
    fn flush(&mut self) -> Option<FastaRecord> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        Some(FastaRecord {
            header: self.header.take(),
            sequence: std::mem::take(&mut self.sequence),
        })
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = io::Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Ok(0) => {
                    self.done = true;
                    return self.flush().map(Ok);
                }
                Ok(_) => {}
            }

            let line = self.line.trim_end_matches(|c| c == '\n' || c == '\r');

            if let Some(header) = line.strip_prefix('>') {
                let header = header.to_owned();
                let finished = self.flush();
                self.header = Some(header);
                self.pending = true;
                if finished.is_some() {
                    return finished.map(Ok);
                }
            } else {
                self.sequence.push_str(line);
                if !line.is_empty() {
                    self.pending = true;
                }
            }
        }
    }
}
