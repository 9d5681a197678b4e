//! Fuzz target for the FASTA reader.
//!
//! Arbitrary bytes must never panic the reader, and a source that parses
//! cleanly yields at most one record per header plus one leading record.

#![no_main]

use cookiecutter::fasta::FastaReader;
use cookiecutter::kmer::{KmerLength, KmerTable};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(records) = FastaReader::new(data).collect::<Result<Vec<_>, _>>() else {
        return;
    };

    let text = std::str::from_utf8(data).unwrap();
    let headers = text.lines().filter(|line| line.starts_with('>')).count();
    assert!(records.len() <= headers + 1);
    assert!(records.iter().all(|r| !r.sequence.contains('\n')));

    // Counting must also cope with whatever the reader produced.
    let table = KmerTable::new();
    let k = KmerLength::new(3).unwrap();
    for record in &records {
        table.add_sequence(&record.sequence, k);
    }
});
