//! Fuzz target for reverse complement.
//!
//! Properties:
//! 1. Output is never longer than the input
//! 2. Applying it twice restores any input made of mapped symbols

#![no_main]

use cookiecutter::revcomp::{complement, reverse_complement};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|seq: &str| {
    let rc = reverse_complement(seq);
    assert!(rc.chars().count() <= seq.chars().count());

    if seq.chars().all(|c| complement(c).is_some()) {
        assert_eq!(reverse_complement(&rc), seq, "reverse complement is not an involution");
    }
});
