//! Reverse complement of nucleotide strings.
//!
//! The pairing table covers `A<->T`, `C<->G` and `N<->N` in both cases, plus
//! the bracket placeholders `[<->]` used in repeat libraries. Symbols outside
//! the table are handled by an [`UnmappedSymbols`] policy; the default drops
//! them, so output can be shorter than input for exotic sequences.

/// What to do with a symbol that has no complement in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmappedSymbols {
    /// Leave the symbol out of the output.
    #[default]
    Drop,
    /// Keep the symbol as is, at its reversed position.
    Retain,
}

trait Complementary {
    fn complement(self) -> Option<Self>
    where
        Self: Sized;
}

impl Complementary for char {
    fn complement(self) -> Option<Self> {
        match self {
            'A' => Some('T'),
            'T' => Some('A'),
            'C' => Some('G'),
            'G' => Some('C'),
            'N' => Some('N'),
            'a' => Some('t'),
            't' => Some('a'),
            'c' => Some('g'),
            'g' => Some('c'),
            'n' => Some('n'),
            '[' => Some(']'),
            ']' => Some('['),
            _ => None,
        }
    }
}

/// Complement of a single symbol, or `None` if it is not in the table.
pub fn complement(symbol: char) -> Option<char> {
    symbol.complement()
}

/// Reverse complement with unmapped symbols dropped.
///
/// ```rust
/// use cookiecutter::revcomp::reverse_complement;
///
/// assert_eq!(reverse_complement("ATCG"), "CGAT");
/// assert_eq!(reverse_complement("AT CG"), "CGAT");
/// ```
pub fn reverse_complement(seq: &str) -> String {
    reverse_complement_with(seq, UnmappedSymbols::Drop)
}

/// Reverse complement with an explicit policy for unmapped symbols.
pub fn reverse_complement_with(seq: &str, policy: UnmappedSymbols) -> String {
    seq.chars()
        .rev()
        .filter_map(|symbol| match (symbol.complement(), policy) {
            (Some(c), _) => Some(c),
            (None, UnmappedSymbols::Drop) => None,
            (None, UnmappedSymbols::Retain) => Some(symbol),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complements_uppercase() {
        assert_eq!(reverse_complement("GATTACA"), "TGTAATC");
    }

    #[test]
    fn preserves_case() {
        assert_eq!(reverse_complement("acgtN"), "Nacgt");
    }

    #[test]
    fn swaps_brackets() {
        assert_eq!(reverse_complement("A[N]"), "[N]T");
    }

    #[test]
    fn drop_policy_removes_unmapped_symbols() {
        assert_eq!(reverse_complement("AT CG"), "CGAT");
        assert_eq!(reverse_complement("ARYT"), "AT");
        assert_eq!(reverse_complement("XYZ"), "");
    }

    #[test]
    fn retain_policy_keeps_unmapped_symbols() {
        assert_eq!(
            reverse_complement_with("ARYT", UnmappedSymbols::Retain),
            "AYRT"
        );
        assert_eq!(
            reverse_complement_with("AT CG", UnmappedSymbols::Retain),
            "CG AT"
        );
    }

    #[test]
    fn default_policy_is_drop() {
        assert_eq!(UnmappedSymbols::default(), UnmappedSymbols::Drop);
    }

    #[test]
    fn single_symbol_complement() {
        assert_eq!(complement('a'), Some('t'));
        assert_eq!(complement(']'), Some('['));
        assert_eq!(complement('U'), None);
    }

    #[test]
    fn empty_sequence() {
        assert_eq!(reverse_complement(""), "");
    }
}
