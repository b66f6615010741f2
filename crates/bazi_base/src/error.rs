//! Error types for the optional analyzers.
//!
//! Only the marker detector and the pairwise relationship analyzer can fail;
//! every table lookup elsewhere is total.

use thiserror::Error;

/// Malformed extended input to the marker detector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ShenShaError {
    /// Extended input must hold 8, 10 or 12 symbols.
    #[error("expected 8, 10 or 12 symbols, got {actual}")]
    SymbolCount { actual: usize },

    /// A symbol at a stem slot was not a stem, or vice versa.
    #[error("symbol {index} ({symbol:?}) is not a valid {expected}")]
    InvalidSymbol {
        index: usize,
        symbol: String,
        expected: &'static str,
    },

    /// A stem/branch pair does not share polarity.
    #[error("pair {index} is not a valid sexagenary pair")]
    InvalidPair { index: usize },
}

impl ShenShaError {
    pub fn symbol_count(actual: usize) -> Self {
        Self::SymbolCount { actual }
    }

    pub fn invalid_symbol(index: usize, symbol: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidSymbol {
            index,
            symbol: symbol.into(),
            expected,
        }
    }
}

/// Input the relationship analyzer cannot work with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RelationshipError {
    #[error("relationship analysis needs at least 2 pillars, got {actual}")]
    TooFewPillars { actual: usize },

    #[error("relationship analysis supports at most {max} pillars, got {actual}")]
    TooManyPillars { max: usize, actual: usize },

    #[error("stem and branch counts differ: {stems} stems, {branches} branches")]
    LengthMismatch { stems: usize, branches: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            ShenShaError::symbol_count(9).to_string(),
            "expected 8, 10 or 12 symbols, got 9"
        );
        assert!(
            ShenShaError::invalid_symbol(3, "X", "branch")
                .to_string()
                .contains("branch")
        );
        assert_eq!(
            RelationshipError::LengthMismatch {
                stems: 4,
                branches: 3
            }
            .to_string(),
            "stem and branch counts differ: 4 stems, 3 branches"
        );
        assert!(
            RelationshipError::TooFewPillars { actual: 1 }
                .to_string()
                .contains("at least 2")
        );
    }
}
