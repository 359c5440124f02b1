//! All kinds of errors in this crate.

use ca_rules::ParseRuleError;
use displaydoc::Display;
use thiserror::Error;

/// All kinds of errors in this crate.
#[derive(Clone, Debug, PartialEq, Display, Error)]
pub enum Error {
    /// The grid must be square, non-empty and small enough to fit in memory, found {rows} rows and a row of {cols} cells.
    InvalidDimension { rows: usize, cols: usize },
    /// Invalid rule: {0}
    InvalidRule(#[from] RuleError),
    /// Duration should be positive, found {0}.
    InvalidDuration(isize),
    /// Invalid pattern: {0}
    InvalidPattern(String),
    /// Cell ({x}, {y}) is outside of a {size}x{size} grid.
    OutOfBounds { x: usize, y: usize, size: usize },
    /// Density should be between 0 and 1, found {0}.
    InvalidDensity(f64),
    /// A history needs one grid more than stability flags and at least one grid, found {grids} grids and {flags} flags.
    InvalidHistory { grids: usize, flags: usize },
}

/// Reasons for rejecting a rule.
#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum RuleError {
    /// the survival range {min}..={max} is empty.
    EmptySurvival { min: u8, max: u8 },
    /// the rule has no birth condition.
    EmptyBirth,
    /// neighbor count {0} is negative.
    NegativeCount(i64),
    /// survival counts {0:?} do not form a contiguous range.
    NonContiguousSurvival(Vec<u8>),
    /// {0}
    ParseRuleError(#[from] ParseRuleError),
}

impl From<ParseRuleError> for Error {
    fn from(e: ParseRuleError) -> Self {
        Error::InvalidRule(RuleError::ParseRuleError(e))
    }
}
