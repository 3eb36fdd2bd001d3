//! Error types for prefixsum

use std::fmt;

/// Result type alias for prefixsum operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for prefix sum queries
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Query is negative or not an integer
    InvalidInput(String),

    /// Cache capacity of zero can never hold the base case
    CapacityMisconfigured(usize),

    /// Textual query could not be parsed as a number
    Parse(String),

    /// Two strategies disagreed on the same query
    Mismatch {
        /// Queried bound
        n: u64,
        /// Value produced by the reference strategy
        expected: u128,
        /// Name of the disagreeing strategy
        strategy: &'static str,
        /// Value produced by the disagreeing strategy
        actual: u128,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(input) => {
                write!(f, "Invalid input: {} (expected a non-negative integer)", input)
            }
            Error::CapacityMisconfigured(capacity) => {
                write!(f, "Capacity misconfigured: {} (must be at least 1)", capacity)
            }
            Error::Parse(msg) => write!(f, "Parse error: {}", msg),
            Error::Mismatch {
                n,
                expected,
                strategy,
                actual,
            } => write!(
                f,
                "Strategy mismatch for n={}: {} returned {}, expected {}",
                n, strategy, actual, expected
            ),
        }
    }
}

impl std::error::Error for Error {}

impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        Error::Parse(format!("{:?}", err))
    }
}
