//! Query input validation
//!
//! Callers hand in whatever number they have. Only non-negative integers are
//! valid bounds; everything else is resolved by an [`InputPolicy`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Untyped query value as supplied by a caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    /// Any integer value
    Int(i128),
    /// Any floating point value
    Float(f64),
}

impl RawInput {
    /// Check that the input is a non-negative integer that fits in `u64`
    ///
    /// Integral floats such as `5.0` are accepted.
    pub fn validate(self) -> Result<u64> {
        match self {
            RawInput::Int(value) => {
                u64::try_from(value).map_err(|_| Error::InvalidInput(self.to_string()))
            }
            RawInput::Float(value) => {
                if !value.is_finite() || value.fract() != 0.0 || value < 0.0 {
                    return Err(Error::InvalidInput(self.to_string()));
                }
                // u64::MAX as f64 rounds up to 2^64
                if value >= u64::MAX as f64 {
                    return Err(Error::InvalidInput(self.to_string()));
                }
                Ok(value as u64)
            }
        }
    }
}

impl fmt::Display for RawInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawInput::Int(value) => write!(f, "{}", value),
            RawInput::Float(value) => write!(f, "{}", value),
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for RawInput {
                fn from(value: $ty) -> Self {
                    RawInput::Int(value as i128)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f32> for RawInput {
    fn from(value: f32) -> Self {
        RawInput::Float(value as f64)
    }
}

impl From<f64> for RawInput {
    fn from(value: f64) -> Self {
        RawInput::Float(value)
    }
}

/// What a query does with a negative or non-integer input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputPolicy {
    /// Answer 0, as if the query had been for n = 0
    #[default]
    Lenient,
    /// Surface [`Error::InvalidInput`]
    Strict,
}

impl InputPolicy {
    /// Resolve raw input to a bound
    ///
    /// Returns `Ok(None)` when a lenient policy swallowed an invalid input;
    /// the caller answers 0 without touching any state.
    pub fn resolve(self, input: RawInput) -> Result<Option<u64>> {
        match (input.validate(), self) {
            (Ok(n), _) => Ok(Some(n)),
            (Err(_), InputPolicy::Lenient) => Ok(None),
            (Err(err), InputPolicy::Strict) => Err(err),
        }
    }
}
