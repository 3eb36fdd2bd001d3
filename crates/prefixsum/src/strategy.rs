//! Prefix sum strategies
//!
//! Every strategy answers the same question: the sum of `1..=n`. They differ
//! only in cost and in how much state they keep.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Something that can compute the sum of the integers `1..=n`
pub trait PrefixSum {
    /// Short name used in logs and mismatch reports
    fn name(&self) -> &'static str;

    /// Sum of `1..=n`
    fn sum_to(&self, n: u64) -> u128;
}

/// `n * (n + 1) / 2`, O(1)
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedForm;

impl PrefixSum for ClosedForm {
    fn name(&self) -> &'static str {
        "closed-form"
    }

    fn sum_to(&self, n: u64) -> u128 {
        let n = n as u128;
        // Halve whichever factor is even so the division is exact
        if n % 2 == 0 {
            (n / 2) * (n + 1)
        } else {
            n * ((n + 1) / 2)
        }
    }
}

/// Restartable sequence `1, 2, ..., n`
#[derive(Debug, Clone)]
pub struct CountTo {
    n: u64,
    range: RangeInclusive<u64>,
}

impl CountTo {
    /// Sequence that yields `1..=n`
    pub fn new(n: u64) -> Self {
        Self { n, range: 1..=n }
    }

    /// Rewind to the first element
    pub fn restart(&mut self) {
        self.range = 1..=self.n;
    }
}

impl Iterator for CountTo {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        self.range.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

/// Folds a [`CountTo`] sequence with addition, O(n) time, O(1) space
///
/// Holds no state between calls, which makes it the oracle for the cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct LazySequence;

impl PrefixSum for LazySequence {
    fn name(&self) -> &'static str {
        "lazy"
    }

    fn sum_to(&self, n: u64) -> u128 {
        CountTo::new(n).map(u128::from).sum()
    }
}

/// Named strategy selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// [`ClosedForm`]
    ClosedForm,
    /// The incremental bounded cache
    #[default]
    Cached,
    /// [`LazySequence`]
    Lazy,
}

impl Strategy {
    /// All strategies, reference first
    pub const ALL: [Strategy; 3] = [Strategy::ClosedForm, Strategy::Cached, Strategy::Lazy];

    /// Name as accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::ClosedForm => "closed-form",
            Strategy::Cached => "cached",
            Strategy::Lazy => "lazy",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "closed-form" | "closed" | "formula" => Ok(Strategy::ClosedForm),
            "cached" | "cache" => Ok(Strategy::Cached),
            "lazy" | "sequence" => Ok(Strategy::Lazy),
            other => Err(Error::Parse(format!("unknown strategy '{}'", other))),
        }
    }
}

/// Run every strategy for `n` and make sure they agree
///
/// The first strategy is the reference. Returns its value on agreement.
pub fn cross_check(n: u64, strategies: &[&dyn PrefixSum]) -> Result<u128> {
    let Some((reference, rest)) = strategies.split_first() else {
        return Ok(ClosedForm.sum_to(n));
    };

    let expected = reference.sum_to(n);
    for strategy in rest {
        let actual = strategy.sum_to(n);
        if actual != expected {
            return Err(Error::Mismatch {
                n,
                expected,
                strategy: strategy.name(),
                actual,
            });
        }
    }

    Ok(expected)
}
