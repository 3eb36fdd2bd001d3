//! # prefixsum
//!
//! Sum of the first `n` positive integers, three ways.
//!
//! ## Strategies
//! - **ClosedForm**: `n * (n + 1) / 2`, O(1)
//! - **LazySequence**: folds `1..=n` lazily, O(n) time, O(1) space
//! - **Cached**: the incremental bounded cache in `prefixcache`
//!
//! Bounds are `u64` and totals `u128`, so no strategy can overflow.

#![warn(missing_docs)]

mod error;
mod input;
mod parser;
mod strategy;

pub use error::{Error, Result};
pub use input::{InputPolicy, RawInput};
pub use parser::parse_query;
pub use strategy::{cross_check, ClosedForm, CountTo, LazySequence, PrefixSum, Strategy};
