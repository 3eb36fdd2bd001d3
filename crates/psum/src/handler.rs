//! Query handler for the psum CLI

use std::fmt;
use std::sync::Arc;

use prefixcache::SumCache;
use prefixsum::{
    cross_check, parse_query, ClosedForm, LazySequence, PrefixSum, RawInput, Result, Strategy,
};
use serde::Serialize;
use tracing::debug;

/// Answer to one textual query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    /// Query as the user typed it, trimmed
    pub query: String,
    /// Strategy that produced the total
    pub strategy: Strategy,
    /// Sum of `1..=n`, or 0 for a leniently handled invalid input
    pub total: u128,
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.query, self.total)
    }
}

pub struct QueryHandler {
    cache: Arc<SumCache>,
    strategy: Strategy,
    check: bool,
}

impl QueryHandler {
    pub fn new(cache: Arc<SumCache>, strategy: Strategy, check: bool) -> Self {
        Self {
            cache,
            strategy,
            check,
        }
    }

    pub fn handle(&self, line: &str) -> Result<Response> {
        let input = parse_query(line)?;

        let total = match self.strategy {
            Strategy::Cached => self.cache.query(input)?,
            Strategy::ClosedForm => self.stateless(&ClosedForm, input)?,
            Strategy::Lazy => self.stateless(&LazySequence, input)?,
        };

        if self.check {
            if let Ok(n) = input.validate() {
                cross_check(n, &[&ClosedForm, self.cache.as_ref(), &LazySequence])?;
                debug!(n, "strategies agree");
            }
        }

        Ok(Response {
            query: line.trim().to_string(),
            strategy: self.strategy,
            total,
        })
    }

    /// Apply the cache's input policy to a strategy without state
    fn stateless(&self, strategy: &dyn PrefixSum, input: RawInput) -> Result<u128> {
        match self.cache.config().policy.resolve(input)? {
            Some(n) => Ok(strategy.sum_to(n)),
            None => Ok(0),
        }
    }
}
