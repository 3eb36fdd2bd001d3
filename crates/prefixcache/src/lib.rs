//! # prefixcache
//!
//! Incremental bounded cache for prefix sums (`1 + 2 + ... + n`).
//!
//! ## Architecture
//! - **Store**: AHash map of n -> total, pruned by key magnitude
//! - **Anchor**: largest resident key; misses extend forward or backward from it
//! - **Locking**: one `parking_lot` mutex acquisition per query
//!
//! ```
//! use prefixcache::SumCache;
//!
//! let cache = SumCache::new(100).unwrap();
//! assert_eq!(cache.query(5).unwrap(), 15);
//! assert_eq!(cache.query(7).unwrap(), 28);
//! assert_eq!(cache.query(6).unwrap(), 21);
//! assert_eq!(cache.query(-1).unwrap(), 0);
//! ```

#![warn(missing_docs)]

mod cache;
mod config;
mod stats;
mod store;

pub use cache::SumCache;
pub use config::{CacheConfig, DEFAULT_CAPACITY};
pub use stats::{CacheStats, StatsSnapshot};
