//! SumCache: incremental bounded prefix sum cache

use parking_lot::Mutex;
use prefixsum::{ClosedForm, PrefixSum, RawInput, Result};
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::stats::CacheStats;
use crate::store::BoundedStore;

/// Mutable cache state, guarded as one unit
struct State {
    /// Resident entries
    store: BoundedStore,

    /// Largest resident key and its total
    anchor: (u64, u128),
}

impl State {
    fn new(capacity: usize) -> Self {
        let mut store = BoundedStore::new(capacity);
        store.insert(0, 0);

        Self {
            store,
            anchor: (0, 0),
        }
    }
}

/// Prefix sum cache that extends incrementally from its high-water mark
///
/// Queries above the anchor walk forward and cache every intermediate total.
/// Queries below it walk backward from the anchor and cache only the result.
/// After each write the store is pruned back to capacity, smallest keys first,
/// except that the entry answering the current query always survives.
///
/// Every query takes the state lock exactly once, so a shared `SumCache`
/// behaves as if calls were serialized.
pub struct SumCache {
    /// Store and anchor
    state: Mutex<State>,

    /// Cache statistics
    stats: CacheStats,

    /// Settings fixed at construction
    config: CacheConfig,
}

impl SumCache {
    /// Create a new SumCache with the given capacity and default settings
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of resident entries
    ///
    /// # Returns
    /// * `Result<SumCache>` - `CapacityMisconfigured` if capacity is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(CacheConfig::with_capacity(capacity))
    }

    /// Create a new SumCache from a full configuration
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            state: Mutex::new(State::new(config.capacity)),
            stats: CacheStats::new(),
            config,
        })
    }

    /// Sum of `1..=n` for an untyped input
    ///
    /// Negative and non-integer inputs are answered with 0 under
    /// [`InputPolicy::Lenient`](prefixsum::InputPolicy::Lenient) and
    /// rejected under `Strict`. Neither touches the store.
    ///
    /// # Arguments
    /// * `n` - Requested bound
    ///
    /// # Returns
    /// * `Result<u128>` - Exact sum
    pub fn query<I: Into<RawInput>>(&self, n: I) -> Result<u128> {
        let input = n.into();

        match self.config.policy.resolve(input) {
            Ok(Some(n)) => Ok(self.sum_to(n)),
            Ok(None) => {
                self.stats.record_invalid_input();
                debug!(%input, "invalid input answered with 0");
                Ok(0)
            }
            Err(err) => {
                self.stats.record_invalid_input();
                debug!(%input, "invalid input rejected");
                Err(err)
            }
        }
    }

    /// Sum of `1..=n`
    pub fn sum_to(&self, n: u64) -> u128 {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        if let Some(total) = state.store.get(n) {
            self.stats.record_hit();
            trace!(n, "cache hit");
            return total;
        }

        self.stats.record_miss();
        let total = if n > state.anchor.0 {
            self.extend_forward(state, n)
        } else {
            self.extend_backward(state, n)
        };

        self.prune(state, n);
        total
    }

    fn extend_forward(&self, state: &mut State, n: u64) -> u128 {
        let (mut start, mut total) = state.anchor;
        // Keys below this would be pruned as soon as the walk finishes
        let write_from = n.saturating_sub(self.config.capacity as u64 - 1);

        if let Some(threshold) = self.config.seed_threshold {
            if n - start > threshold && write_from > start + 1 {
                start = write_from - 1;
                total = ClosedForm.sum_to(start);
                self.stats.record_seed();
            }
        }

        let mut inserted = 0;
        for i in start + 1..=n {
            total += i as u128;
            if i >= write_from && state.store.insert(i, total) {
                inserted += 1;
            }
        }

        let steps = n - start;
        self.stats.record_forward_steps(steps);
        self.stats.record_inserts(inserted);
        debug!(from = start, to = n, steps, "forward extension");

        state.anchor = (n, total);
        total
    }

    fn extend_backward(&self, state: &mut State, n: u64) -> u128 {
        let (anchor, mut total) = state.anchor;

        // Intermediates are not cached: they would be the smallest keys
        // outside the resident window and go at the next prune.
        for i in (n + 1..=anchor).rev() {
            total -= i as u128;
        }

        if state.store.insert(n, total) {
            self.stats.record_inserts(1);
        }

        let steps = anchor - n;
        self.stats.record_backward_steps(steps);
        debug!(from = anchor, to = n, steps, "backward extension");

        total
    }

    fn prune(&self, state: &mut State, keep: u64) {
        let evicted = state.store.prune(keep);
        if evicted == 0 {
            return;
        }

        self.stats.record_evictions(evicted as u64);
        if !state.store.contains(state.anchor.0) {
            if let Some(entry) = state.store.max_entry() {
                state.anchor = entry;
            }
        }

        debug!(evicted, anchor = state.anchor.0, "pruned");
    }

    /// Resident total for `n`, without computing or counting a hit
    pub fn peek(&self, n: u64) -> Option<u128> {
        self.state.lock().store.get(n)
    }

    /// Check whether `n` is resident
    pub fn contains(&self, n: u64) -> bool {
        self.state.lock().store.contains(n)
    }

    /// Resident keys in ascending order
    pub fn keys(&self) -> Vec<u64> {
        self.state.lock().store.keys()
    }

    /// Largest resident key, the starting point for extensions
    pub fn high_water_mark(&self) -> u64 {
        self.state.lock().anchor.0
    }

    /// Get current number of resident entries
    pub fn len(&self) -> usize {
        self.state.lock().store.len()
    }

    /// Check if the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.state.lock().store.is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.state.lock().store.capacity()
    }

    /// Get the configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Drop all entries and statistics, keeping only the n = 0 base case
    pub fn clear(&self) {
        let mut state = self.state.lock();
        *state = State::new(self.config.capacity);
        self.stats.reset();
    }
}

impl Default for SumCache {
    fn default() -> Self {
        let config = CacheConfig::default();

        Self {
            state: Mutex::new(State::new(config.capacity)),
            stats: CacheStats::new(),
            config,
        }
    }
}

impl PrefixSum for SumCache {
    fn name(&self) -> &'static str {
        "cached"
    }

    fn sum_to(&self, n: u64) -> u128 {
        SumCache::sum_to(self, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefixsum::{Error, InputPolicy};
    use std::sync::Arc;

    fn oracle(n: u64) -> u128 {
        ClosedForm.sum_to(n)
    }

    #[test]
    fn test_cache_starts_with_base_case() {
        let cache = SumCache::default();

        assert_eq!(cache.keys(), vec![0]);
        assert_eq!(cache.high_water_mark(), 0);
        assert_eq!(cache.capacity(), 100);
        assert_eq!(cache.query(0).unwrap(), 0);
        assert_eq!(cache.stats().hits(), 1);
    }

    #[test]
    fn test_cache_zero_capacity() {
        assert!(matches!(
            SumCache::new(0),
            Err(Error::CapacityMisconfigured(0))
        ));
    }

    #[test]
    fn test_forward_caches_intermediates() {
        let cache = SumCache::new(100).unwrap();

        assert_eq!(cache.query(5).unwrap(), 15);
        assert_eq!(cache.keys(), vec![0, 1, 2, 3, 4, 5]);
        let totals: Vec<u128> = (0..=5).map(|n| cache.peek(n).unwrap()).collect();
        assert_eq!(totals, vec![0, 1, 3, 6, 10, 15]);
        assert_eq!(cache.high_water_mark(), 5);
        assert_eq!(cache.stats().forward_steps(), 5);
    }

    #[test]
    fn test_forward_from_anchor() {
        let cache = SumCache::new(100).unwrap();

        cache.query(5).unwrap();
        assert_eq!(cache.query(7).unwrap(), 28);
        assert_eq!(cache.high_water_mark(), 7);
        // 5 steps for query(5), then only 6 and 7
        assert_eq!(cache.stats().forward_steps(), 7);
    }

    #[test]
    fn test_hit_below_anchor() {
        let cache = SumCache::new(100).unwrap();

        cache.query(5).unwrap();
        cache.query(7).unwrap();
        let steps = cache.stats().arithmetic_steps();

        assert_eq!(cache.query(6).unwrap(), 21);
        assert_eq!(cache.high_water_mark(), 7);
        assert_eq!(cache.stats().arithmetic_steps(), steps);
        assert_eq!(cache.stats().hits(), 1);
    }

    #[test]
    fn test_negative_input_lenient() {
        let cache = SumCache::new(100).unwrap();
        cache.query(5).unwrap();
        let before = cache.keys();

        assert_eq!(cache.query(-1).unwrap(), 0);
        assert_eq!(cache.keys(), before);
        assert_eq!(cache.high_water_mark(), 5);
        assert_eq!(cache.stats().invalid_inputs(), 1);
        assert_eq!(cache.stats().hits() + cache.stats().misses(), 1);
    }

    #[test]
    fn test_fractional_input_lenient() {
        let cache = SumCache::new(100).unwrap();

        assert_eq!(cache.query(3.5).unwrap(), 0);
        assert_eq!(cache.keys(), vec![0]);
    }

    #[test]
    fn test_integral_float_input() {
        let cache = SumCache::new(100).unwrap();
        assert_eq!(cache.query(4.0).unwrap(), 10);
    }

    #[test]
    fn test_invalid_input_strict() {
        let config = CacheConfig::default().policy(InputPolicy::Strict);
        let cache = SumCache::with_config(config).unwrap();

        assert!(matches!(cache.query(-1), Err(Error::InvalidInput(_))));
        assert!(matches!(cache.query(3.5), Err(Error::InvalidInput(_))));
        assert_eq!(cache.keys(), vec![0]);
        assert_eq!(cache.query(3).unwrap(), 6);
    }

    #[test]
    fn test_backward_caches_only_result() {
        let cache = SumCache::new(3).unwrap();

        cache.query(10).unwrap();
        assert_eq!(cache.keys(), vec![8, 9, 10]);

        assert_eq!(cache.query(4).unwrap(), 10);
        assert_eq!(cache.stats().backward_steps(), 6);
        // 4 displaces the smallest resident key; 5..=7 are never written
        assert_eq!(cache.keys(), vec![4, 9, 10]);
        assert_eq!(cache.high_water_mark(), 10);
    }

    #[test]
    fn test_backward_result_is_reused() {
        let cache = SumCache::new(3).unwrap();

        cache.query(10).unwrap();
        cache.query(4).unwrap();
        let steps = cache.stats().arithmetic_steps();

        assert_eq!(cache.query(4).unwrap(), 10);
        assert_eq!(cache.stats().arithmetic_steps(), steps);
    }

    #[test]
    fn test_capacity_one_reassigns_anchor() {
        let cache = SumCache::new(1).unwrap();

        assert_eq!(cache.query(10).unwrap(), 55);
        assert_eq!(cache.keys(), vec![10]);

        // The old anchor is the only key that can make room
        assert_eq!(cache.query(4).unwrap(), 10);
        assert_eq!(cache.keys(), vec![4]);
        assert_eq!(cache.high_water_mark(), 4);

        assert_eq!(cache.query(6).unwrap(), 21);
        assert_eq!(cache.stats().forward_steps(), 10 + 2);
        assert_eq!(cache.high_water_mark(), 6);
    }

    #[test]
    fn test_idempotent_query() {
        let cache = SumCache::new(100).unwrap();

        let first = cache.query(42).unwrap();
        let steps = cache.stats().arithmetic_steps();
        let second = cache.query(42).unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.stats().arithmetic_steps(), steps);
    }

    #[test]
    fn test_increasing_queries_keep_largest() {
        let cache = SumCache::new(100).unwrap();

        for n in 1..=150u64 {
            assert_eq!(cache.query(n).unwrap(), oracle(n));
        }

        assert_eq!(cache.len(), 100);
        assert_eq!(cache.keys(), (51..=150).collect::<Vec<_>>());
        assert_eq!(cache.high_water_mark(), 150);

        let misses = cache.stats().misses();
        assert_eq!(cache.query(1).unwrap(), 1);
        assert_eq!(cache.stats().misses(), misses + 1);
        assert_eq!(cache.stats().backward_steps(), 149);
        assert_eq!(cache.len(), 100);
        assert!(cache.contains(1));
        assert!(!cache.contains(51));
    }

    #[test]
    fn test_large_jump_stays_bounded() {
        let cache = SumCache::new(4).unwrap();

        assert_eq!(cache.query(100_000).unwrap(), oracle(100_000));
        assert_eq!(cache.keys(), vec![99_997, 99_998, 99_999, 100_000]);
        assert_eq!(cache.stats().inserts(), 4);
    }

    #[test]
    fn test_seed_threshold() {
        let config = CacheConfig::with_capacity(10).seed_threshold(Some(1_000));
        let cache = SumCache::with_config(config).unwrap();

        assert_eq!(cache.query(500).unwrap(), oracle(500));
        assert_eq!(cache.stats().seeds(), 0);

        assert_eq!(cache.query(1_000_000).unwrap(), oracle(1_000_000));
        assert_eq!(cache.stats().seeds(), 1);
        assert_eq!(cache.stats().forward_steps(), 500 + 10);
        assert_eq!(cache.keys(), (999_991..=1_000_000).collect::<Vec<_>>());
        assert_eq!(cache.peek(999_991), Some(oracle(999_991)));
    }

    #[test]
    fn test_anchor_always_resident() {
        let cache = SumCache::new(5).unwrap();

        for n in [9u64, 3, 20, 1, 0, 7, 25, 2] {
            assert_eq!(cache.query(n).unwrap(), oracle(n));
            assert!(cache.contains(cache.high_water_mark()));
            assert!(cache.len() <= 5);
        }
    }

    #[test]
    fn test_cache_clear() {
        let cache = SumCache::new(10).unwrap();

        cache.query(50).unwrap();
        cache.clear();

        assert_eq!(cache.keys(), vec![0]);
        assert_eq!(cache.high_water_mark(), 0);
        assert_eq!(cache.stats().misses(), 0);
    }

    #[test]
    fn test_cache_as_strategy() {
        let cache = SumCache::default();
        let strategy: &dyn PrefixSum = &cache;

        assert_eq!(strategy.name(), "cached");
        assert_eq!(strategy.sum_to(100), 5050);
    }

    #[test]
    fn test_cache_shared_across_threads() {
        let cache = Arc::new(SumCache::new(32).unwrap());

        std::thread::scope(|scope| {
            for t in 0..4u64 {
                let cache = Arc::clone(&cache);
                scope.spawn(move || {
                    for i in 0..200u64 {
                        let n = (i * 7 + t * 13) % 500;
                        assert_eq!(cache.sum_to(n), oracle(n));
                    }
                });
            }
        });

        assert!(cache.len() <= 32);
        assert!(cache.contains(cache.high_water_mark()));
    }
}
