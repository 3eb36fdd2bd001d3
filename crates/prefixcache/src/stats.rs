//! Cache statistics tracking

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Statistics for cache performance tracking
///
/// `forward_steps` and `backward_steps` count single additions and
/// subtractions, so they measure the work each query actually did.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    inserts: AtomicU64,
    forward_steps: AtomicU64,
    backward_steps: AtomicU64,
    seeds: AtomicU64,
    invalid_inputs: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Queries answered straight from the store
    pub hits: u64,
    /// Queries that had to extend from the anchor
    pub misses: u64,
    /// Entries removed by pruning
    pub evictions: u64,
    /// Entries written
    pub inserts: u64,
    /// Additions performed by forward extension
    pub forward_steps: u64,
    /// Subtractions performed by backward extension
    pub backward_steps: u64,
    /// Forward extensions that started from the closed form
    pub seeds: u64,
    /// Queries rejected or zeroed by input validation
    pub invalid_inputs: u64,
}

impl CacheStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record evicted entries
    pub fn record_evictions(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    /// Record written entries
    pub fn record_inserts(&self, count: u64) {
        self.inserts.fetch_add(count, Ordering::Relaxed);
    }

    /// Record additions done walking forward
    pub fn record_forward_steps(&self, steps: u64) {
        self.forward_steps.fetch_add(steps, Ordering::Relaxed);
    }

    /// Record subtractions done walking backward
    pub fn record_backward_steps(&self, steps: u64) {
        self.backward_steps.fetch_add(steps, Ordering::Relaxed);
    }

    /// Record a closed-form seed
    pub fn record_seed(&self) {
        self.seeds.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an invalid input
    pub fn record_invalid_input(&self) {
        self.invalid_inputs.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Get total misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Get total evictions
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Get total inserts
    pub fn inserts(&self) -> u64 {
        self.inserts.load(Ordering::Relaxed)
    }

    /// Get total forward steps
    pub fn forward_steps(&self) -> u64 {
        self.forward_steps.load(Ordering::Relaxed)
    }

    /// Get total backward steps
    pub fn backward_steps(&self) -> u64 {
        self.backward_steps.load(Ordering::Relaxed)
    }

    /// Get total closed-form seeds
    pub fn seeds(&self) -> u64 {
        self.seeds.load(Ordering::Relaxed)
    }

    /// Get total invalid inputs
    pub fn invalid_inputs(&self) -> u64 {
        self.invalid_inputs.load(Ordering::Relaxed)
    }

    /// Forward plus backward steps
    pub fn arithmetic_steps(&self) -> u64 {
        self.forward_steps() + self.backward_steps()
    }

    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Copy all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits(),
            misses: self.misses(),
            evictions: self.evictions(),
            inserts: self.inserts(),
            forward_steps: self.forward_steps(),
            backward_steps: self.backward_steps(),
            seeds: self.seeds(),
            invalid_inputs: self.invalid_inputs(),
        }
    }

    /// Reset all statistics
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.inserts.store(0, Ordering::Relaxed);
        self.forward_steps.store(0, Ordering::Relaxed);
        self.backward_steps.store(0, Ordering::Relaxed);
        self.seeds.store(0, Ordering::Relaxed);
        self.invalid_inputs.store(0, Ordering::Relaxed);
    }
}
