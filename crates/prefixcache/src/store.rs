//! Bounded entry store
//!
//! Evicts by key magnitude: when over capacity, the smallest keys go first.
//! This is not LRU; it assumes queries trend toward larger n.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use ahash::RandomState;

/// Map of n -> sum(1..=n) that can be pruned back to a fixed capacity
pub struct BoundedStore {
    map: HashMap<u64, u128, RandomState>,
    capacity: usize,
}

impl BoundedStore {
    /// Create an empty store holding at most `capacity` entries after pruning
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");

        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            capacity,
        }
    }

    /// Get the total for `n`
    pub fn get(&self, n: u64) -> Option<u128> {
        self.map.get(&n).copied()
    }

    /// Check whether `n` is present
    pub fn contains(&self, n: u64) -> bool {
        self.map.contains_key(&n)
    }

    /// Insert an entry unless the key is already present
    ///
    /// Entries are immutable once written. Returns true if the entry is new.
    pub fn insert(&mut self, n: u64, total: u128) -> bool {
        match self.map.entry(n) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(total);
                true
            }
        }
    }

    /// Evict the smallest keys until the store is back within capacity
    ///
    /// The entry for `keep` is never evicted, even when it is the smallest.
    /// Returns the number of evicted entries.
    pub fn prune(&mut self, keep: u64) -> usize {
        let excess = self.map.len().saturating_sub(self.capacity);
        if excess == 0 {
            return 0;
        }

        let mut keys: Vec<u64> = self.map.keys().copied().filter(|&n| n != keep).collect();
        // Partition so the `excess` smallest keys sit at the front
        keys.select_nth_unstable(excess - 1);
        for key in &keys[..excess] {
            self.map.remove(key);
        }

        excess
    }

    /// Entry with the largest key
    pub fn max_entry(&self) -> Option<(u64, u128)> {
        self.map
            .iter()
            .max_by_key(|(n, _)| **n)
            .map(|(n, total)| (*n, *total))
    }

    /// All keys in ascending order
    pub fn keys(&self) -> Vec<u64> {
        let mut keys: Vec<u64> = self.map.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get the capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
