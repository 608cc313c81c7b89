//! `BinomialEngine` — an O(1) key→bucket hash over a contiguous bucket
//! range `[0, n)` that supports only append / pop-last on its bucket array.

use crate::config::HashRingConfig;
use crate::error::{HashRingError, Result};
use crate::hash::{enclosing_tree_filter, minor_tree_filter, murmur3_32, route};

/// The dense, LIFO-growable bucket-index space: append-only growth,
/// pop-only shrinkage.
///
/// Holds no bucket contents — only `size` and the config needed to
/// reproduce the two derived bitmask filters. Filters are recomputed from
/// `size` on demand rather than cached, so there is no staleness to
/// manage across add/remove.
#[derive(Debug, Clone)]
pub struct BinomialEngine {
    size: u64,
    config: HashRingConfig,
}

impl Default for BinomialEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BinomialEngine {
    /// Create an empty engine using [`HashRingConfig::default`].
    pub fn new() -> Self {
        Self::with_config(HashRingConfig::default())
    }

    /// Create an empty engine with an explicit configuration.
    pub fn with_config(config: HashRingConfig) -> Self {
        Self { size: 0, config }
    }

    /// Current working-set size.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The configuration this engine was constructed with.
    pub fn config(&self) -> HashRingConfig {
        self.config
    }

    /// `2^ceil(log2 size) - 1`, with the explicit `size <= 1` override below.
    pub fn enclosing_tree_filter(&self) -> u64 {
        enclosing_tree_filter(self.size)
    }

    /// Half of [`Self::enclosing_tree_filter`].
    pub fn minor_tree_filter(&self) -> u64 {
        minor_tree_filter(self.size)
    }

    /// Map `key` to a bucket in `[0, size)`. Deterministic, collision
    /// resistant, O(1). Fails with [`HashRingError::EmptyEngine`] if
    /// `size() == 0`.
    pub fn get_bucket(&self, key: &[u8]) -> Result<u64> {
        if self.size == 0 {
            return Err(HashRingError::EmptyEngine);
        }
        let h = murmur3_32(key, self.config.seed);
        Ok(route(h, self.size, self.config.max_rehash_attempts))
    }

    /// Append a new tail bucket, returning its index (`size` before the
    /// increment).
    pub fn add_bucket(&mut self) -> u64 {
        let b = self.size;
        self.size += 1;
        b
    }

    /// Pop the tail bucket, returning the new size. A no-op (returns `0`)
    /// if already empty — callers are expected to have checked `size()`
    /// first.
    pub fn remove_bucket(&mut self) -> u64 {
        self.size = self.size.saturating_sub(1);
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_engine_errors() {
        let engine = BinomialEngine::new();
        assert_eq!(engine.get_bucket(b"k"), Err(HashRingError::EmptyEngine));
    }

    #[test]
    fn single_bucket_always_routes_to_zero() {
        let mut engine = BinomialEngine::new();
        engine.add_bucket();
        for i in 0..100u32 {
            assert_eq!(engine.get_bucket(&i.to_le_bytes()).unwrap(), 0);
        }
    }

    #[test]
    fn add_bucket_is_monotonic_index() {
        let mut engine = BinomialEngine::new();
        assert_eq!(engine.add_bucket(), 0);
        assert_eq!(engine.add_bucket(), 1);
        assert_eq!(engine.add_bucket(), 2);
        assert_eq!(engine.size(), 3);
    }

    #[test]
    fn remove_bucket_shrinks_size() {
        let mut engine = BinomialEngine::new();
        for _ in 0..5 {
            engine.add_bucket();
        }
        assert_eq!(engine.remove_bucket(), 4);
        assert_eq!(engine.size(), 4);
    }

    #[test]
    fn get_bucket_always_in_range() {
        let mut engine = BinomialEngine::new();
        for n in 1..=64u64 {
            engine.add_bucket();
            for i in 0..500u32 {
                let b = engine.get_bucket(&i.to_le_bytes()).unwrap();
                assert!(b < n, "size={n} produced out-of-range bucket {b}");
            }
        }
    }

    #[test]
    fn growth_only_adds_keys_to_new_tail() {
        // Monotonicity: growing by one bucket must not
        // move any key between two *pre-existing* buckets.
        let mut engine = BinomialEngine::new();
        for _ in 0..10 {
            engine.add_bucket();
        }
        let keys: Vec<u32> = (0..5000).collect();
        let before: Vec<u64> = keys
            .iter()
            .map(|k| engine.get_bucket(&k.to_le_bytes()).unwrap())
            .collect();

        let new_bucket = engine.add_bucket();
        for (k, &prev) in keys.iter().zip(before.iter()) {
            let after = engine.get_bucket(&k.to_le_bytes()).unwrap();
            assert!(
                after == prev || after == new_bucket,
                "key {k} moved from {prev} to {after}, neither unchanged nor the new bucket"
            );
        }
    }
}
