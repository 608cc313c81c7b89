//! `MementoEngine` — composes [`BinomialEngine`] and [`Memento`] to support
//! arbitrary-index removal via a LIFO replacement chain rooted at
//! `last_removed`.

use crate::binomial::BinomialEngine;
use crate::config::HashRingConfig;
use crate::error::{HashRingError, Result};
use crate::hash::{murmur3_32, route};
use crate::memento::Memento;

/// Owns a dense [`BinomialEngine`] plus the sparse [`Memento`] overlay, and
/// walks the replacement chain on lookups that land on a removed bucket.
pub struct MementoEngine {
    binomial: BinomialEngine,
    memento: Memento,
    /// Root of the replacement chain, or one past the last valid bucket
    /// when no removal is outstanding.
    last_removed: i64,
}

impl Default for MementoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MementoEngine {
    /// Create an empty engine using [`HashRingConfig::default`].
    pub fn new() -> Self {
        Self::with_config(HashRingConfig::default())
    }

    /// Create an empty engine with an explicit configuration.
    pub fn with_config(config: HashRingConfig) -> Self {
        let binomial = BinomialEngine::with_config(config);
        let last_removed = binomial.size() as i64;
        Self {
            binomial,
            memento: Memento::with_capacity_hint(config.initial_capacity_hint),
            last_removed,
        }
    }

    /// Number of currently-valid (non-removed) buckets.
    ///
    /// Implemented literally as `binomial.size() - memento.size()`. This is
    /// the same quantity `ConsistentEngine` calls
    /// the "working set"; it is tracked independently from
    /// `Indirection::size()` (the "topology size"), and the two are
    /// expected to agree along every path this engine exposes, but are
    /// deliberately not unified into one counter — `stats()` exposes both
    /// so a host can assert the agreement itself rather than have it
    /// hidden behind a single field.
    pub fn size(&self) -> u64 {
        self.binomial.size().saturating_sub(self.memento.size())
    }

    /// The bucket-index ceiling before any replacement-chain accounting:
    /// `binomial.size()`. Exposed for `stats()`.
    pub fn binomial_size(&self) -> u64 {
        self.binomial.size()
    }

    /// Number of entries in the replacement chain. Exposed for `stats()`.
    pub fn memento_size(&self) -> u64 {
        self.memento.size()
    }

    /// Root of the replacement chain, or the bucket ceiling if none is
    /// outstanding. Exposed for `stats()`.
    pub fn last_removed(&self) -> i64 {
        self.last_removed
    }

    /// Map `key` to a currently-live bucket, chain-walking through any
    /// removed buckets it lands on.
    pub fn get_bucket(&self, key: &[u8]) -> Result<u64> {
        let mut b = self.binomial.get_bucket(key)?;
        let mut r = self.memento.replacer(b);
        while r != -1 {
            // Seed a fresh hash with the removed bucket itself so the
            // orphaned key region lands deterministically within the
            // smaller world it once belonged to.
            let h = murmur3_32(key, b as u32);
            b = route(h, r as u64, self.binomial.config().max_rehash_attempts);
            r = self.memento.replacer(b);
        }
        Ok(b)
    }

    /// Bring a bucket back into the working set: either grow the tail (no
    /// outstanding removals) or pop the root of the replacement chain.
    /// Returns the bucket index that becomes live.
    pub fn add_bucket(&mut self) -> u64 {
        if self.memento.is_empty() {
            let b = self.binomial.add_bucket();
            self.last_removed = self.binomial.size() as i64;
            b
        } else {
            let restored = self.last_removed as u64;
            let prev_removed = self.memento.restore(restored);
            self.last_removed = prev_removed;
            restored
        }
    }

    /// Remove `bucket` from the working set, chaining it to the current
    /// tail if it isn't already the tail.
    pub fn remove_bucket(&mut self, bucket: u64) -> Result<u64> {
        let size = self.binomial.size();
        if size == 0 || bucket >= size || self.memento.replacer(bucket) != -1 {
            return Err(HashRingError::InvalidBucket(bucket));
        }

        if bucket == size - 1 {
            self.binomial.remove_bucket();
        } else {
            let replacer = size - 1;
            self.memento.remember(bucket, replacer, self.last_removed);
            self.binomial.remove_bucket();
            self.last_removed = bucket as i64;
        }
        Ok(self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_engine_errors_on_lookup() {
        let engine = MementoEngine::new();
        assert_eq!(engine.get_bucket(b"k"), Err(HashRingError::EmptyEngine));
    }

    #[test]
    fn remove_non_tail_then_lookup_never_returns_removed_bucket() {
        let mut engine = MementoEngine::new();
        for _ in 0..5 {
            engine.add_bucket();
        }
        assert_eq!(engine.size(), 5);

        engine.remove_bucket(1).unwrap();
        assert_eq!(engine.size(), 4);

        for i in 0..2000u32 {
            let b = engine.get_bucket(&i.to_le_bytes()).unwrap();
            assert_ne!(b, 1, "lookup must never resolve to a removed bucket");
        }
    }

    #[test]
    fn remove_tail_is_a_simple_pop() {
        let mut engine = MementoEngine::new();
        for _ in 0..5 {
            engine.add_bucket();
        }
        engine.remove_bucket(4).unwrap();
        assert_eq!(engine.size(), 4);
        assert_eq!(engine.memento_size(), 0);
    }

    #[test]
    fn remove_out_of_range_is_invalid() {
        let mut engine = MementoEngine::new();
        engine.add_bucket();
        assert_eq!(
            engine.remove_bucket(5),
            Err(HashRingError::InvalidBucket(5))
        );
    }

    #[test]
    fn remove_already_removed_is_invalid() {
        let mut engine = MementoEngine::new();
        for _ in 0..3 {
            engine.add_bucket();
        }
        engine.remove_bucket(0).unwrap();
        assert_eq!(
            engine.remove_bucket(0),
            Err(HashRingError::InvalidBucket(0))
        );
    }

    #[test]
    fn round_trip_remove_then_add_restores_lookups() {
        let mut engine = MementoEngine::new();
        for _ in 0..5 {
            engine.add_bucket();
        }
        let keys: Vec<u32> = (0..2000).collect();
        let before: Vec<u64> = keys
            .iter()
            .map(|k| engine.get_bucket(&k.to_le_bytes()).unwrap())
            .collect();

        engine.remove_bucket(2).unwrap();
        let restored_bucket = engine.add_bucket();
        assert_eq!(restored_bucket, 2);
        assert_eq!(engine.size(), 5);

        for (k, &prev) in keys.iter().zip(before.iter()) {
            let after = engine.get_bucket(&k.to_le_bytes()).unwrap();
            assert_eq!(after, prev, "key {k} did not return to its pre-removal bucket");
        }
    }

    #[test]
    fn memento_chain_of_two_removals_restores_in_reverse_order() {
        // Mirrors the end-to-end replacement-chain scenario at the bucket
        // level: remove two non-tail
        // buckets, then restore them in reverse order, and assert the
        // lookup map is fully restored.
        let mut engine = MementoEngine::new();
        for _ in 0..5 {
            engine.add_bucket();
        }
        let keys: Vec<u32> = (0..5000).collect();
        let before: Vec<u64> = keys
            .iter()
            .map(|k| engine.get_bucket(&k.to_le_bytes()).unwrap())
            .collect();

        engine.remove_bucket(1).unwrap();
        engine.remove_bucket(3).unwrap();
        assert_eq!(engine.size(), 3);

        for i in 0..5000u32 {
            let b = engine.get_bucket(&i.to_le_bytes()).unwrap();
            assert!(b != 1 && b != 3);
        }

        // Restore in reverse removal order (LIFO), as the chain requires.
        let restored_first = engine.add_bucket();
        assert_eq!(restored_first, 3);
        let restored_second = engine.add_bucket();
        assert_eq!(restored_second, 1);
        assert_eq!(engine.size(), 5);

        for (k, &prev) in keys.iter().zip(before.iter()) {
            let after = engine.get_bucket(&k.to_le_bytes()).unwrap();
            assert_eq!(after, prev);
        }
    }

    #[test]
    fn growth_after_drained_memento_resets_last_removed() {
        let mut engine = MementoEngine::new();
        for _ in 0..3 {
            engine.add_bucket();
        }
        engine.remove_bucket(0).unwrap();
        engine.add_bucket();
        assert!(engine.memento_size() == 0);

        let b = engine.add_bucket();
        assert_eq!(b, 3);
        assert_eq!(engine.size(), 4);
    }
}
