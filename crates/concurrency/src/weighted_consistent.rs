//! `WeightedConsistentEngine` — the weighted counterpart to
//! [`crate::ConsistentEngine`]: each node owns a configurable number of
//! buckets instead of exactly one.

use parking_lot::Mutex;

use hashring_core::{HashRingConfig, HashRingError, MementoEngine};

use crate::weighted::WeightedIndirection;
use crate::{consistent::Stats, Result};

pub struct WeightedConsistentEngine {
    engine: Mutex<MementoEngine>,
    indirection: WeightedIndirection,
}

impl Default for WeightedConsistentEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl WeightedConsistentEngine {
    pub fn new() -> Self {
        Self::with_config(HashRingConfig::default())
    }

    pub fn with_config(config: HashRingConfig) -> Self {
        Self {
            engine: Mutex::new(MementoEngine::with_config(config)),
            indirection: WeightedIndirection::with_capacity_hint(config.initial_capacity_hint),
        }
    }

    fn attach_one_bucket(&self, id: &str) -> Result<u64> {
        let mut engine = self.engine.lock();
        let bucket = engine.add_bucket();
        if let Err(err) = self.indirection.attach(id, bucket) {
            if let Err(rollback_err) = engine.remove_bucket(bucket) {
                tracing::warn!(
                    target: "hashring::weighted_consistent",
                    node_id = id,
                    bucket,
                    error = %rollback_err,
                    "rollback failed after indirection.attach rejected the binding"
                );
            }
            return Err(err);
        }
        Ok(bucket)
    }

    /// Attach `weight` additional buckets to `id` in one burst. For
    /// distributing a whole cluster's worth of weighted nodes at once,
    /// prefer [`Self::populate_initial`], which interleaves nodes round-
    /// robin instead of filling one node's buckets before moving to the
    /// next.
    pub fn add_weighted_node(&self, id: &str, weight: u32) -> Result<()> {
        for _ in 0..weight {
            self.attach_one_bucket(id)?;
        }
        tracing::debug!(target: "hashring::weighted_consistent", node_id = id, weight, "weighted node added");
        Ok(())
    }

    pub fn remove_weighted_node(&self, id: &str) -> Result<()> {
        let mut engine = self.engine.lock();
        let mut buckets = self.indirection.detach_all(id)?;
        // Highest bucket index first: MementoEngine's remove_bucket treats
        // its own current tail as the simple case, so draining top-down
        // keeps most of these removals on that path instead of growing the
        // replacement chain for buckets we're about to discard anyway.
        buckets.sort_unstable_by(|a, b| b.cmp(a));
        for bucket in buckets {
            engine.remove_bucket(bucket)?;
        }
        tracing::debug!(target: "hashring::weighted_consistent", node_id = id, "weighted node removed");
        Ok(())
    }

    /// Bulk-populate at startup using weighted round-robin: one bucket per
    /// node per round, so no single node's whole weight lands contiguously
    /// before its peers get any buckets at all.
    pub fn populate_initial(&self, nodes: &[(String, u32)]) -> Result<()> {
        let max_weight = nodes.iter().map(|(_, w)| *w).max().unwrap_or(0);
        for round in 0..max_weight {
            for (id, weight) in nodes {
                if round < *weight {
                    self.attach_one_bucket(id)?;
                }
            }
        }
        Ok(())
    }

    pub fn lookup(&self, key: &[u8]) -> Result<String> {
        let engine = self.engine.lock();
        if engine.size() == 0 {
            return Err(HashRingError::EmptyTopology);
        }
        let bucket = engine.get_bucket(key)?;
        drop(engine);

        if self.indirection.has_bucket(bucket) {
            return self.indirection.get_node_id(bucket);
        }
        self.fallback_lookup(key)
    }

    fn fallback_lookup(&self, key: &[u8]) -> Result<String> {
        let all = self.indirection.all_buckets();
        if all.is_empty() {
            return Err(HashRingError::EmptyTopology);
        }
        let idx = (djb2(key) as usize) % all.len();
        self.indirection.get_node_id(all[idx])
    }

    pub fn topology(&self) -> Vec<String> {
        self.indirection.all_nodes()
    }

    pub fn weight_of(&self, id: &str) -> usize {
        self.indirection.weight_of(id)
    }

    pub fn size(&self) -> u64 {
        self.engine.lock().size()
    }

    pub fn stats(&self) -> Stats {
        let engine = self.engine.lock();
        Stats {
            working_set: engine.size(),
            memento_size: engine.memento_size(),
            topology_size: self.indirection.len() as u64,
            last_removed: engine.last_removed(),
        }
    }
}

fn djb2(data: &[u8]) -> u64 {
    let mut hash: u64 = 5381;
    for &b in data {
        hash = hash.wrapping_mul(33).wrapping_add(b as u64);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_node_gets_proportional_buckets() {
        let engine = WeightedConsistentEngine::new();
        engine.add_weighted_node("big", 4).unwrap();
        engine.add_weighted_node("small", 1).unwrap();
        assert_eq!(engine.weight_of("big"), 4);
        assert_eq!(engine.weight_of("small"), 1);
        assert_eq!(engine.size(), 5);
    }

    #[test]
    fn populate_initial_interleaves_rounds() {
        let engine = WeightedConsistentEngine::new();
        let nodes = vec![("a".to_string(), 3u32), ("b".to_string(), 1u32)];
        engine.populate_initial(&nodes).unwrap();
        assert_eq!(engine.weight_of("a"), 3);
        assert_eq!(engine.weight_of("b"), 1);
        assert_eq!(engine.size(), 4);
    }

    #[test]
    fn remove_weighted_node_frees_all_its_buckets() {
        let engine = WeightedConsistentEngine::new();
        engine.add_weighted_node("n0", 3).unwrap();
        engine.add_weighted_node("n1", 2).unwrap();
        engine.remove_weighted_node("n0").unwrap();
        assert_eq!(engine.size(), 2);
        assert_eq!(engine.weight_of("n0"), 0);

        for i in 0..2000u32 {
            let n = engine.lookup(&i.to_le_bytes()).unwrap();
            assert_eq!(n, "n1");
        }
    }
}
