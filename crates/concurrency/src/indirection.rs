//! `Indirection` — a concurrent, bidirectional one-to-one map between node
//! IDs and bucket indices.
//!
//! Built as two independently lock-free `DashMap`s, one per direction,
//! with a check-then-insert
//! discipline on the write side. `ConsistentEngine` is the sole mutator of
//! both maps and already serializes writers through its own lock, so the
//! two-step put below never races against itself in practice; it is
//! written defensively regardless so this type is safe to reuse outside
//! that one caller.

use dashmap::DashMap;
use hashring_core::HashRingError;

use crate::Result;

/// Thread-safe bidirectional map between node IDs and bucket indices.
#[derive(Default)]
pub struct Indirection {
    node_to_bucket: DashMap<String, u64>,
    bucket_to_node: DashMap<u64, String>,
}

impl Indirection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size both underlying maps from a caller-supplied capacity hint.
    /// Purely an allocation hint; both maps still grow past it on demand.
    pub fn with_capacity_hint(hint: usize) -> Self {
        Self {
            node_to_bucket: DashMap::with_capacity(hint),
            bucket_to_node: DashMap::with_capacity(hint),
        }
    }

    /// Bind `id` to `bucket`. Fails if either side is already bound,
    /// leaving both maps unchanged.
    pub fn put(&self, id: &str, bucket: u64) -> Result<()> {
        if self.node_to_bucket.contains_key(id) {
            return Err(HashRingError::DuplicateBinding {
                node_id: Some(id.to_string()),
                bucket: None,
            });
        }
        if self.bucket_to_node.contains_key(&bucket) {
            return Err(HashRingError::DuplicateBinding {
                node_id: None,
                bucket: Some(bucket),
            });
        }
        self.node_to_bucket.insert(id.to_string(), bucket);
        self.bucket_to_node.insert(bucket, id.to_string());
        Ok(())
    }

    /// Remove both sides of the binding for `id`, returning its bucket.
    pub fn remove_by_node(&self, id: &str) -> Result<u64> {
        let (_, bucket) = self
            .node_to_bucket
            .remove(id)
            .ok_or_else(|| HashRingError::NotFound(id.to_string()))?;
        self.bucket_to_node.remove(&bucket);
        Ok(bucket)
    }

    /// Remove both sides of the binding for `bucket`, returning its node ID.
    pub fn remove_by_bucket(&self, bucket: u64) -> Result<String> {
        let (_, id) = self
            .bucket_to_node
            .remove(&bucket)
            .ok_or_else(|| HashRingError::NotFound(bucket.to_string()))?;
        self.node_to_bucket.remove(&id);
        Ok(id)
    }

    pub fn get_bucket(&self, id: &str) -> Result<u64> {
        self.node_to_bucket
            .get(id)
            .map(|r| *r)
            .ok_or_else(|| HashRingError::NotFound(id.to_string()))
    }

    pub fn get_node_id(&self, bucket: u64) -> Result<String> {
        self.bucket_to_node
            .get(&bucket)
            .map(|r| r.clone())
            .ok_or_else(|| HashRingError::NotFound(bucket.to_string()))
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_to_bucket.contains_key(id)
    }

    pub fn has_bucket(&self, bucket: u64) -> bool {
        self.bucket_to_node.contains_key(&bucket)
    }

    /// All bound node IDs, in unspecified order.
    pub fn all_nodes(&self) -> Vec<String> {
        self.node_to_bucket.iter().map(|r| r.key().clone()).collect()
    }

    /// All bound bucket indices, sorted ascending so the fallback-selection
    /// path in `ConsistentEngine::lookup` is deterministic.
    pub fn all_buckets(&self) -> Vec<u64> {
        let mut buckets: Vec<u64> = self.bucket_to_node.iter().map(|r| *r.key()).collect();
        buckets.sort_unstable();
        buckets
    }

    pub fn len(&self) -> usize {
        self.node_to_bucket.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_to_bucket.is_empty()
    }
}
