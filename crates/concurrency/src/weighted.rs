//! `WeightedIndirection` — the weighted-extension counterpart to
//! [`crate::Indirection`]: each node owns a `Vec` of buckets rather than
//! a single one, detached with swap-and-pop.

use dashmap::DashMap;
use hashring_core::HashRingError;

use crate::Result;

/// Maps each node to its list of buckets, plus the reverse single-bucket
/// lookup needed by `MementoEngine`-facing code.
#[derive(Default)]
pub struct WeightedIndirection {
    node_to_buckets: DashMap<String, Vec<u64>>,
    bucket_to_node: DashMap<u64, String>,
}

impl WeightedIndirection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size both underlying maps from a caller-supplied capacity hint.
    /// Purely an allocation hint; both maps still grow past it on demand.
    pub fn with_capacity_hint(hint: usize) -> Self {
        Self {
            node_to_buckets: DashMap::with_capacity(hint),
            bucket_to_node: DashMap::with_capacity(hint),
        }
    }

    /// Attach one more bucket to `id`. Fails if `bucket` is already bound
    /// to any node.
    pub fn attach(&self, id: &str, bucket: u64) -> Result<()> {
        if self.bucket_to_node.contains_key(&bucket) {
            return Err(HashRingError::DuplicateBinding {
                node_id: None,
                bucket: Some(bucket),
            });
        }
        self.node_to_buckets
            .entry(id.to_string())
            .or_default()
            .push(bucket);
        self.bucket_to_node.insert(bucket, id.to_string());
        Ok(())
    }

    /// Detach a single `bucket`, swap-and-pop from its node's bucket list.
    /// Returns the owning node ID.
    pub fn detach_bucket(&self, bucket: u64) -> Result<String> {
        let (_, id) = self
            .bucket_to_node
            .remove(&bucket)
            .ok_or_else(|| HashRingError::NotFound(bucket.to_string()))?;

        if let Some(mut buckets) = self.node_to_buckets.get_mut(&id) {
            if let Some(pos) = buckets.iter().position(|&b| b == bucket) {
                buckets.swap_remove(pos);
            }
        }
        Ok(id)
    }

    /// Detach every bucket owned by `id`, returning them in unspecified
    /// order.
    pub fn detach_all(&self, id: &str) -> Result<Vec<u64>> {
        let (_, buckets) = self
            .node_to_buckets
            .remove(id)
            .ok_or_else(|| HashRingError::NotFound(id.to_string()))?;
        for b in &buckets {
            self.bucket_to_node.remove(b);
        }
        Ok(buckets)
    }

    pub fn get_node_id(&self, bucket: u64) -> Result<String> {
        self.bucket_to_node
            .get(&bucket)
            .map(|r| r.clone())
            .ok_or_else(|| HashRingError::NotFound(bucket.to_string()))
    }

    pub fn buckets_of(&self, id: &str) -> Vec<u64> {
        self.node_to_buckets
            .get(id)
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn weight_of(&self, id: &str) -> usize {
        self.node_to_buckets.get(id).map(|r| r.len()).unwrap_or(0)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_to_buckets.contains_key(id)
    }

    pub fn has_bucket(&self, bucket: u64) -> bool {
        self.bucket_to_node.contains_key(&bucket)
    }

    pub fn all_nodes(&self) -> Vec<String> {
        self.node_to_buckets.iter().map(|r| r.key().clone()).collect()
    }

    pub fn all_buckets(&self) -> Vec<u64> {
        let mut buckets: Vec<u64> = self.bucket_to_node.iter().map(|r| *r.key()).collect();
        buckets.sort_unstable();
        buckets
    }

    pub fn len(&self) -> usize {
        self.node_to_buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_to_buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_then_detach_all() {
        let w = WeightedIndirection::new();
        w.attach("n0", 0).unwrap();
        w.attach("n0", 1).unwrap();
        w.attach("n0", 2).unwrap();
        assert_eq!(w.weight_of("n0"), 3);

        let mut buckets = w.detach_all("n0").unwrap();
        buckets.sort_unstable();
        assert_eq!(buckets, vec![0, 1, 2]);
        assert!(!w.has_node("n0"));
        assert!(!w.has_bucket(1));
    }

    #[test]
    fn detach_single_bucket_keeps_siblings() {
        let w = WeightedIndirection::new();
        w.attach("n0", 10).unwrap();
        w.attach("n0", 11).unwrap();

        assert_eq!(w.detach_bucket(10).unwrap(), "n0");
        assert!(!w.has_bucket(10));
        assert_eq!(w.buckets_of("n0"), vec![11]);
    }

    #[test]
    fn duplicate_bucket_across_nodes_rejected() {
        let w = WeightedIndirection::new();
        w.attach("n0", 0).unwrap();
        assert!(w.attach("n1", 0).is_err());
    }
}
