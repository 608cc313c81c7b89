//! `ConsistentEngine` — the external node-ID-facing API: `add_node`,
//! `remove_node`, `lookup`, plus the introspection surface a host uses
//! to observe topology state.

use parking_lot::Mutex;

use hashring_core::{HashRingConfig, HashRingError, MementoEngine};

use crate::indirection::Indirection;
use crate::Result;

/// Snapshot of internal counters for `stats()`. `working_set` and
/// `topology_size` are read from two independently-tracked sources
/// (`MementoEngine::size` and `Indirection::len`) rather than unified into
/// one field — see `MementoEngine::size` for why that divergence is
/// tolerated rather than collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub working_set: u64,
    pub memento_size: u64,
    pub topology_size: u64,
    pub last_removed: i64,
}

/// A single `parking_lot::Mutex<MementoEngine>` is the serialization point
/// for every composite mutation and every lookup. Readers briefly contend
/// with writers rather than running fully unsynchronized, in exchange for
/// a trivially-correct ordering guarantee and no epoch reclamation scheme
/// to build.
pub struct ConsistentEngine {
    engine: Mutex<MementoEngine>,
    indirection: Indirection,
}

impl Default for ConsistentEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsistentEngine {
    pub fn new() -> Self {
        Self::with_config(HashRingConfig::default())
    }

    pub fn with_config(config: HashRingConfig) -> Self {
        Self {
            engine: Mutex::new(MementoEngine::with_config(config)),
            indirection: Indirection::with_capacity_hint(config.initial_capacity_hint),
        }
    }

    /// Idempotent: a no-op if `id` is already present.
    pub fn add_node(&self, id: &str) -> Result<()> {
        let mut engine = self.engine.lock();
        if self.indirection.has_node(id) {
            return Ok(());
        }
        let bucket = engine.add_bucket();
        if let Err(err) = self.indirection.put(id, bucket) {
            if let Err(rollback_err) = engine.remove_bucket(bucket) {
                tracing::warn!(
                    target: "hashring::consistent",
                    node_id = id,
                    bucket,
                    error = %rollback_err,
                    "rollback of add_node failed after indirection.put rejected the binding"
                );
            }
            return Err(err);
        }
        tracing::debug!(target: "hashring::consistent", node_id = id, bucket, "node added");
        Ok(())
    }

    /// `NotFound` if `id` is not currently present.
    pub fn remove_node(&self, id: &str) -> Result<()> {
        let mut engine = self.engine.lock();
        let bucket = self.indirection.get_bucket(id)?;
        self.indirection.remove_by_node(id)?;
        engine.remove_bucket(bucket)?;
        tracing::debug!(target: "hashring::consistent", node_id = id, bucket, "node removed");
        Ok(())
    }

    /// Resolve `key` to its current node, falling back to a deterministic
    /// secondary selection if the bucket MementoEngine names has not yet
    /// been bound in `Indirection` yet.
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

    /// Bulk-add at startup. Stops at the first failure; partial progress
    /// is left in place, matching `add_node`'s own idempotence.
    pub fn populate_initial(&self, ids: &[String]) -> Result<()> {
        for id in ids {
            self.add_node(id)?;
        }
        Ok(())
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
