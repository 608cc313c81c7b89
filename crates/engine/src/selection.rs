//! `SelectionAdapter` — subscribes to health events, mutates
//! `ConsistentEngine`, and implements the fallback-on-error contract the
//! reverse-proxy host relies on.

use std::sync::Arc;

use hashring_concurrency::{ConsistentEngine, HashRingError, Stats};
use hashring_core::HashRingConfig;

use crate::events::{FallbackSelector, HealthEvent};

/// The host-facing facade: everything upstream of this adapter speaks in
/// node IDs and events, never in buckets.
pub struct SelectionAdapter {
    engine: ConsistentEngine,
    fallback: Arc<dyn FallbackSelector>,
}

impl SelectionAdapter {
    pub fn new(fallback: Arc<dyn FallbackSelector>) -> Self {
        Self::with_config(HashRingConfig::default(), fallback)
    }

    pub fn with_config(config: HashRingConfig, fallback: Arc<dyn FallbackSelector>) -> Self {
        Self {
            engine: ConsistentEngine::with_config(config),
            fallback,
        }
    }

    /// `healthy(id)` adds the node if absent; `unhealthy(id)` removes it if
    /// present. Idempotent — errors are logged and swallowed rather than
    /// surfaced, since the host treats events as fire-and-forget.
    pub fn on_event(&self, event: HealthEvent) {
        match event {
            HealthEvent::Healthy(id) => {
                if let Err(err) = self.engine.add_node(&id) {
                    tracing::warn!(
                        target: "hashring::selection",
                        node_id = %id,
                        error = %err,
                        "failed to add node on healthy event"
                    );
                }
            }
            HealthEvent::Unhealthy(id) => match self.engine.remove_node(&id) {
                Ok(()) => {}
                Err(HashRingError::NotFound(_)) => {}
                Err(err) => {
                    tracing::warn!(
                        target: "hashring::selection",
                        node_id = %id,
                        error = %err,
                        "failed to remove node on unhealthy event"
                    );
                }
            },
        }
    }

    /// Resolve `key` to a node ID. Invokes the fallback selector when the
    /// core reports `EmptyTopology` or `NotFound`.
    pub fn lookup(&self, key: &[u8]) -> Option<String> {
        match self.engine.lookup(key) {
            Ok(id) => Some(id),
            Err(HashRingError::EmptyTopology) | Err(HashRingError::NotFound(_)) => {
                self.invoke_fallback(key)
            }
            Err(err) => {
                tracing::warn!(
                    target: "hashring::selection",
                    error = %err,
                    "lookup reported an unexpected error, invoking fallback"
                );
                self.invoke_fallback(key)
            }
        }
    }

    fn invoke_fallback(&self, key: &[u8]) -> Option<String> {
        let topology = self.engine.topology();
        self.fallback.select(key, &topology)
    }

    pub fn topology(&self) -> Vec<String> {
        self.engine.topology()
    }

    pub fn populate_initial(&self, ids: &[String]) -> hashring_concurrency::Result<()> {
        self.engine.populate_initial(ids)
    }

    pub fn size(&self) -> u64 {
        self.engine.size()
    }

    pub fn stats(&self) -> Stats {
        self.engine.stats()
    }
}
