//! Health events and the fallback-selection contract consumed from the
//! host.

/// A topology-change event delivered by the host's health-check source.
/// Delivery is synchronous and may be re-ordered relative to request
/// traffic; handlers must be idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    Healthy(String),
    Unhealthy(String),
}

/// Invoked when the core reports `EmptyTopology` or `NotFound` for a
/// lookup. Given the request's routing key and the current topology
/// (node IDs, order unspecified), returns a node to use instead, or
/// `None` if no upstream is available at all.
pub trait FallbackSelector: Send + Sync {
    fn select(&self, key: &[u8], topology: &[String]) -> Option<String>;
}
