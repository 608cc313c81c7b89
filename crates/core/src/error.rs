//! Error types for the hashing core.
//!
//! Mirrors the rest of the workspace: a single `thiserror`-derived enum and
//! a `Result<T>` alias. The core never panics — every failure mode named in
//! the component contracts below has a variant here.

use thiserror::Error;

/// Result type alias for hashring operations.
pub type Result<T> = std::result::Result<T, HashRingError>;

/// Error types for the consistent hashing engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashRingError {
    /// Lookup attempted on a `BinomialEngine`/`MementoEngine` with no buckets.
    #[error("lookup attempted on an engine with no buckets")]
    EmptyEngine,

    /// Lookup attempted with no nodes in the topology.
    #[error("lookup attempted with no nodes in the topology")]
    EmptyTopology,

    /// A node or bucket lookup missed.
    #[error("not found: {0}")]
    NotFound(String),

    /// `Indirection::put` where either side of the binding already exists.
    #[error("binding already exists for node {node_id:?} or bucket {bucket:?}")]
    DuplicateBinding {
        /// The node ID already bound, if that side collided.
        node_id: Option<String>,
        /// The bucket already bound, if that side collided.
        bucket: Option<u64>,
    },

    /// `MementoEngine::remove_bucket` for an out-of-range or already-removed bucket.
    #[error("invalid bucket index {0}: out of range or already removed")]
    InvalidBucket(u64),
}

impl HashRingError {
    /// Whether this error should be handled by invoking the host's fallback
    /// selector rather than propagated as a hard failure.
    pub fn is_retryable_by_fallback(&self) -> bool {
        matches!(self, HashRingError::EmptyTopology | HashRingError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_engine_displays() {
        let err = HashRingError::EmptyEngine;
        assert!(err.to_string().contains("no buckets"));
    }

    #[test]
    fn not_found_carries_message() {
        let err = HashRingError::NotFound("node-7".to_string());
        assert!(err.to_string().contains("node-7"));
    }

    #[test]
    fn fallback_classification() {
        assert!(HashRingError::EmptyTopology.is_retryable_by_fallback());
        assert!(HashRingError::NotFound("x".into()).is_retryable_by_fallback());
        assert!(!HashRingError::EmptyEngine.is_retryable_by_fallback());
        assert!(!HashRingError::InvalidBucket(3).is_retryable_by_fallback());
    }
}
