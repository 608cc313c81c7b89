//! # hashring
//!
//! A consistent hashing engine for stateful request routing, embedded
//! inside a reverse-proxy load-balancer's selection policy.
//!
//! Given a request key and a dynamic set of backend nodes, `hashring`
//! deterministically maps the key to exactly one currently-present node
//! such that (a) the key distribution is near-uniform, (b) adding a node
//! moves only keys onto the new node, and (c) removing a node moves only
//! keys that were on it. It is built to serve millions of read-side
//! lookups per second between rare topology-change events.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use hashring::{FallbackSelector, HealthEvent, SelectionAdapter};
//!
//! struct FirstAvailable;
//! impl FallbackSelector for FirstAvailable {
//!     fn select(&self, _key: &[u8], topology: &[String]) -> Option<String> {
//!         topology.first().cloned()
//!     }
//! }
//!
//! let adapter = SelectionAdapter::new(Arc::new(FirstAvailable));
//! adapter.populate_initial(&["node-a".into(), "node-b".into(), "node-c".into()]).unwrap();
//!
//! // Steady-state lookups.
//! let node = adapter.lookup(b"session-42").expect("topology is non-empty");
//!
//! // Health events mutate the topology; idempotent, safe to replay.
//! adapter.on_event(HealthEvent::Unhealthy("node-b".into()));
//! adapter.on_event(HealthEvent::Healthy("node-b".into()));
//! # let _ = node;
//! ```
//!
//! # Layers
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | `hashring-core` | `BinomialEngine`, `Memento`, `MementoEngine` — pure bucket-index hashing, no concurrency, no node IDs |
//! | `hashring-concurrency` | `Indirection`, `ConsistentEngine` and their weighted counterparts — node-ID-facing, thread-safe |
//! | `hashring-adapter` | `SelectionAdapter` — health events in, node IDs out, fallback on error |
//!
//! Only the re-exports below are a stable surface; the sub-crates are
//! implementation details of this facade.

pub use hashring_adapter::{
    BinomialEngine, ConsistentEngine, FallbackSelector, HashRingConfig, HashRingError,
    HealthEvent, Indirection, Memento, MementoEngine, Result, SelectionAdapter, Stats,
    WeightedConsistentEngine, WeightedIndirection,
};
