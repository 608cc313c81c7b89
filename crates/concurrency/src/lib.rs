//! Node-ID-facing, thread-safe layer on top of `hashring-core`.
//!
//! `Indirection` and `WeightedIndirection` give bidirectional node↔bucket
//! lookups with `dashmap`-backed lock-free reads; `ConsistentEngine` and
//! `WeightedConsistentEngine` compose those with a `MementoEngine` behind
//! a single `parking_lot::Mutex` guarding all composite mutation.

mod consistent;
mod indirection;
mod weighted;
mod weighted_consistent;

pub use consistent::{ConsistentEngine, Stats};
pub use indirection::Indirection;
pub use weighted::WeightedIndirection;
pub use weighted_consistent::WeightedConsistentEngine;

pub use hashring_core::HashRingError;

/// Re-exported so downstream crates don't need a direct `hashring-core`
/// dependency just to name this type.
pub type Result<T> = std::result::Result<T, HashRingError>;
