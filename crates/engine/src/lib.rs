//! The host-facing adapter: health events in, node IDs out, fallback on
//! error.

mod events;
mod selection;

pub use events::{FallbackSelector, HealthEvent};
pub use selection::SelectionAdapter;

pub use hashring_concurrency::{ConsistentEngine, Indirection, Stats, WeightedConsistentEngine, WeightedIndirection};
pub use hashring_core::{BinomialEngine, HashRingConfig, HashRingError, Memento, MementoEngine, Result};
