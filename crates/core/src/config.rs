//! Construction-time configuration for the hashing core.
//!
//! Grounded in `strata-engine::database::StrataConfig`: a plain, validated,
//! by-value struct passed into a constructor rather than threaded through
//! global state. This crate is embedded in a host process, so there is no
//! file/env loading here — the host owns that.

/// Configuration for a [`crate::BinomialEngine`] / [`crate::MementoEngine`] pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashRingConfig {
    /// MurmurHash3 seed used for the primary routing hash. Normative value
    /// is `0` — only change this for testing alternate seeds; the
    /// cross-process determinism contract binds the default-seeded path.
    pub seed: u32,
    /// How many times `BinomialEngine::get_bucket` rehashes before falling
    /// back to the minor-tree-filter path. Normative value
    /// is `4`.
    pub max_rehash_attempts: u8,
    /// Hint for the initial capacity of internal concurrent maps
    /// (`Indirection`/`WeightedIndirection`'s `DashMap`s, `Memento`'s chain
    /// table). Purely an allocation hint, rounded up to a power of two
    /// where the underlying structure requires one; has no effect on
    /// routing outcomes.
    pub initial_capacity_hint: usize,
}

impl Default for HashRingConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_rehash_attempts: 4,
            initial_capacity_hint: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_normative_values() {
        let cfg = HashRingConfig::default();
        assert_eq!(cfg.seed, 0);
        assert_eq!(cfg.max_rehash_attempts, 4);
    }
}
