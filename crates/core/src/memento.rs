//! `Memento` — a replacement-set table that lifts `BinomialEngine` to
//! support arbitrary-index removals.
//!
//! Implements the simplest workable concurrency shape: a single
//! `parking_lot::RwLock` guarding a chained hash table. Readers never see
//! a torn or cyclic chain because no reader is ever let into a table
//! mid-mutation; this trades a lock-free-reader design for an
//! implementation with no unsafe code and no manual reclamation scheme.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

const MIN_CAPACITY: usize = 1 << 4;
const MAX_CAPACITY: usize = 1 << 30;
const LOAD_FACTOR_NUM: usize = 3;
const LOAD_FACTOR_DEN: usize = 4;

#[derive(Debug, Clone, Copy)]
struct MementoEntry {
    bucket: u64,
    replacer: u64,
    prev_removed: i64,
}

fn hash_bucket(bucket: u64) -> u64 {
    bucket ^ (bucket >> 16)
}

fn slot(bucket: u64, capacity: usize) -> usize {
    (hash_bucket(bucket) as usize) & (capacity - 1)
}

struct MementoTable {
    chains: Vec<Vec<MementoEntry>>,
}

impl MementoTable {
    fn new(capacity: usize) -> Self {
        Self {
            chains: vec![Vec::new(); capacity],
        }
    }

    fn capacity(&self) -> usize {
        self.chains.len()
    }

    fn find(&self, bucket: u64) -> Option<&MementoEntry> {
        let idx = slot(bucket, self.capacity());
        self.chains[idx].iter().find(|e| e.bucket == bucket)
    }

    fn insert(&mut self, entry: MementoEntry) {
        let idx = slot(entry.bucket, self.capacity());
        self.chains[idx].push(entry);
    }

    fn remove(&mut self, bucket: u64) -> Option<MementoEntry> {
        let idx = slot(bucket, self.capacity());
        let chain = &mut self.chains[idx];
        let pos = chain.iter().position(|e| e.bucket == bucket)?;
        Some(chain.swap_remove(pos))
    }

    fn resized_to(&self, new_capacity: usize) -> Self {
        let mut table = MementoTable::new(new_capacity);
        for chain in &self.chains {
            for entry in chain {
                table.insert(*entry);
            }
        }
        table
    }
}

/// The replacement-set table: records, per removed bucket, the bucket
/// that replaced it.
pub struct Memento {
    table: RwLock<MementoTable>,
    len: AtomicU64,
}

impl Default for Memento {
    fn default() -> Self {
        Self::new()
    }
}

impl Memento {
    /// Create an empty table at the minimum capacity.
    pub fn new() -> Self {
        Self::with_capacity_hint(MIN_CAPACITY)
    }

    /// Create an empty table sized from a caller-supplied capacity hint,
    /// rounded up to the nearest power of two and clamped to
    /// `[MIN_CAPACITY, MAX_CAPACITY]`. Purely an allocation-sizing hint —
    /// the table still grows and shrinks under the same load factor either
    /// way.
    pub fn with_capacity_hint(hint: usize) -> Self {
        let capacity = hint.max(1).next_power_of_two().clamp(MIN_CAPACITY, MAX_CAPACITY);
        Self {
            table: RwLock::new(MementoTable::new(capacity)),
            len: AtomicU64::new(0),
        }
    }

    /// Number of distinct removed buckets currently tracked. O(1), never
    /// blocks on the table lock.
    pub fn size(&self) -> u64 {
        self.len.load(Ordering::Acquire)
    }

    /// Whether the table holds no entries. O(1), never blocks.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Record that `bucket` was removed and replaced by `replacer`, with
    /// `prev_removed` pointing at the previously-most-recent removal (or
    /// `-1` if none). Returns `bucket`. Caller must not remember an
    /// already-remembered bucket.
    pub fn remember(&self, bucket: u64, replacer: u64, prev_removed: i64) -> u64 {
        let mut table = self.table.write();
        debug_assert!(
            table.find(bucket).is_none(),
            "remember called on an already-removed bucket"
        );
        table.insert(MementoEntry {
            bucket,
            replacer,
            prev_removed,
        });
        self.len.fetch_add(1, Ordering::AcqRel);

        let cap = table.capacity();
        let len = self.len.load(Ordering::Acquire) as usize;
        if len * LOAD_FACTOR_DEN > cap * LOAD_FACTOR_NUM && cap < MAX_CAPACITY {
            let new_cap = cap * 2;
            *table = table.resized_to(new_cap);
        }
        bucket
    }

    /// The bucket that replaced `bucket` at removal time, or `-1` if
    /// `bucket` is not currently removed. Safe to call concurrently with
    /// `remember`/`restore` — blocks only for the duration of the read
    /// lock, never on a resize longer than the copy itself.
    pub fn replacer(&self, bucket: u64) -> i64 {
        let table = self.table.read();
        match table.find(bucket) {
            Some(entry) => entry.replacer as i64,
            None => -1,
        }
    }

    /// Restore the most recent removal by popping `bucket`'s entry.
    /// Returns the removed entry's `prev_removed`. By convention: if the
    /// table is empty, or `bucket` is not present, returns `bucket + 1`
    /// rather than erroring — `MementoEngine` uses this to (re)initialize
    /// `last_removed` when there is no history.
    pub fn restore(&self, bucket: u64) -> i64 {
        let mut table = self.table.write();
        if self.len.load(Ordering::Acquire) == 0 {
            return bucket as i64 + 1;
        }
        let Some(entry) = table.remove(bucket) else {
            return bucket as i64 + 1;
        };
        self.len.fetch_sub(1, Ordering::AcqRel);

        let cap = table.capacity();
        let len = self.len.load(Ordering::Acquire) as usize;
        let shrink_threshold = ((cap / 4) * 3) / 4;
        if len <= shrink_threshold && cap > MIN_CAPACITY {
            let new_cap = (cap / 2).max(MIN_CAPACITY);
            *table = table.resized_to(new_cap);
        }
        entry.prev_removed
    }
}
