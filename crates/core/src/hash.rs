//! MurmurHash3-32, the binomial-tree rehash/relocate arithmetic, and the
//! LCG `rehash` mixer. These four functions are normative: two
//! independent implementations given the same inputs MUST agree
//! bit-for-bit, since lookups cross process boundaries when cluster
//! operators debug distribution.

/// MurmurHash3 x86-32 finalizer, as specified (little-endian 4-byte chunks,
/// 1/2/3-byte tail handling per the reference algorithm).
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    const C1: u32 = 0xcc9e2d51;
    const C2: u32 = 0x1b873593;

    let mut h1 = seed;
    let chunks = data.chunks_exact(4);
    let tail = chunks.remainder();

    for chunk in chunks {
        let mut k1 = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k1 = k1.wrapping_mul(C1);
        k1 = k1.rotate_left(15);
        k1 = k1.wrapping_mul(C2);

        h1 ^= k1;
        h1 = h1.rotate_left(13);
        h1 = h1.wrapping_mul(5).wrapping_add(0xe6546b64);
    }

    let mut k1: u32 = 0;
    match tail.len() {
        3 => {
            k1 ^= (tail[2] as u32) << 16;
            k1 ^= (tail[1] as u32) << 8;
            k1 ^= tail[0] as u32;
            k1 = k1.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
            h1 ^= k1;
        }
        2 => {
            k1 ^= (tail[1] as u32) << 8;
            k1 ^= tail[0] as u32;
            k1 = k1.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
            h1 ^= k1;
        }
        1 => {
            k1 ^= tail[0] as u32;
            k1 = k1.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
            h1 ^= k1;
        }
        _ => {}
    }

    h1 ^= data.len() as u32;
    fmix32(h1)
}

fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// The Knuth-LCG-squared-then-mixed rehash: `((v * A + 1)^2 * seed) >> 32`,
/// all 64-bit wrapping arithmetic.
pub fn lcg_rehash(v: u64, seed: u64) -> u64 {
    const A: u64 = 2862933555777941757;
    let t = v.wrapping_mul(A).wrapping_add(1);
    let squared = t.wrapping_mul(t);
    squared.wrapping_mul(seed) >> 32
}

/// `0` if `i <= 0`, else `1 << (bitlen(i) - 1)` — the highest set bit of `i`.
pub(crate) fn highest_one_bit(i: u64) -> u64 {
    if i == 0 {
        0
    } else {
        1u64 << (63 - i.leading_zeros())
    }
}

/// Smallest `2^k - 1` covering `[0, size)`, with an explicit `size <= 1`
/// override (enclosing = 1, minor = 0) rather than the general formula's
/// degenerate `0` at `size == 1`.
pub(crate) fn enclosing_tree_filter(size: u64) -> u64 {
    if size <= 1 {
        1
    } else {
        size.next_power_of_two() - 1
    }
}

/// Half of [`enclosing_tree_filter`].
pub(crate) fn minor_tree_filter(size: u64) -> u64 {
    enclosing_tree_filter(size) >> 1
}

/// Roll a bucket within its binomial-tree level until it lands in a valid
/// sub-range: `if bucket < 2, return bucket`; else split the
/// bucket's level in half and recurse the hash into it.
pub(crate) fn relocate_within_level(bucket: u64, h: u64) -> u64 {
    if bucket < 2 {
        return bucket;
    }
    let level_base = highest_one_bit(bucket);
    let level_filter = level_base - 1;
    let level_hash = lcg_rehash(h, level_filter);
    let level_index = level_hash & level_filter;
    level_base + level_index
}

/// The core `get_bucket` algorithm, parameterized over an
/// already-computed 32-bit hash and a target working-set size. Shared
/// between [`crate::BinomialEngine::get_bucket`] (hash seeded with 0 over
/// the working-set's own size) and the Memento chain-walk inside
/// [`crate::MementoEngine::get_bucket`] (hash seeded with the removed
/// bucket, reduced into the replacer's recorded world size) — fixed as
/// the single, normative implementation of both.
pub(crate) fn route(h32: u32, size: u64, max_rehash_attempts: u8) -> u64 {
    if size < 2 {
        return 0;
    }

    let enclosing = enclosing_tree_filter(size);
    let minor = minor_tree_filter(size);
    let original_hash = h32 as u64;

    let mut h = original_hash;
    let mut bucket = relocate_within_level(h & enclosing, h);
    if bucket < size {
        return bucket;
    }

    for _ in 0..max_rehash_attempts {
        h = lcg_rehash(h, enclosing);
        bucket = h & enclosing;
        if bucket <= minor {
            break;
        }
        if bucket < size {
            return bucket;
        }
    }

    let bucket = original_hash & minor;
    relocate_within_level(bucket, original_hash)
}
