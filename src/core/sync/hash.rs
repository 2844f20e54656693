/*!
 * Hash Spreading
 *
 * Maps key hashes onto a bounded shard index. The raw hash is passed
 * through a fixed XOR/shift/add avalanche before the modulo so that
 * low-entropy hashes (sequential integers, values sharing their low bits)
 * still land evenly across shards.
 */

use ahash::RandomState;
use std::hash::{BuildHasher, Hash};

/// Fold a 64-bit hash to 32 bits and avalanche it
///
/// Every input bit affects every output bit, so keys that differ only in
/// their high bits still pick different shards.
#[inline]
pub const fn spread(hash: u64) -> u32 {
    let mut h = (hash ^ (hash >> 32)) as u32;
    h = h.wrapping_add((h << 15) ^ 0xffff_cd7d);
    h ^= h >> 10;
    h = h.wrapping_add(h << 3);
    h ^= h >> 6;
    h = h.wrapping_add((h << 2).wrapping_add(h << 14));
    h ^ (h >> 16)
}

/// Shard index in `[0, shard_count)` for an already computed hash
///
/// # Panics
///
/// Panics if `shard_count` is zero.
#[inline]
pub fn shard_for_hash(hash: u64, shard_count: usize) -> usize {
    assert!(shard_count > 0, "Shard count must be at least 1");
    // Unsigned arithmetic: the result can never be negative
    spread(hash) as usize % shard_count
}

/// Hashes keys and routes them to shards
///
/// Deterministic for the life of an instance: equal keys always map to the
/// same shard. Two instances built with `RandomState::new()` use different
/// seeds and may route the same key differently.
#[derive(Debug, Clone, Default)]
pub struct HashSpreader<S = RandomState> {
    build_hasher: S,
}

impl HashSpreader<RandomState> {
    /// Spreader over a freshly seeded `ahash` state
    pub fn new() -> Self {
        Self {
            build_hasher: RandomState::new(),
        }
    }
}

impl<S: BuildHasher> HashSpreader<S> {
    /// Spreader over a caller-supplied hash builder
    pub fn with_hasher(build_hasher: S) -> Self {
        Self { build_hasher }
    }

    /// Raw (un-spread) hash of a key
    #[inline]
    pub fn hash_key<K: Hash + ?Sized>(&self, key: &K) -> u64 {
        self.build_hasher.hash_one(key)
    }

    /// Shard index in `[0, shard_count)` for a key
    #[inline]
    pub fn shard_index<K: Hash + ?Sized>(&self, key: &K, shard_count: usize) -> usize {
        shard_for_hash(self.hash_key(key), shard_count)
    }

    /// The underlying hash builder
    pub fn hasher(&self) -> &S {
        &self.build_hasher
    }
}
