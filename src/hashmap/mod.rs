// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Open-chained hash map, power-of-two sized with load-factor resize.
//!
//! Reused three ways in liteDB: as the primary keyspace
//! (`HashMap<Vec<u8>, Value>`), as the storage behind `HSET`
//! (`HashMap<Vec<u8>, Vec<u8>>`), and as the name→score index inside a
//! sorted set (`HashMap<Vec<u8>, f32>`) — the same reuse the reference
//! makes of a single `hashTable.c` across the primary table and `ZSet`.
//!
//! ## Architecture
//!
//! ```text
//! buckets: Vec<Vec<Entry<K, V>>>   (length always a power of two)
//! index = hash(key) & (capacity - 1)
//! ```
//!
//! Each bucket is a small `Vec` acting as the hash chain described in the
//! spec; unlike the reference's singly linked list of heap nodes, a `Vec`
//! chain is cache-friendly and needs no manual free list, while preserving
//! the same O(1) amortized behavior.

#[cfg(test)]
mod tests;

const INITIAL_CAPACITY: usize = 1024;
const LOAD_FACTOR_THRESHOLD: f64 = 0.75;

struct Entry<K, V> {
    hash: u32,
    key: K,
    value: V,
}

/// djb2-labeled hash from the spec: `h = 31*h + c` over the key's bytes.
///
/// This is the classic Java `String.hashCode` recurrence; the spec names
/// it djb2 but gives this exact formula, so the formula is what is
/// implemented (the name is cosmetic — nothing depends on a "real" djb2
/// constant, only on every node caching a stable 32-bit hash of its key).
fn hash_bytes(bytes: &[u8]) -> u32 {
    let mut h: u32 = 0;
    for &c in bytes {
        h = h.wrapping_mul(31).wrapping_add(c as u32);
    }
    h
}

/// Open-chained hash map keyed by anything that can be viewed as bytes.
pub struct HashMap<K, V> {
    buckets: Vec<Vec<Entry<K, V>>>,
    size: usize,
}

impl<K, V> HashMap<K, V>
where
    K: AsRef<[u8]> + PartialEq + Clone,
{
    /// Creates a map with the default initial capacity (`2^10`, matching
    /// the reference's `INIT_TABLE_SIZE`).
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Creates a map with a given initial capacity.
    ///
    /// ## Panics
    /// Panics if `capacity` is not a power of two — requesting one is a
    /// fatal misconfiguration, exactly as the spec requires.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity > 0 && capacity.is_power_of_two(),
            "hash map capacity must be a power of two, got {}",
            capacity
        );
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, Vec::new);
        Self { buckets, size: 0 }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_index(&self, hash: u32) -> usize {
        (hash as usize) & (self.capacity() - 1)
    }

    /// Looks up a key, using the cached hash plus a full compare to
    /// short-circuit chain walks.
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = hash_bytes(key.as_ref());
        let idx = self.bucket_index(hash);
        self.buckets[idx]
            .iter()
            .find(|e| e.hash == hash && &e.key == key)
            .map(|e| &e.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = hash_bytes(key.as_ref());
        let idx = self.bucket_index(hash);
        self.buckets[idx]
            .iter_mut()
            .find(|e| e.hash == hash && &e.key == key)
            .map(|e| &mut e.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Inserts a new key. Fails (returns `false`, no mutation) if the key
    /// is already present — callers that want update semantics must
    /// `remove` first, exactly as the spec requires (e.g. `HSET` removes
    /// the old field before inserting the new one).
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.needs_resize() {
            self.resize();
        }
        let hash = hash_bytes(key.as_ref());
        let idx = self.bucket_index(hash);
        if self.buckets[idx].iter().any(|e| e.hash == hash && e.key == key) {
            return false;
        }
        self.buckets[idx].push(Entry { hash, key, value });
        self.size += 1;
        true
    }

    /// Removes a key, returning its value if present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let hash = hash_bytes(key.as_ref());
        let idx = self.bucket_index(hash);
        let bucket = &mut self.buckets[idx];
        let pos = bucket.iter().position(|e| e.hash == hash && &e.key == key)?;
        self.size -= 1;
        Some(bucket.remove(pos).value)
    }

    /// Releases all storage, resetting the map to empty at its current
    /// capacity.
    pub fn free_all(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.size = 0;
    }

    fn needs_resize(&self) -> bool {
        self.size >= self.capacity()
            || (self.size as f64 + 1.0) / (self.capacity() as f64) > LOAD_FACTOR_THRESHOLD
    }

    /// Doubles capacity and relinks every node into the new bucket array.
    fn resize(&mut self) {
        let new_capacity = self.capacity() * 2;
        let mut new_buckets = Vec::with_capacity(new_capacity);
        new_buckets.resize_with(new_capacity, Vec::new);

        for bucket in self.buckets.drain(..) {
            for entry in bucket {
                let idx = (entry.hash as usize) & (new_capacity - 1);
                new_buckets[idx].push(entry);
            }
        }
        self.buckets = new_buckets;
    }

    /// Iterates over all key-value pairs. Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets.iter().flat_map(|b| b.iter().map(|e| (&e.key, &e.value)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }
}

impl<K, V> Default for HashMap<K, V>
where
    K: AsRef<[u8]> + PartialEq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
