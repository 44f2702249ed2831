// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The primary keyspace: a `HashMap<Vec<u8>, Value>` plus typed accessors
//! that centralize the type-mismatch checking every command needs.
//!
//! Commands never match on `Value` directly; they call a `*_entry` (create
//! on miss, type-check on hit) or `*_ref` (read-only, `None` on miss) method
//! here, keeping the type-tag bookkeeping in one place.

use crate::error::{LiteError, LiteResult};
use crate::hashmap::HashMap;
use crate::list::List;
use crate::value::Value;
use crate::zset::SortedSet;

#[cfg(test)]
mod tests;

#[derive(Default)]
pub struct Store {
    map: HashMap<Vec<u8>, Value>,
}

fn key_str(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}

impl Store {
    pub fn new() -> Self {
        Self { map: HashMap::new() }
    }

    pub fn exists(&self, key: &[u8]) -> bool {
        self.map.contains_key(&key.to_vec())
    }

    pub fn delete(&mut self, key: &[u8]) -> bool {
        self.map.remove(&key.to_vec()).is_some()
    }

    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.map.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn flush_all(&mut self) {
        self.map.free_all();
    }

    // ---- string -----------------------------------------------------

    pub fn get_string(&self, key: &[u8]) -> LiteResult<Option<&[u8]>> {
        match self.map.get(&key.to_vec()) {
            None => Ok(None),
            Some(Value::Str(s)) => Ok(Some(s.as_slice())),
            Some(_) => Err(LiteError::TypeMismatch { key: key_str(key), expected: "string" }),
        }
    }

    /// Unconditionally replaces (or creates) `key` as a string, discarding
    /// whatever was there before regardless of its type.
    pub fn set_string(&mut self, key: &[u8], value: Vec<u8>) {
        let k = key.to_vec();
        self.map.remove(&k);
        self.map.insert(k, Value::Str(value));
    }

    // ---- hash ---------------------------------------------------------

    pub fn hash_ref(&self, key: &[u8]) -> LiteResult<Option<&HashMap<Vec<u8>, Vec<u8>>>> {
        match self.map.get(&key.to_vec()) {
            None => Ok(None),
            Some(Value::Hash(h)) => Ok(Some(h)),
            Some(_) => Err(LiteError::TypeMismatch { key: key_str(key), expected: "hashmap" }),
        }
    }

    /// Returns the hash at `key`, creating an empty one if absent. Errors
    /// if `key` holds a different type.
    pub fn hash_entry(&mut self, key: &[u8]) -> LiteResult<&mut HashMap<Vec<u8>, Vec<u8>>> {
        let k = key.to_vec();
        match self.map.get(&k) {
            Some(Value::Hash(_)) => {}
            Some(_) => return Err(LiteError::TypeMismatch { key: key_str(key), expected: "hashmap" }),
            None => {
                self.map.insert(k.clone(), Value::Hash(HashMap::new()));
            }
        }
        match self.map.get_mut(&k) {
            Some(Value::Hash(h)) => Ok(h),
            _ => unreachable!("just inserted or confirmed a hash"),
        }
    }

    // ---- list -----------------------------------------------------------

    pub fn list_ref(&self, key: &[u8]) -> LiteResult<Option<&List>> {
        match self.map.get(&key.to_vec()) {
            None => Ok(None),
            Some(Value::List(l)) => Ok(Some(l)),
            Some(_) => Err(LiteError::TypeMismatch { key: key_str(key), expected: "list" }),
        }
    }

    pub fn list_entry(&mut self, key: &[u8]) -> LiteResult<&mut List> {
        let k = key.to_vec();
        match self.map.get(&k) {
            Some(Value::List(_)) => {}
            Some(_) => return Err(LiteError::TypeMismatch { key: key_str(key), expected: "list" }),
            None => {
                self.map.insert(k.clone(), Value::List(List::new()));
            }
        }
        match self.map.get_mut(&k) {
            Some(Value::List(l)) => Ok(l),
            _ => unreachable!("just inserted or confirmed a list"),
        }
    }

    /// Removes `key` if its list is now empty, matching the reference's
    /// behavior of never leaving an empty list node resident.
    pub fn drop_if_empty_list(&mut self, key: &[u8]) {
        let k = key.to_vec();
        if matches!(self.map.get(&k), Some(Value::List(l)) if l.is_empty()) {
            self.map.remove(&k);
        }
    }

    // ---- sorted set -------------------------------------------------

    pub fn zset_ref(&self, key: &[u8]) -> LiteResult<Option<&SortedSet>> {
        match self.map.get(&key.to_vec()) {
            None => Ok(None),
            Some(Value::SortedSet(z)) => Ok(Some(z)),
            Some(_) => Err(LiteError::TypeMismatch { key: key_str(key), expected: "sorted set" }),
        }
    }

    pub fn zset_entry(&mut self, key: &[u8]) -> LiteResult<&mut SortedSet> {
        let k = key.to_vec();
        match self.map.get(&k) {
            Some(Value::SortedSet(_)) => {}
            Some(_) => return Err(LiteError::TypeMismatch { key: key_str(key), expected: "sorted set" }),
            None => {
                self.map.insert(k.clone(), Value::SortedSet(SortedSet::new()));
            }
        }
        match self.map.get_mut(&k) {
            Some(Value::SortedSet(z)) => Ok(z),
            _ => unreachable!("just inserted or confirmed a sorted set"),
        }
    }
}
