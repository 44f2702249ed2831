// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;

fn key(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

#[test]
fn insert_get_remove_roundtrip() {
    let mut map: HashMap<Vec<u8>, Vec<u8>> = HashMap::new();
    assert!(map.insert(key("a"), key("1")));
    assert_eq!(map.get(&key("a")), Some(&key("1")));
    assert_eq!(map.remove(&key("a")), Some(key("1")));
    assert_eq!(map.get(&key("a")), None);
}

#[test]
fn insert_rejects_duplicate_key() {
    let mut map: HashMap<Vec<u8>, i32> = HashMap::new();
    assert!(map.insert(key("a"), 1));
    assert!(!map.insert(key("a"), 2));
    assert_eq!(map.get(&key("a")), Some(&1));
}

#[test]
fn resize_preserves_all_entries() {
    let mut map: HashMap<Vec<u8>, usize> = HashMap::with_capacity(2);
    for i in 0..500 {
        assert!(map.insert(key(&format!("key-{i}")), i));
    }
    assert_eq!(map.len(), 500);
    for i in 0..500 {
        assert_eq!(map.get(&key(&format!("key-{i}"))), Some(&i));
    }
}

#[test]
#[should_panic]
fn non_power_of_two_capacity_panics() {
    let _map: HashMap<Vec<u8>, i32> = HashMap::with_capacity(10);
}

#[test]
fn free_all_empties_map() {
    let mut map: HashMap<Vec<u8>, i32> = HashMap::new();
    map.insert(key("a"), 1);
    map.insert(key("b"), 2);
    map.free_all();
    assert_eq!(map.len(), 0);
    assert_eq!(map.get(&key("a")), None);
}
