// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn set_then_get_string_round_trips() {
    let mut store = Store::new();
    store.set_string(b"foo", b"bar".to_vec());
    assert_eq!(store.get_string(b"foo").unwrap(), Some(b"bar".as_slice()));
}

#[test]
fn get_string_on_wrong_type_errors() {
    let mut store = Store::new();
    store.hash_entry(b"foo").unwrap();
    assert!(store.get_string(b"foo").is_err());
}

#[test]
fn hash_entry_creates_then_reuses_same_hash() {
    let mut store = Store::new();
    store.hash_entry(b"h").unwrap().insert(b"field".to_vec(), b"val".to_vec());
    assert_eq!(store.hash_ref(b"h").unwrap().unwrap().get(&b"field".to_vec()), Some(&b"val".to_vec()));
}

#[test]
fn hash_entry_on_string_key_errors() {
    let mut store = Store::new();
    store.set_string(b"s", b"x".to_vec());
    assert!(store.hash_entry(b"s").is_err());
}

#[test]
fn drop_if_empty_list_removes_key_once_drained() {
    let mut store = Store::new();
    store.list_entry(b"l").unwrap().push_back(crate::list::ListValue::Str(b"a".to_vec()));
    store.list_entry(b"l").unwrap().pop_back();
    store.drop_if_empty_list(b"l");
    assert!(!store.exists(b"l"));
}

#[test]
fn delete_and_flush_all() {
    let mut store = Store::new();
    store.set_string(b"a", b"1".to_vec());
    store.set_string(b"b", b"2".to_vec());
    assert!(store.delete(b"a"));
    assert!(!store.delete(b"a"));
    assert_eq!(store.len(), 1);
    store.flush_all();
    assert!(store.is_empty());
}
