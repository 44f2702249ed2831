// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;

fn s(v: &str) -> ListValue {
    ListValue::Str(v.as_bytes().to_vec())
}

#[test]
fn push_and_pop_both_ends() {
    let mut list = List::new();
    list.push_back(s("a"));
    list.push_front(s("b"));
    list.push_back(s("c"));
    // b, a, c
    assert_eq!(list.len(), 3);
    assert!(matches!(list.pop_front(), Some(ListValue::Str(v)) if v == b"b"));
    assert!(matches!(list.pop_back(), Some(ListValue::Str(v)) if v == b"c"));
    assert!(matches!(list.pop_front(), Some(ListValue::Str(v)) if v == b"a"));
    assert!(list.is_empty());
}

#[test]
fn get_and_set_by_index() {
    let mut list = List::new();
    list.push_back(s("a"));
    list.push_back(s("b"));
    assert!(matches!(list.get(1), Some(ListValue::Str(v)) if v == b"b"));
    assert!(list.set(1, s("z")));
    assert!(matches!(list.get(1), Some(ListValue::Str(v)) if v == b"z"));
    assert!(!list.set(5, s("oob")));
}

#[test]
fn trim_keeps_inclusive_range() {
    let mut list = List::new();
    for v in ["a", "b", "c", "d"] {
        list.push_back(s(v));
    }
    assert!(list.trim(1, 2));
    assert_eq!(list.len(), 2);
    assert!(matches!(list.get(0), Some(ListValue::Str(v)) if v == b"b"));
    assert!(matches!(list.get(1), Some(ListValue::Str(v)) if v == b"c"));
}

#[test]
fn trim_rejects_out_of_bounds() {
    let mut list = List::new();
    list.push_back(s("a"));
    assert!(!list.trim(0, 5));
    assert!(!list.trim(2, 1));
    assert_eq!(list.len(), 1);
}

#[test]
fn remove_matching_respects_k_zero_means_all() {
    let mut list = List::new();
    for v in ["a", "x", "a", "x", "a"] {
        list.push_back(s(v));
    }
    let removed = list.remove_matching_from_head(&s("a"), 0);
    assert_eq!(removed, 3);
    assert_eq!(list.len(), 2);
}

#[test]
fn remove_matching_from_tail_stops_at_k() {
    let mut list = List::new();
    for v in ["a", "x", "a", "x", "a"] {
        list.push_back(s(v));
    }
    let removed = list.remove_matching_from_tail(&s("a"), 1);
    assert_eq!(removed, 1);
    assert_eq!(list.len(), 4);
    // the last "a" (index 4) should have been the one removed
    assert!(matches!(list.get(3), Some(ListValue::Str(v)) if v == b"x"));
}

#[test]
fn float_equality_uses_epsilon() {
    let a = ListValue::Float(1.000_000_1);
    let b = ListValue::Float(1.000_000_2);
    assert!(a.value_eq(&b));
    let c = ListValue::Float(2.0);
    assert!(!a.value_eq(&c));
}

#[test]
fn contains_checks_membership() {
    let mut list = List::new();
    list.push_back(s("a"));
    assert!(list.contains(&s("a")));
    assert!(!list.contains(&s("z")));
}
