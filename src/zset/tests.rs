// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;

fn n(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

#[test]
fn add_lookup_remove_roundtrip() {
    let mut zset = SortedSet::new();
    zset.add(n("alice"), 1.0);
    zset.add(n("bob"), 2.0);
    assert_eq!(zset.lookup_score(b"bob"), Some(2.0));
    assert!(zset.remove(b"alice"));
    assert_eq!(zset.lookup_score(b"alice"), None);
    assert_eq!(zset.len(), 1);
}

#[test]
fn add_updates_score_for_existing_name() {
    let mut zset = SortedSet::new();
    zset.add(n("alice"), 1.0);
    zset.add(n("alice"), 5.0);
    assert_eq!(zset.len(), 1);
    assert_eq!(zset.lookup_score(b"alice"), Some(5.0));

    let origin = zset.min_cursor().unwrap();
    let (name, score) = zset.at(origin);
    assert_eq!(name, b"alice");
    assert_eq!(score, 5.0);
}

#[test]
fn range_from_min_walks_in_score_order() {
    let mut zset = SortedSet::new();
    zset.add(n("carol"), 3.0);
    zset.add(n("alice"), 1.0);
    zset.add(n("bob"), 2.0);

    let origin = zset.min_cursor().unwrap();
    let results = zset.range_from(origin, 10);
    let names: Vec<_> = results.iter().map(|(n, _)| n.clone()).collect();
    assert_eq!(names, vec![n("alice"), n("bob"), n("carol")]);
}

#[test]
fn range_from_score_cursor_with_offset() {
    let mut zset = SortedSet::new();
    zset.add(n("alice"), 1.0);
    zset.add(n("bob"), 2.0);
    zset.add(n("carol"), 3.0);

    let origin = zset.min_cursor().unwrap();
    let advanced = zset.advance(origin, 1).unwrap();
    let results = zset.range_from(advanced, 2);
    assert_eq!(results, vec![(n("bob"), 2.0), (n("carol"), 3.0)]);
}

#[test]
fn pair_cursor_finds_exact_name_among_ties() {
    let mut zset = SortedSet::new();
    zset.add(n("alice"), 1.0);
    zset.add(n("bob"), 1.0);

    let cursor = zset.pair_cursor(b"bob", 1.0).unwrap();
    assert_eq!(zset.at(cursor), (n("bob"), 1.0));
    assert!(zset.pair_cursor(b"carol", 1.0).is_none());
}

#[test]
fn free_all_empties_both_indices() {
    let mut zset = SortedSet::new();
    zset.add(n("alice"), 1.0);
    zset.free_all();
    assert!(zset.is_empty());
    assert!(zset.min_cursor().is_none());
}
