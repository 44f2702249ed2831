// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;

fn n(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

#[test]
fn insert_and_search_by_score() {
    let mut tree = Tree::new();
    tree.insert(n("alice"), 1.0);
    tree.insert(n("bob"), 2.0);
    tree.insert(n("carol"), 3.0);
    tree.assert_invariants();

    let idx = tree.search_by_score(2.0).unwrap();
    assert_eq!(tree.name(idx), b"bob");
    assert_eq!(tree.score(idx), 2.0);
    assert!(tree.search_by_score(99.0).is_none());
}

#[test]
fn search_by_pair_finds_exact_match_among_ties() {
    let mut tree = Tree::new();
    tree.insert(n("alice"), 1.0);
    tree.insert(n("bob"), 1.0);
    tree.insert(n("carol"), 1.0);
    tree.assert_invariants();

    for name in ["alice", "bob", "carol"] {
        let idx = tree.search_by_pair(name.as_bytes(), 1.0).unwrap();
        assert_eq!(tree.name(idx), name.as_bytes());
    }
    assert!(tree.search_by_pair(b"dave", 1.0).is_none());
}

#[test]
fn delete_leaf_and_two_child_nodes_preserves_invariants() {
    let mut tree = Tree::new();
    for (name, score) in [("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0), ("e", 5.0)] {
        tree.insert(n(name), score);
    }
    tree.assert_invariants();

    assert!(tree.delete(b"c", 3.0));
    tree.assert_invariants();
    assert!(tree.search_by_pair(b"c", 3.0).is_none());
    assert_eq!(tree.len(), 4);

    assert!(!tree.delete(b"c", 3.0));
}

#[test]
fn bulk_insert_delete_maintains_avl_invariant() {
    let mut tree = Tree::new();
    for i in 0..200 {
        tree.insert(n(&format!("key-{i}")), i as f32);
    }
    tree.assert_invariants();

    for i in (0..200).step_by(2) {
        assert!(tree.delete(format!("key-{i}").as_bytes(), i as f32));
    }
    tree.assert_invariants();
    assert_eq!(tree.len(), 100);
}

#[test]
fn offset_zero_is_identity_and_offsets_are_invertible() {
    let mut tree = Tree::new();
    let mut indices = Vec::new();
    for i in 0..20 {
        indices.push(tree.insert(n(&format!("k{i}")), i as f32));
    }

    for &idx in &indices {
        assert_eq!(tree.offset(idx, 0), Some(idx));
    }

    let mid = tree.search_by_score(10.0).unwrap();
    let forward = tree.offset(mid, 5).unwrap();
    assert_eq!(tree.offset(forward, -5), Some(mid));
}

#[test]
fn offset_out_of_range_is_none() {
    let mut tree = Tree::new();
    let idx = tree.insert(n("only"), 1.0);
    assert_eq!(tree.offset(idx, 1), None);
    assert_eq!(tree.offset(idx, -1), None);
}

#[test]
fn min_returns_smallest_score() {
    let mut tree = Tree::new();
    tree.insert(n("b"), 2.0);
    tree.insert(n("a"), 1.0);
    tree.insert(n("c"), 3.0);
    let idx = tree.min().unwrap();
    assert_eq!(tree.name(idx), b"a");
}

#[test]
fn free_all_empties_tree() {
    let mut tree = Tree::new();
    tree.insert(n("a"), 1.0);
    tree.free_all();
    assert!(tree.is_empty());
    assert!(tree.min().is_none());
}
