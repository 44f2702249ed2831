// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Sorted set: a composite value pairing a name→score hash map (the
//! primary index, O(1) lookup by name) with an AVL tree ordered by score
//! (the secondary index, O(log n) order traversal and rank math).

use crate::hashmap::HashMap;
use crate::tree::Tree;

#[cfg(test)]
mod tests;

/// Opaque handle to a tree node, used to walk the sorted set in score
/// order without exposing the tree's internal arena indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor(usize);

/// Sorted set: name↔score bidirectional index.
///
/// Invariant: for every name in the hash map with score `s`, the tree
/// contains exactly one node whose `(name, score)` equals `(name, s)`,
/// and vice versa.
#[derive(Default)]
pub struct SortedSet {
    scores: HashMap<Vec<u8>, f32>,
    tree: Tree,
}

impl SortedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Adds or updates `name`'s score.
    ///
    /// If `name` is already present, its old tree node is located by pair
    /// (not by score alone) and removed before the new entry is inserted.
    /// Per the spec, the set is briefly empty for `name` between removal
    /// and reinsertion; no atomic rollback is provided if the second step
    /// were to fail (it cannot fail here short of allocator abort).
    pub fn add(&mut self, name: Vec<u8>, score: f32) {
        if let Some(&old_score) = self.scores.get(&name) {
            self.tree.delete(&name, old_score);
            self.scores.remove(&name);
        }
        self.tree.insert(name.clone(), score);
        self.scores.insert(name, score);
    }

    /// Removes `name`. Returns `true` if it was present.
    pub fn remove(&mut self, name: &[u8]) -> bool {
        let key = name.to_vec();
        match self.scores.remove(&key) {
            Some(score) => {
                self.tree.delete(name, score);
                true
            }
            None => false,
        }
    }

    pub fn lookup_score(&self, name: &[u8]) -> Option<f32> {
        self.scores.get(&name.to_vec()).copied()
    }

    /// Cursor at the in-order minimum (smallest score).
    pub fn min_cursor(&self) -> Option<Cursor> {
        self.tree.min().map(Cursor)
    }

    /// Cursor at the first node with a matching score.
    pub fn score_cursor(&self, score: f32) -> Option<Cursor> {
        self.tree.search_by_score(score).map(Cursor)
    }

    /// Cursor at the node matching `(name, score)` exactly.
    pub fn pair_cursor(&self, name: &[u8], score: f32) -> Option<Cursor> {
        self.tree.search_by_pair(name, score).map(Cursor)
    }

    /// Advances a cursor by `k` in-order positions (may be negative).
    pub fn advance(&self, cursor: Cursor, k: i64) -> Option<Cursor> {
        self.tree.offset(cursor.0, k).map(Cursor)
    }

    /// Reads the `(name, score)` pair a cursor points at.
    pub fn at(&self, cursor: Cursor) -> (Vec<u8>, f32) {
        (self.tree.name(cursor.0).to_vec(), self.tree.score(cursor.0))
    }

    /// Collects up to `limit` pairs starting at `origin`, advancing one
    /// in-order position at a time.
    pub fn range_from(&self, origin: Cursor, limit: usize) -> Vec<(Vec<u8>, f32)> {
        let mut results = Vec::with_capacity(limit.min(self.len()));
        let mut cur = Some(origin);
        for _ in 0..limit {
            let Some(c) = cur else { break };
            results.push(self.at(c));
            cur = self.advance(c, 1);
        }
        results
    }

    pub fn free_all(&mut self) {
        self.scores.free_all();
        self.tree.free_all();
    }
}
