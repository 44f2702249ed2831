// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The primary map's tagged value.
//!
//! Only `Str`, `Hash`, `List`, and `SortedSet` are reachable at the top
//! level by clients. `Int`/`Float` never appear in the primary map; they
//! exist only as inner payload tags for the doubly linked list
//! (`crate::list::ListValue`), which the original C implementation tags
//! per-node for internal reuse beyond the string-only command surface.

use crate::hashmap::HashMap;
use crate::list::List;
use crate::zset::SortedSet;

/// A value stored under a key in the primary keyspace.
///
/// The tag never mutates in place: replacing the value of an existing key
/// requires delete-then-insert, exactly as the spec requires.
pub enum Value {
    Str(Vec<u8>),
    Hash(HashMap<Vec<u8>, Vec<u8>>),
    List(List),
    SortedSet(SortedSet),
}

impl Value {
    /// Name used in type-mismatch error messages, matching the command
    /// table's column names in spec.md §4.I.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Hash(_) => "hashmap",
            Value::List(_) => "list",
            Value::SortedSet(_) => "sorted set",
        }
    }
}
