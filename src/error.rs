// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Error types for liteDB operations.
//!
//! Mirrors the error taxonomy in the spec: protocol errors, type mismatches,
//! logical errors, and fatal conditions all flow through this one enum.

use std::fmt;

/// Standard Result type for all liteDB operations.
pub type LiteResult<T> = Result<T, LiteError>;

/// Error types for liteDB operations.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteError {
    /// Key exists with a different container type than the command expects.
    TypeMismatch { key: String, expected: &'static str },

    /// Key does not exist where the command requires it to.
    NoSuchKey { key: String },

    /// Hash field does not exist.
    NoSuchField { key: String, field: String },

    /// List index is outside `[0, len)`.
    IndexOutOfRange { key: String, index: i64 },

    /// `LTRIM`/range bounds are outside `[0, len)` or `start > end`.
    InvalidRange { key: String, start: i64, end: i64 },

    /// Command name is not in the dispatch table.
    UnknownCommand { name: String },

    /// Command received the wrong number of arguments.
    WrongArity { name: String, expected: usize, got: usize },

    /// An argument expected to be an integer failed strict parsing.
    InvalidInteger { value: String },

    /// An argument expected to be a float failed strict parsing.
    InvalidFloat { value: String },

    /// Request frame exceeded `MAX_MESSAGE_SIZE` or carried too many tokens.
    ProtocolViolation { reason: String },

    /// I/O error during AOF or socket operations.
    IoError { operation: String, reason: String },

    /// A line in the AOF could not be tokenized during replay.
    CorruptAofLine { line: String, reason: String },
}

impl fmt::Display for LiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { key, expected } => {
                write!(f, "key '{}' is not a {}", key, expected)
            }
            Self::NoSuchKey { key } => write!(f, "no such key '{}'", key),
            Self::NoSuchField { key, field } => {
                write!(f, "no such field '{}' in '{}'", field, key)
            }
            Self::IndexOutOfRange { key, index } => {
                write!(f, "index {} out of range for '{}'", index, key)
            }
            Self::InvalidRange { key, start, end } => {
                write!(f, "invalid range [{}, {}] for '{}'", start, end, key)
            }
            Self::UnknownCommand { name } => write!(f, "unknown command '{}'", name),
            Self::WrongArity { name, expected, got } => {
                write!(
                    f,
                    "wrong number of arguments for '{}' (expected {}, got {})",
                    name, expected, got
                )
            }
            Self::InvalidInteger { value } => write!(f, "'{}' is not a valid integer", value),
            Self::InvalidFloat { value } => write!(f, "'{}' is not a valid float", value),
            Self::ProtocolViolation { reason } => write!(f, "protocol violation: {}", reason),
            Self::IoError { operation, reason } => {
                write!(f, "I/O error during '{}': {}", operation, reason)
            }
            Self::CorruptAofLine { line, reason } => {
                write!(f, "corrupt AOF line '{}': {}", line, reason)
            }
        }
    }
}

impl std::error::Error for LiteError {}

impl From<std::io::Error> for LiteError {
    fn from(err: std::io::Error) -> Self {
        LiteError::IoError {
            operation: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}
