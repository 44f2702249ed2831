// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Server configuration.
//!
//! Loaded from an optional TOML file and then overridden field-by-field by
//! CLI flags. A config file is never required: defaults plus flags are
//! enough to start the server, matching the reference's "just run it"
//! startup model.

use serde::Deserialize;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{LiteError, LiteResult};

const DEFAULT_PORT: u16 = 9000;
const DEFAULT_MAX_CLIENTS: usize = 1024;
const DEFAULT_AOF_PATH: &str = "AOF.aof";
const DEFAULT_FLUSH_INTERVAL_SECS: u64 = 5;

/// Server configuration.
///
/// ## Fields
/// - `bind_addr` / `port`: listener address, `INADDR_ANY` by default.
/// - `max_clients`: size of the connection table (`fd2conn` in the
///   reference).
/// - `aof_path`: append-only log file path.
/// - `flush_interval`: how often the AOF flusher thread forces buffered
///   writes to stable storage.
/// - `debug`: enables `SO_REUSEADDR` on the listener.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub max_clients: usize,
    pub aof_path: PathBuf,
    pub flush_interval: Duration,
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            max_clients: DEFAULT_MAX_CLIENTS,
            aof_path: PathBuf::from(DEFAULT_AOF_PATH),
            flush_interval: Duration::from_secs(DEFAULT_FLUSH_INTERVAL_SECS),
            debug: false,
        }
    }
}

/// On-disk representation of the optional TOML config file.
///
/// Every field is optional: an absent field falls back to
/// `ServerConfig::default()`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    bind_addr: Option<String>,
    port: Option<u16>,
    max_clients: Option<usize>,
    aof_path: Option<String>,
    flush_interval_secs: Option<u64>,
    debug: Option<bool>,
}

/// CLI overrides layered on top of the loaded config.
///
/// Every field is optional so that `litedb-server` can be invoked with no
/// flags at all and still start from the compiled-in defaults.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub aof_path: Option<PathBuf>,
    pub max_clients: Option<usize>,
    pub debug: Option<bool>,
}

impl ServerConfig {
    /// Loads configuration from an optional TOML file, then applies CLI
    /// overrides on top.
    ///
    /// ## Input
    /// - `path`: path to a TOML config file; `None` skips the file and
    ///   starts from `ServerConfig::default()`.
    /// - `overrides`: CLI-flag overrides, applied after the file.
    ///
    /// ## Error Conditions
    /// - `LiteError::IoError` if `path` is given but unreadable.
    /// - `LiteError::ProtocolViolation` if the file contents do not parse
    ///   as TOML (reused here as a generic "bad config" signal).
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> LiteResult<Self> {
        let file = match path {
            Some(p) => {
                let text = std::fs::read_to_string(p).map_err(|e| LiteError::IoError {
                    operation: "read_config".to_string(),
                    reason: e.to_string(),
                })?;
                toml::from_str::<ConfigFile>(&text).map_err(|e| LiteError::ProtocolViolation {
                    reason: format!("invalid config file: {}", e),
                })?
            }
            None => ConfigFile::default(),
        };

        let mut config = ServerConfig::default();

        if let Some(addr) = file.bind_addr {
            config.bind_addr = addr.parse().map_err(|_| LiteError::ProtocolViolation {
                reason: format!("invalid bind_addr '{}'", addr),
            })?;
        }
        if let Some(port) = file.port {
            config.port = port;
        }
        if let Some(n) = file.max_clients {
            config.max_clients = n;
        }
        if let Some(path) = file.aof_path {
            config.aof_path = PathBuf::from(path);
        }
        if let Some(secs) = file.flush_interval_secs {
            config.flush_interval = Duration::from_secs(secs);
        }
        if let Some(debug) = file.debug {
            config.debug = debug;
        }

        if let Some(port) = overrides.port {
            config.port = port;
        }
        if let Some(path) = overrides.aof_path {
            config.aof_path = path;
        }
        if let Some(n) = overrides.max_clients {
            config.max_clients = n;
        }
        if let Some(debug) = overrides.debug {
            config.debug = debug;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod config_test;
