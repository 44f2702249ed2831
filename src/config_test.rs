// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn defaults_with_no_file_and_no_overrides() {
    let config = ServerConfig::load(None, ConfigOverrides::default()).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.max_clients, DEFAULT_MAX_CLIENTS);
    assert_eq!(config.aof_path, PathBuf::from(DEFAULT_AOF_PATH));
    assert!(!config.debug);
}

#[test]
fn cli_overrides_win_over_defaults() {
    let overrides = ConfigOverrides {
        port: Some(9999),
        aof_path: Some(PathBuf::from("/tmp/custom.aof")),
        max_clients: Some(16),
        debug: Some(true),
    };
    let config = ServerConfig::load(None, overrides).unwrap();
    assert_eq!(config.port, 9999);
    assert_eq!(config.aof_path, PathBuf::from("/tmp/custom.aof"));
    assert_eq!(config.max_clients, 16);
    assert!(config.debug);
}

#[test]
fn file_values_applied_then_overridden() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("litedb.toml");
    std::fs::write(&path, "port = 9100\nmax_clients = 32\n").unwrap();

    let config = ServerConfig::load(Some(&path), ConfigOverrides::default()).unwrap();
    assert_eq!(config.port, 9100);
    assert_eq!(config.max_clients, 32);

    let overrides = ConfigOverrides {
        port: Some(9200),
        ..Default::default()
    };
    let config = ServerConfig::load(Some(&path), overrides).unwrap();
    assert_eq!(config.port, 9200);
    assert_eq!(config.max_clients, 32);
}

#[test]
fn missing_file_is_an_error() {
    let result = ServerConfig::load(Some(Path::new("/no/such/path.toml")), ConfigOverrides::default());
    assert!(result.is_err());
}
