// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! `litedb-server`: boots a `litedb::Server` from an optional TOML config
//! file plus CLI flag overrides, replays its AOF, then runs the event
//! loop until interrupted.

use std::path::PathBuf;

use clap::Parser;

use litedb::config::ConfigOverrides;
use litedb::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "litedb-server", about = "A single-threaded in-memory key-value server")]
struct Cli {
    /// Enable debug mode (sets SO_REUSEADDR on the listener).
    #[arg(short, long)]
    debug: bool,

    /// Path to an optional TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listener port, overriding the config file and the 9000 default.
    #[arg(long)]
    port: Option<u16>,

    /// AOF file path, overriding the config file and the default.
    #[arg(long)]
    aof_path: Option<PathBuf>,

    /// Connection table size, overriding the config file and the default.
    #[arg(long)]
    max_clients: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        port: cli.port,
        aof_path: cli.aof_path,
        max_clients: cli.max_clients,
        debug: cli.debug.then_some(true),
    };
    let config = ServerConfig::load(cli.config.as_deref(), overrides)?;

    let mut server = litedb::Server::new(config)?;
    server.run()?;
    Ok(())
}
