// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Single-threaded event loop: one listening socket and up to
//! `max_clients` connections, multiplexed with `mio` readiness
//! notification. Owns the primary keyspace and the AOF handle — the
//! "explicit Server value" the reference's process-globals are collapsed
//! into.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use mio::net::{TcpListener, TcpStream};
use mio::{Events, Interest, Poll, Token};

use crate::aof::{Aof, AofMode};
use crate::commands;
use crate::config::ServerConfig;
use crate::conn::{ConnState, Connection};
use crate::error::{LiteError, LiteResult};
use crate::protocol;
use crate::store::Store;

const LISTENER_TOKEN: Token = Token(0);
const POLL_TIMEOUT: Duration = Duration::from_secs(1);

/// Owns every piece of server-wide state: the keyspace, the AOF, the
/// connection table, and the listening socket.
pub struct Server {
    store: Store,
    aof: Aof,
    config: ServerConfig,
    listener: TcpListener,
    poll: Poll,
    slots: Vec<Option<Connection>>,
    next_conn_id: u64,
}

impl Server {
    /// Opens the AOF, replays it to rebuild the keyspace, then binds the
    /// listener and prepares the connection table. Does not start the
    /// event loop — call [`Server::run`] for that.
    pub fn new(config: ServerConfig) -> LiteResult<Self> {
        let mut store = Store::new();
        let aof = Self::replay(&config, &mut store)?;

        let addr = SocketAddr::new(config.bind_addr, config.port);
        let mut listener = TcpListener::bind(addr).map_err(|e| LiteError::IoError {
            operation: "bind".to_string(),
            reason: e.to_string(),
        })?;

        let poll = Poll::new().map_err(|e| LiteError::IoError {
            operation: "mio_poll_new".to_string(),
            reason: e.to_string(),
        })?;
        poll.registry()
            .register(&mut listener, LISTENER_TOKEN, Interest::READABLE)
            .map_err(|e| LiteError::IoError { operation: "register_listener".to_string(), reason: e.to_string() })?;

        let mut slots = Vec::with_capacity(config.max_clients);
        slots.resize_with(config.max_clients, || None);

        log::info!("litedb listening on {addr} (max_clients={})", config.max_clients);

        Ok(Self { store, aof, config, listener, poll, slots, next_conn_id: 1 })
    }

    /// The listener's actual bound address — useful when `config.port == 0`
    /// let the OS pick an ephemeral port (tests, and nothing else).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    fn replay(config: &ServerConfig, store: &mut Store) -> LiteResult<Aof> {
        let aof = Aof::open(&config.aof_path, AofMode::Read)?;
        let mut replayed = 0u64;
        while let Some(line) = aof.read_line()? {
            if line.trim().is_empty() {
                continue;
            }
            let tokens = match protocol::tokenize(line.as_bytes()) {
                Ok(t) => t,
                Err(e) => {
                    return Err(LiteError::CorruptAofLine { line, reason: e.to_string() });
                }
            };
            commands::execute(store, None, true, &line, &tokens);
            replayed += 1;
        }
        log::info!("replayed {replayed} command(s) from {}", config.aof_path.display());
        aof.switch_mode(AofMode::Append)?;
        aof.flush_periodically(config.flush_interval);
        Ok(aof)
    }

    /// Runs the event loop until the process receives a shutdown signal
    /// from the caller (for tests, until `shutdown` flips `true`).
    pub fn run(&mut self) -> LiteResult<()> {
        let running = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
        self.run_while(running)
    }

    /// Runs the event loop while `running` holds `true`; exits cleanly
    /// once it is flipped to `false` by another thread.
    pub fn run_while(&mut self, running: std::sync::Arc<std::sync::atomic::AtomicBool>) -> LiteResult<()> {
        let mut events = Events::with_capacity(self.config.max_clients + 1);
        while running.load(std::sync::atomic::Ordering::Relaxed) {
            match self.poll.poll(&mut events, Some(POLL_TIMEOUT)) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(LiteError::IoError { operation: "mio_poll".to_string(), reason: e.to_string() }),
            }

            for event in events.iter() {
                if event.token() == LISTENER_TOKEN {
                    self.accept_all();
                } else {
                    let slot = event.token().0 - 1;
                    self.service_slot(slot);
                }
            }
        }
        let _ = self.aof.close();
        Ok(())
    }

    fn accept_all(&mut self) {
        loop {
            let (mut stream, peer) = match self.listener.accept() {
                Ok(pair) => pair,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return,
                Err(e) => {
                    log::warn!("accept failed: {e}");
                    return;
                }
            };

            let Some(slot_idx) = self.slots.iter().position(Option::is_none) else {
                log::warn!("connection table full ({} slots); dropping {peer}", self.config.max_clients);
                continue;
            };

            let token = Token(slot_idx + 1);
            if let Err(e) = self.poll.registry().register(&mut stream, token, Interest::READABLE) {
                log::warn!("failed to register connection from {peer}: {e}");
                continue;
            }

            let id = self.next_conn_id;
            self.next_conn_id += 1;
            log::debug!("accepted connection {id} from {peer} in slot {slot_idx}");
            self.slots[slot_idx] = Some(Connection::new(id, stream));
        }
    }

    fn service_slot(&mut self, slot_idx: usize) {
        let Some(conn) = self.slots[slot_idx].as_mut() else { return };

        loop {
            match conn.state {
                ConnState::Req => match conn.try_read_request() {
                    Ok(Some(tokens)) => {
                        let raw_line = render_request_line(&tokens);
                        let resp =
                            commands::execute(&mut self.store, Some(&self.aof), false, &raw_line, &tokens);
                        conn.queue_response(&resp);
                    }
                    Ok(None) => break,
                    Err(e) => {
                        log::debug!("connection {} protocol error: {e}", conn.id);
                        conn.queue_response(&e.into());
                        let _ = conn.try_flush();
                        conn.state = ConnState::Done;
                        break;
                    }
                },
                ConnState::Resp => match conn.try_flush() {
                    Ok(true) => continue,
                    Ok(false) => break,
                    Err(e) => {
                        log::debug!("connection {} write error: {e}", conn.id);
                        break;
                    }
                },
                ConnState::Done => break,
            }
        }

        if conn.is_done() {
            let mut conn = self.slots[slot_idx].take().expect("checked Some above");
            let _ = self.poll.registry().deregister(&mut conn.stream);
            log::debug!("closed connection {}", conn.id);
            return;
        }

        let interest = match conn.state {
            ConnState::Req => Interest::READABLE,
            ConnState::Resp => Interest::WRITABLE,
            ConnState::Done => return,
        };
        let token = Token(slot_idx + 1);
        if let Err(e) = self.poll.registry().reregister(&mut conn.stream, token, interest) {
            log::warn!("failed to reregister connection {}: {e}", conn.id);
        }
    }
}

fn render_request_line(tokens: &[Vec<u8>]) -> String {
    tokens
        .iter()
        .map(|t| String::from_utf8_lossy(t).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
