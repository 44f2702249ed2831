// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Per-connection state machine: REQ (accumulating a request), RESP
//! (draining a queued response), DONE (socket should be deregistered and
//! closed). One [`Connection`] owns one `mio` stream and a fixed-size
//! scratch buffer sized `LEN_PREFIX_SIZE + MAX_MESSAGE_SIZE + 1` — the
//! trailing byte lets a read overrun an oversized frame far enough to be
//! detected rather than silently truncated.

use std::io::{self, Read, Write};

use mio::net::TcpStream;

use crate::error::{LiteError, LiteResult};
use crate::protocol::{self, Response, LEN_PREFIX_SIZE, MAX_MESSAGE_SIZE};


const SCRATCH_SIZE: usize = LEN_PREFIX_SIZE + MAX_MESSAGE_SIZE + 1;

/// Where a connection sits in its request/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    /// Accumulating bytes of the next request.
    Req,
    /// Draining `write_buf` back to the client.
    Resp,
    /// The connection should be closed and deregistered.
    Done,
}

pub struct Connection {
    pub id: u64,
    pub stream: TcpStream,
    pub state: ConnState,
    read_buf: [u8; SCRATCH_SIZE],
    read_filled: usize,
    write_buf: Vec<u8>,
    write_pos: usize,
}

impl Connection {
    pub fn new(id: u64, stream: TcpStream) -> Self {
        Self {
            id,
            stream,
            state: ConnState::Req,
            read_buf: [0u8; SCRATCH_SIZE],
            read_filled: 0,
            write_buf: Vec::new(),
            write_pos: 0,
        }
    }

    /// Pulls as many bytes as are currently available from the socket
    /// into the scratch buffer. Returns the tokenized request as soon as
    /// one full frame has arrived; returns `Ok(None)` if the socket would
    /// block before a full frame was assembled.
    ///
    /// Only meaningful while `state == ConnState::Req`.
    pub fn try_read_request(&mut self) -> LiteResult<Option<Vec<Vec<u8>>>> {
        loop {
            if let Some(frame) = self.try_extract_frame()? {
                return Ok(Some(frame));
            }

            if self.read_filled == self.read_buf.len() {
                return Err(LiteError::ProtocolViolation {
                    reason: "request exceeded the maximum frame size".to_string(),
                });
            }

            match self.stream.read(&mut self.read_buf[self.read_filled..]) {
                Ok(0) => {
                    self.state = ConnState::Done;
                    return Ok(None);
                }
                Ok(n) => self.read_filled += n,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(None),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(LiteError::from(e)),
            }
        }
    }

    fn try_extract_frame(&mut self) -> LiteResult<Option<Vec<Vec<u8>>>> {
        if self.read_filled < LEN_PREFIX_SIZE {
            return Ok(None);
        }
        let mut len_bytes = [0u8; LEN_PREFIX_SIZE];
        len_bytes.copy_from_slice(&self.read_buf[..LEN_PREFIX_SIZE]);
        let body_len = protocol::decode_len(len_bytes) as usize;

        if body_len > MAX_MESSAGE_SIZE {
            return Err(LiteError::ProtocolViolation {
                reason: format!("declared frame length {} exceeds MAX_MESSAGE_SIZE", body_len),
            });
        }

        let frame_len = LEN_PREFIX_SIZE + body_len;
        if self.read_filled < frame_len {
            return Ok(None);
        }

        let tokens = protocol::tokenize(&self.read_buf[LEN_PREFIX_SIZE..frame_len])?;

        // Shift any bytes belonging to a pipelined next request down to
        // the front of the scratch buffer.
        self.read_buf.copy_within(frame_len..self.read_filled, 0);
        self.read_filled -= frame_len;

        Ok(Some(tokens))
    }

    /// Queues `resp` for writing and switches to `Resp`.
    pub fn queue_response(&mut self, resp: &Response) {
        self.write_buf.clear();
        self.write_pos = 0;
        resp.encode(&mut self.write_buf);
        self.state = ConnState::Resp;
    }

    /// Drains as much of the queued response as the socket accepts.
    /// Returns `true` once fully flushed, switching back to `Req`.
    ///
    /// Only meaningful while `state == ConnState::Resp`.
    pub fn try_flush(&mut self) -> LiteResult<bool> {
        while self.write_pos < self.write_buf.len() {
            match self.stream.write(&self.write_buf[self.write_pos..]) {
                Ok(0) => {
                    self.state = ConnState::Done;
                    return Err(LiteError::IoError {
                        operation: "conn_flush".to_string(),
                        reason: "peer closed connection mid-write".to_string(),
                    });
                }
                Ok(n) => self.write_pos += n,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(false),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(LiteError::from(e)),
            }
        }
        self.write_buf.clear();
        self.write_pos = 0;
        self.state = ConnState::Req;
        Ok(true)
    }

    pub fn is_done(&self) -> bool {
        self.state == ConnState::Done
    }
}
