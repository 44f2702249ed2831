// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Append-only log (AOF): the durability mechanism for liteDB.
//!
//! A mutex-guarded file handle offers four operations to the command
//! engine: `write` (append a command line), `flush` (force buffered bytes
//! to stable storage, called periodically by a dedicated thread),
//! `read_line` (used exactly once at startup to replay the log), and
//! `switch_mode` (close and reopen under a different access mode). The
//! engine owns exactly one `Aof` per process; there is no snapshotting and
//! no record framing, only newline-delimited text lines.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::{LiteError, LiteResult};


/// Access mode for the underlying file handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AofMode {
    /// Newly-written lines are appended; used during normal operation.
    Append,
    /// The file is read sequentially from the start; used only during
    /// startup replay.
    Read,
}

struct Inner {
    path: PathBuf,
    mode: AofMode,
    writer: Option<BufWriter<File>>,
    reader: Option<BufReader<File>>,
}

/// Handle to the append-only log. Cheap to clone — every clone shares the
/// same underlying mutex-guarded file handle.
#[derive(Clone)]
pub struct Aof {
    inner: Arc<Mutex<Inner>>,
}

impl Aof {
    /// Opens (creating if necessary) the log at `path` in the given mode.
    pub fn open(path: impl Into<PathBuf>, mode: AofMode) -> LiteResult<Self> {
        let path = path.into();
        let (writer, reader) = Self::open_handles(&path, mode)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner { path, mode, writer, reader })),
        })
    }

    fn open_handles(
        path: &Path,
        mode: AofMode,
    ) -> LiteResult<(Option<BufWriter<File>>, Option<BufReader<File>>)> {
        match mode {
            AofMode::Append => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| LiteError::IoError {
                        operation: "aof_open_append".to_string(),
                        reason: e.to_string(),
                    })?;
                Ok((Some(BufWriter::new(file)), None))
            }
            AofMode::Read => {
                let file = OpenOptions::new()
                    .create(true)
                    .read(true)
                    .write(true)
                    .open(path)
                    .map_err(|e| LiteError::IoError {
                        operation: "aof_open_read".to_string(),
                        reason: e.to_string(),
                    })?;
                Ok((None, Some(BufReader::new(file))))
            }
        }
    }

    /// Appends a single newline-terminated text line. The line is
    /// buffered; call [`Aof::flush`] (or rely on the periodic flusher) to
    /// force it to stable storage.
    pub fn write(&self, line: &str) -> LiteResult<()> {
        let mut guard = self.inner.lock().map_err(Self::poison_err)?;
        let writer = guard.writer.as_mut().ok_or_else(|| LiteError::IoError {
            operation: "aof_write".to_string(),
            reason: "AOF is not open in append mode".to_string(),
        })?;
        writer.write_all(line.as_bytes()).map_err(|e| LiteError::IoError {
            operation: "aof_write".to_string(),
            reason: e.to_string(),
        })?;
        if !line.ends_with('\n') {
            writer.write_all(b"\n").map_err(|e| LiteError::IoError {
                operation: "aof_write".to_string(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Forces buffered writes to the OS.
    pub fn flush(&self) -> LiteResult<()> {
        let mut guard = self.inner.lock().map_err(Self::poison_err)?;
        if let Some(writer) = guard.writer.as_mut() {
            writer.flush().map_err(|e| LiteError::IoError {
                operation: "aof_flush".to_string(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Spawns a detached thread that flushes every `interval`. The thread
    /// runs until process exit; it is never joined, matching the
    /// reference's detached flusher.
    pub fn flush_periodically(&self, interval: Duration) -> JoinHandle<()> {
        let aof = self.clone();
        std::thread::spawn(move || loop {
            std::thread::sleep(interval);
            if let Err(e) = aof.flush() {
                log::error!("AOF periodic flush failed: {e}");
            } else {
                log::trace!("AOF flushed");
            }
        })
    }

    /// Reads the next newline-delimited record. Returns `Ok(None)` at
    /// EOF. Only meaningful while the log is open in `Read` mode.
    pub fn read_line(&self) -> LiteResult<Option<String>> {
        let mut guard = self.inner.lock().map_err(Self::poison_err)?;
        let reader = guard.reader.as_mut().ok_or_else(|| LiteError::IoError {
            operation: "aof_read_line".to_string(),
            reason: "AOF is not open in read mode".to_string(),
        })?;
        let mut line = String::new();
        let bytes_read = reader.read_line(&mut line).map_err(|e| LiteError::IoError {
            operation: "aof_read_line".to_string(),
            reason: e.to_string(),
        })?;
        if bytes_read == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Closes the file and reopens it under `mode`, serialized with any
    /// in-flight writer/reader via the mutex.
    pub fn switch_mode(&self, mode: AofMode) -> LiteResult<()> {
        let mut guard = self.inner.lock().map_err(Self::poison_err)?;
        if let Some(writer) = guard.writer.as_mut() {
            let _ = writer.flush();
        }
        guard.writer = None;
        guard.reader = None;

        let (writer, reader) = Self::open_handles(&guard.path, mode)?;
        guard.writer = writer;
        guard.reader = reader;
        guard.mode = mode;
        Ok(())
    }

    /// Closes the log, serializing with writers via the mutex.
    pub fn close(&self) -> LiteResult<()> {
        let mut guard = self.inner.lock().map_err(Self::poison_err)?;
        if let Some(writer) = guard.writer.as_mut() {
            let _ = writer.flush();
        }
        guard.writer = None;
        guard.reader = None;
        Ok(())
    }

    fn poison_err<T>(_: std::sync::PoisonError<T>) -> LiteError {
        LiteError::IoError {
            operation: "aof_lock".to_string(),
            reason: "AOF mutex poisoned by a panicking thread".to_string(),
        }
    }
}
