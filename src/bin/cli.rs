// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! `litedb-cli`: an interactive REPL client speaking liteDB's wire
//! protocol directly over a `TcpStream`. Out of scope for the engine
//! proper (SPEC_FULL.md §1 calls the interactive client "mechanical"),
//! kept here only as a thin speak-the-protocol shell.

use std::io::{Read, Write};
use std::net::TcpStream;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use litedb::protocol::{encode_len, MAX_MESSAGE_SIZE};

#[derive(Parser, Debug)]
#[command(name = "litedb-cli", about = "Interactive client for litedb-server")]
struct Cli {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 9000)]
    port: u16,
}

enum Decoded {
    Nil,
    Err(String),
    Str(String),
    Int(i32),
    Float(f32),
    Arr(Vec<Decoded>),
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let addr = format!("{}:{}", cli.host, cli.port);
    let mut stream = TcpStream::connect(&addr)?;
    println!("connected to litedb at {addr}");

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline("litedb> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);
                if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
                    break;
                }
                if let Err(e) = send_and_print(&mut stream, trimmed) {
                    eprintln!("error: {e}");
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("readline error: {e}");
                break;
            }
        }
    }
    Ok(())
}

fn send_and_print(stream: &mut TcpStream, line: &str) -> anyhow::Result<()> {
    let body = line.as_bytes();
    if body.len() > MAX_MESSAGE_SIZE {
        anyhow::bail!("command too long ({} bytes, max {MAX_MESSAGE_SIZE})", body.len());
    }
    stream.write_all(&encode_len(body.len() as u32))?;
    stream.write_all(body)?;

    let value = read_response(stream)?;
    println!("{}", format_value(&value));
    Ok(())
}

fn read_exact_n(stream: &mut TcpStream, n: usize) -> anyhow::Result<Vec<u8>> {
    let mut buf = vec![0u8; n];
    stream.read_exact(&mut buf)?;
    Ok(buf)
}

fn read_response(stream: &mut TcpStream) -> anyhow::Result<Decoded> {
    let tag = read_exact_n(stream, 1)?[0];
    let len_bytes = read_exact_n(stream, 4)?;
    let len = u32::from_le_bytes(len_bytes.try_into().unwrap());

    match tag {
        0 => Ok(Decoded::Nil),
        1 => Ok(Decoded::Err(String::from_utf8_lossy(&read_exact_n(stream, len as usize)?).into_owned())),
        2 => Ok(Decoded::Str(String::from_utf8_lossy(&read_exact_n(stream, len as usize)?).into_owned())),
        3 => {
            let b = read_exact_n(stream, 4)?;
            Ok(Decoded::Int(i32::from_le_bytes(b.try_into().unwrap())))
        }
        4 => {
            let b = read_exact_n(stream, 4)?;
            Ok(Decoded::Float(f32::from_le_bytes(b.try_into().unwrap())))
        }
        5 => {
            let mut items = Vec::with_capacity(len as usize);
            for _ in 0..len {
                items.push(read_response(stream)?);
            }
            Ok(Decoded::Arr(items))
        }
        other => anyhow::bail!("unknown response tag {other}"),
    }
}

fn format_value(v: &Decoded) -> String {
    match v {
        Decoded::Nil => "(nil)".to_string(),
        Decoded::Err(e) => format!("(error) {e}"),
        Decoded::Str(s) => format!("\"{s}\""),
        Decoded::Int(i) => i.to_string(),
        Decoded::Float(f) => f.to_string(),
        Decoded::Arr(items) => {
            let rendered: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", rendered.join(", "))
        }
    }
}
