// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Command engine: parses an already-tokenized request, dispatches to a
//! typed handler, and (for mutating commands, outside replay) appends the
//! command line to the AOF before returning the response.
//!
//! Handlers never talk to the socket or the AOF directly — each returns a
//! [`Response`] or a [`LiteError`]; [`execute`] owns the AOF coupling and
//! the replay-suppression rule described in SPEC_FULL.md §4.E/§4.I.

use crate::aof::Aof;
use crate::error::{LiteError, LiteResult};
use crate::list::ListValue;
use crate::protocol::Response;
use crate::store::Store;


fn key_str(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}

fn require_arity(name: &str, args: &[Vec<u8>], expected: usize) -> LiteResult<()> {
    if args.len() != expected {
        return Err(LiteError::WrongArity { name: name.to_string(), expected, got: args.len() });
    }
    Ok(())
}

fn require_exists(store: &Store, key: &[u8]) -> LiteResult<()> {
    if store.exists(key) {
        Ok(())
    } else {
        Err(LiteError::NoSuchKey { key: key_str(key) })
    }
}

fn parse_i64(bytes: &[u8]) -> LiteResult<i64> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| LiteError::InvalidInteger { value: String::from_utf8_lossy(bytes).into_owned() })
}

fn parse_f32(bytes: &[u8]) -> LiteResult<f32> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .ok_or_else(|| LiteError::InvalidFloat { value: String::from_utf8_lossy(bytes).into_owned() })
}

fn render_list_value(v: &ListValue) -> Vec<u8> {
    match v {
        ListValue::Str(s) => s.clone(),
        ListValue::Int(i) => i.to_string().into_bytes(),
        ListValue::Float(f) => f.to_string().into_bytes(),
    }
}

type Handler = fn(&mut Store, &[Vec<u8>]) -> LiteResult<Response>;

struct CommandSpec {
    name: &'static str,
    is_write: bool,
    handler: Handler,
}

static COMMANDS: &[CommandSpec] = &[
    CommandSpec { name: "PING", is_write: false, handler: cmd_ping },
    CommandSpec { name: "EXISTS", is_write: false, handler: cmd_exists },
    CommandSpec { name: "DEL", is_write: true, handler: cmd_del },
    CommandSpec { name: "KEYS", is_write: false, handler: cmd_keys },
    CommandSpec { name: "FLUSHALL", is_write: true, handler: cmd_flushall },
    CommandSpec { name: "GET", is_write: false, handler: cmd_get },
    CommandSpec { name: "SET", is_write: true, handler: cmd_set },
    CommandSpec { name: "HEXISTS", is_write: false, handler: cmd_hexists },
    CommandSpec { name: "HSET", is_write: true, handler: cmd_hset },
    CommandSpec { name: "HGET", is_write: false, handler: cmd_hget },
    CommandSpec { name: "HDEL", is_write: true, handler: cmd_hdel },
    CommandSpec { name: "HGETALL", is_write: false, handler: cmd_hgetall },
    CommandSpec { name: "LEXISTS", is_write: false, handler: cmd_lexists },
    CommandSpec { name: "LPUSH", is_write: true, handler: cmd_lpush },
    CommandSpec { name: "RPUSH", is_write: true, handler: cmd_rpush },
    CommandSpec { name: "LPOP", is_write: true, handler: cmd_lpop },
    CommandSpec { name: "RPOP", is_write: true, handler: cmd_rpop },
    CommandSpec { name: "LLEN", is_write: false, handler: cmd_llen },
    CommandSpec { name: "LRANGE", is_write: false, handler: cmd_lrange },
    CommandSpec { name: "LTRIM", is_write: true, handler: cmd_ltrim },
    CommandSpec { name: "LSET", is_write: true, handler: cmd_lset },
    CommandSpec { name: "ZADD", is_write: true, handler: cmd_zadd },
    CommandSpec { name: "ZREM", is_write: true, handler: cmd_zrem },
    CommandSpec { name: "ZSCORE", is_write: false, handler: cmd_zscore },
    CommandSpec { name: "ZQUERY", is_write: false, handler: cmd_zquery },
];

/// Executes one already-tokenized request against `store`.
///
/// `raw_line` is the request's original command text (name and args joined
/// by single spaces, no trailing newline) — the exact bytes written to the
/// AOF for a successful mutating command. `tokens[0]` is the command name;
/// the rest are its arguments.
///
/// During replay (`aof_restore = true`) a mutating command still runs (so
/// state is reconstructed) but its line is not re-appended to the AOF and
/// `Response::Nil` is returned in place of its real response, matching the
/// replay driver which never writes bytes back to a client.
pub fn execute(
    store: &mut Store,
    aof: Option<&Aof>,
    aof_restore: bool,
    raw_line: &str,
    tokens: &[Vec<u8>],
) -> Response {
    let Some((name_token, args)) = tokens.split_first() else {
        return LiteError::UnknownCommand { name: String::new() }.into();
    };
    let name = String::from_utf8_lossy(name_token).to_ascii_uppercase();

    let Some(spec) = COMMANDS.iter().find(|c| c.name == name) else {
        return LiteError::UnknownCommand { name }.into();
    };

    match (spec.handler)(store, args) {
        Ok(resp) => {
            if spec.is_write {
                if aof_restore {
                    return Response::Nil;
                }
                if let Some(aof) = aof {
                    if let Err(e) = aof.write(raw_line) {
                        log::error!("failed to append '{name}' to AOF: {e}");
                    }
                }
            }
            resp
        }
        Err(e) => {
            log::debug!("command '{name}' failed: {e}");
            e.into()
        }
    }
}

// ---- PING / keyspace-wide -------------------------------------------

fn cmd_ping(_store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("PING", args, 0)?;
    Ok(Response::Str(b"PONG".to_vec()))
}

fn cmd_exists(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("EXISTS", args, 1)?;
    Ok(Response::Int(store.exists(&args[0]) as i32))
}

fn cmd_del(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("DEL", args, 1)?;
    Ok(Response::Int(store.delete(&args[0]) as i32))
}

fn cmd_keys(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("KEYS", args, 0)?;
    Ok(Response::Arr(store.keys().into_iter().map(Response::Str).collect()))
}

fn cmd_flushall(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("FLUSHALL", args, 0)?;
    store.flush_all();
    Ok(Response::Nil)
}

// ---- string -----------------------------------------------------------

fn cmd_get(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("GET", args, 1)?;
    match store.get_string(&args[0])? {
        Some(v) => Ok(Response::Str(v.to_vec())),
        None => Ok(Response::Nil),
    }
}

fn cmd_set(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("SET", args, 2)?;
    store.set_string(&args[0], args[1].clone());
    Ok(Response::Nil)
}

// ---- hash ---------------------------------------------------------------

fn cmd_hexists(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("HEXISTS", args, 2)?;
    match store.hash_ref(&args[0])? {
        Some(h) => Ok(Response::Int(h.contains_key(&args[1]) as i32)),
        None => Ok(Response::Int(0)),
    }
}

fn cmd_hset(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("HSET", args, 3)?;
    let (key, field, value) = (&args[0], &args[1], &args[2]);
    let h = store.hash_entry(key)?;
    let existed = h.remove(field).is_some();
    h.insert(field.clone(), value.clone());
    Ok(Response::Int((!existed) as i32))
}

fn cmd_hget(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("HGET", args, 2)?;
    match store.hash_ref(&args[0])? {
        Some(h) => match h.get(&args[1]) {
            Some(v) => Ok(Response::Str(v.clone())),
            None => Ok(Response::Nil),
        },
        None => Ok(Response::Nil),
    }
}

fn cmd_hdel(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("HDEL", args, 2)?;
    let (key, field) = (&args[0], &args[1]);
    require_exists(store, key)?;
    let h = store.hash_entry(key)?;
    Ok(Response::Int(h.remove(field).is_some() as i32))
}

fn cmd_hgetall(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("HGETALL", args, 1)?;
    require_exists(store, &args[0])?;
    let h = store.hash_ref(&args[0])?.expect("existence just checked");
    let mut items = Vec::with_capacity(h.len() * 2);
    for (k, v) in h.iter() {
        items.push(Response::Str(k.clone()));
        items.push(Response::Str(v.clone()));
    }
    Ok(Response::Arr(items))
}

// ---- list ---------------------------------------------------------------

fn cmd_lexists(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("LEXISTS", args, 2)?;
    match store.list_ref(&args[0])? {
        Some(l) => Ok(Response::Int(l.contains(&ListValue::Str(args[1].clone())) as i32)),
        None => Ok(Response::Int(0)),
    }
}

fn cmd_lpush(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("LPUSH", args, 2)?;
    let l = store.list_entry(&args[0])?;
    l.push_front(ListValue::Str(args[1].clone()));
    Ok(Response::Int(1))
}

fn cmd_rpush(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("RPUSH", args, 2)?;
    let l = store.list_entry(&args[0])?;
    l.push_back(ListValue::Str(args[1].clone()));
    Ok(Response::Int(1))
}

fn cmd_lpop(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("LPOP", args, 1)?;
    require_exists(store, &args[0])?;
    let l = store.list_entry(&args[0])?;
    let popped = l.pop_front().is_some();
    store.drop_if_empty_list(&args[0]);
    Ok(Response::Int(popped as i32))
}

fn cmd_rpop(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("RPOP", args, 1)?;
    require_exists(store, &args[0])?;
    let l = store.list_entry(&args[0])?;
    let popped = l.pop_back().is_some();
    store.drop_if_empty_list(&args[0]);
    Ok(Response::Int(popped as i32))
}

fn cmd_llen(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("LLEN", args, 1)?;
    require_exists(store, &args[0])?;
    let l = store.list_ref(&args[0])?.expect("existence just checked");
    Ok(Response::Int(l.len() as i32))
}

fn cmd_lrange(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("LRANGE", args, 3)?;
    let key = &args[0];
    require_exists(store, key)?;
    let l = store.list_ref(key)?.expect("existence just checked");
    let start = parse_i64(&args[1])?;
    let end = parse_i64(&args[2])?;
    if start < 0 || end < 0 || start > end || end as usize >= l.len() {
        return Err(LiteError::InvalidRange { key: key_str(key), start, end });
    }
    let items = (start as usize..=end as usize)
        .filter_map(|i| l.get(i))
        .map(|v| Response::Str(render_list_value(v)))
        .collect();
    Ok(Response::Arr(items))
}

fn cmd_ltrim(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("LTRIM", args, 3)?;
    let key = &args[0];
    require_exists(store, key)?;
    let start = parse_i64(&args[1])?;
    let end = parse_i64(&args[2])?;
    if start < 0 || end < 0 {
        return Err(LiteError::InvalidRange { key: key_str(key), start, end });
    }
    let l = store.list_entry(key)?;
    let ok = l.trim(start as usize, end as usize);
    store.drop_if_empty_list(key);
    if ok {
        Ok(Response::Nil)
    } else {
        Err(LiteError::InvalidRange { key: key_str(key), start, end })
    }
}

fn cmd_lset(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("LSET", args, 3)?;
    let key = &args[0];
    require_exists(store, key)?;
    let index = parse_i64(&args[1])?;
    let l = store.list_entry(key)?;
    if index < 0 || index as usize >= l.len() {
        return Err(LiteError::IndexOutOfRange { key: key_str(key), index });
    }
    let ok = l.set(index as usize, ListValue::Str(args[2].clone()));
    Ok(Response::Int(ok as i32))
}

// ---- sorted set -----------------------------------------------------

fn cmd_zadd(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("ZADD", args, 3)?;
    let key = &args[0];
    let score = parse_f32(&args[1])?;
    let name = args[2].clone();
    let z = store.zset_entry(key)?;
    let existed = z.lookup_score(&name).is_some();
    z.add(name, score);
    Ok(Response::Int((!existed) as i32))
}

fn cmd_zrem(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("ZREM", args, 2)?;
    let key = &args[0];
    require_exists(store, key)?;
    let z = store.zset_entry(key)?;
    Ok(Response::Int(z.remove(&args[1]) as i32))
}

fn cmd_zscore(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("ZSCORE", args, 2)?;
    let key = &args[0];
    require_exists(store, key)?;
    let z = store.zset_ref(key)?.expect("existence just checked");
    match z.lookup_score(&args[1]) {
        Some(score) => Ok(Response::Float(score)),
        None => Err(LiteError::NoSuchField { key: key_str(key), field: key_str(&args[1]) }),
    }
}

fn cmd_zquery(store: &mut Store, args: &[Vec<u8>]) -> LiteResult<Response> {
    require_arity("ZQUERY", args, 5)?;
    let key = &args[0];
    require_exists(store, key)?;
    let z = store.zset_ref(key)?.expect("existence just checked");

    let score = parse_f32(&args[1])?;
    let name = &args[2];
    let offset = parse_i64(&args[3])?;
    let limit = parse_i64(&args[4])?;
    if limit < 0 {
        return Err(LiteError::InvalidRange { key: key_str(key), start: offset, end: limit });
    }

    let origin = if score == f32::NEG_INFINITY && name.is_empty() {
        z.min_cursor()
    } else if name.is_empty() {
        z.score_cursor(score)
    } else {
        z.pair_cursor(name, score)
    };

    let Some(origin) = origin else {
        return Ok(Response::Arr(Vec::new()));
    };
    let Some(start) = z.advance(origin, offset) else {
        return Ok(Response::Arr(Vec::new()));
    };

    let mut items = Vec::new();
    for (name, score) in z.range_from(start, limit as usize) {
        items.push(Response::Str(name));
        items.push(Response::Float(score));
    }
    Ok(Response::Arr(items))
}
