// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn tokenize_collapses_runs_of_spaces() {
    let tokens = tokenize(b"SET  foo   bar").unwrap();
    assert_eq!(tokens, vec![b"SET".to_vec(), b"foo".to_vec(), b"bar".to_vec()]);
}

#[test]
fn tokenize_rejects_too_many_tokens() {
    let body = vec![b"a "; MAX_TOKENS + 1].concat();
    assert!(tokenize(body.as_bytes()).is_err());
}

#[test]
fn len_prefix_round_trips() {
    let encoded = encode_len(1234);
    assert_eq!(decode_len(encoded), 1234);
}

#[test]
fn nil_encodes_as_tag_plus_zero_length() {
    let mut buf = Vec::new();
    Response::Nil.encode(&mut buf);
    assert_eq!(buf, vec![TAG_NIL, 0, 0, 0, 0]);
}

#[test]
fn str_encodes_tag_length_and_bytes() {
    let mut buf = Vec::new();
    Response::Str(b"hi".to_vec()).encode(&mut buf);
    assert_eq!(buf[0], TAG_STR);
    assert_eq!(&buf[1..5], &2u32.to_le_bytes());
    assert_eq!(&buf[5..7], b"hi");
}

#[test]
fn int_encodes_as_four_le_bytes_with_length_four() {
    let mut buf = Vec::new();
    Response::Int(-7).encode(&mut buf);
    assert_eq!(buf[0], TAG_INT);
    assert_eq!(u32::from_le_bytes(buf[1..5].try_into().unwrap()), 4);
    assert_eq!(i32::from_le_bytes(buf[5..9].try_into().unwrap()), -7);
}

#[test]
fn arr_encodes_recursively() {
    let mut buf = Vec::new();
    let resp = Response::Arr(vec![Response::Int(1), Response::Str(b"x".to_vec()), Response::Nil]);
    resp.encode(&mut buf);
    assert_eq!(buf[0], TAG_ARR);
    assert_eq!(u32::from_le_bytes(buf[1..5].try_into().unwrap()), 3);
}

#[test]
fn error_converts_to_err_response() {
    let err = LiteError::NoSuchKey { key: "foo".to_string() };
    let resp: Response = err.into();
    assert!(matches!(resp, Response::Err(_)));
}
