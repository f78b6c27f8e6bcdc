use super::*;
use std::io::Cursor;

fn reader(input: &[u8]) -> RespReader<Cursor<Vec<u8>>> {
    RespReader::new(Cursor::new(input.to_vec()))
}

#[tokio::test]
async fn reads_simple_string() {
    let mut r = reader(b"+OK\r\n");
    assert_eq!(r.read_string().await.unwrap(), Some(b"OK".to_vec()));
}

#[tokio::test]
async fn reads_bulk_string() {
    let mut r = reader(b"$5\r\nhello\r\n");
    assert_eq!(r.read_string().await.unwrap(), Some(b"hello".to_vec()));
}

#[tokio::test]
async fn null_bulk_string_is_none() {
    let mut r = reader(b"$-1\r\n");
    assert_eq!(r.read_string().await.unwrap(), None);
}

#[tokio::test]
async fn empty_bulk_string_round_trips() {
    let mut r = reader(b"$0\r\n\r\n");
    assert_eq!(r.read_string().await.unwrap(), Some(Vec::new()));
}

#[tokio::test]
async fn reads_array_header() {
    let mut r = reader(b"*3\r\n");
    assert_eq!(r.read_array_header().await.unwrap(), 3);
}

#[tokio::test]
async fn negative_array_header_normalizes_to_minus_one() {
    let mut r = reader(b"*-7\r\n");
    assert_eq!(r.read_array_header().await.unwrap(), -1);
}

#[tokio::test]
async fn reads_native_integer() {
    let mut r = reader(b":-42\r\n");
    assert_eq!(r.read_i64().await.unwrap(), -42);
}

#[tokio::test]
async fn integer_at_eighteen_digits_is_accepted() {
    let mut r = reader(b":999999999999999999\r\n");
    assert_eq!(r.read_i64().await.unwrap(), 999999999999999999);
}

#[tokio::test]
async fn integer_past_eighteen_digits_is_rejected_but_stream_stays_framed() {
    let mut r = reader(b":1234567890123456789\r\n+OK\r\n");
    let err = r.read_i64().await.unwrap_err();
    assert!(matches!(err, RespdError::InvalidValue(_)));
    // the CRLF of the bad integer was fully drained, so the next value reads cleanly
    assert_eq!(r.read_string().await.unwrap(), Some(b"OK".to_vec()));
}

#[tokio::test]
async fn oversized_simple_string_is_rejected_but_stream_stays_framed() {
    let long_line = "a".repeat(DEFAULT_SIMPLE_STRING_LIMIT + 1);
    let mut input = format!("+{long_line}\r\n").into_bytes();
    input.extend_from_slice(b"+OK\r\n");
    let mut r = reader(&input);
    let err = r.read_string().await.unwrap_err();
    assert!(matches!(err, RespdError::InvalidValue(_)));
    assert_eq!(r.read_string().await.unwrap(), Some(b"OK".to_vec()));
}

#[tokio::test]
async fn type_mismatch_drains_the_value_and_stream_stays_framed() {
    // a handler expecting a string gets a native integer instead; the whole
    // mismatched value must still be drained so `+OK` reads cleanly next
    let mut r = reader(b":5\r\n+OK\r\n");
    let err = r.read_string().await.unwrap_err();
    assert!(matches!(err, RespdError::Protocol(_)));
    assert_eq!(r.read_string().await.unwrap(), Some(b"OK".to_vec()));
}

#[tokio::test]
async fn type_mismatch_on_array_drains_every_element() {
    let mut r = reader(b"*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n+OK\r\n");
    let err = r.read_i64().await.unwrap_err();
    assert!(matches!(err, RespdError::Protocol(_)));
    assert_eq!(r.read_string().await.unwrap(), Some(b"OK".to_vec()));
}

#[tokio::test]
async fn discard_value_skips_nested_array() {
    let mut r = reader(b"*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n+OK\r\n");
    r.discard_value().await.unwrap();
    assert_eq!(r.read_string().await.unwrap(), Some(b"OK".to_vec()));
}

#[tokio::test]
async fn discard_value_at_depth_four_succeeds() {
    // *1\r\n wrapped four times around a simple string is exactly at the bound
    let mut input = Vec::new();
    for _ in 0..4 {
        input.extend_from_slice(b"*1\r\n");
    }
    input.extend_from_slice(b"+x\r\n");
    let mut r = reader(&input);
    r.discard_value().await.unwrap();
}

#[tokio::test]
async fn discard_value_at_depth_five_is_rejected() {
    let mut input = Vec::new();
    for _ in 0..5 {
        input.extend_from_slice(b"*1\r\n");
    }
    input.extend_from_slice(b"+x\r\n");
    let mut r = reader(&input);
    let err = r.discard_value().await.unwrap_err();
    assert!(matches!(err, RespdError::RecursionLimitExceeded));
}

#[tokio::test]
async fn read_i64_string_accepts_stringified_integer() {
    let mut r = reader(b"$3\r\n123\r\n");
    assert_eq!(r.read_i64_string().await.unwrap(), 123);
}

#[tokio::test]
async fn read_i64_string_rejects_non_integer_body() {
    let mut r = reader(b"$3\r\nabc\r\n");
    assert!(r.read_i64_string().await.is_err());
}
