use super::*;
use std::sync::Arc;
use std::thread;

#[test]
fn set_replaces_value() {
    let e = Entry::new(EntryValue::Int64(1));
    e.set(EntryValue::Binary(b"x".to_vec()));
    assert_eq!(e.read(), EntryValue::Binary(b"x".to_vec()));
}

#[test]
fn append_coerces_int_to_decimal_then_concatenates() {
    let e = Entry::new(EntryValue::Int64(12));
    let len = e.append(b"3");
    assert_eq!(e.read(), EntryValue::Binary(b"123".to_vec()));
    assert_eq!(len, 3);
}

#[test]
fn append_on_missing_value_behaves_like_empty_binary() {
    let e = Entry::new(EntryValue::Binary(Vec::new()));
    let len = e.append(b"hi");
    assert_eq!(e.read(), EntryValue::Binary(b"hi".to_vec()));
    assert_eq!(len, 2);
}

#[test]
fn try_add_on_integer_succeeds() {
    let e = Entry::new(EntryValue::Int64(10));
    assert_eq!(e.try_add(5), Some(Ok(15)));
    assert_eq!(e.read(), EntryValue::Int64(15));
}

#[test]
fn try_add_on_non_integer_binary_is_none() {
    let e = Entry::new(EntryValue::Binary(b"abc".to_vec()));
    assert_eq!(e.try_add(1), None);
}

#[test]
fn try_add_overflow_is_err_without_mutating() {
    let e = Entry::new(EntryValue::Int64(i64::MAX));
    assert_eq!(e.try_add(1), Some(Err(())));
    assert_eq!(e.read(), EntryValue::Int64(i64::MAX));
}

#[test]
fn cloned_handle_survives_across_threads() {
    let entry = Arc::new(Entry::new(EntryValue::Int64(0)));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let entry = Arc::clone(&entry);
            thread::spawn(move || {
                entry.try_add(1);
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(entry.read(), EntryValue::Int64(8));
}
