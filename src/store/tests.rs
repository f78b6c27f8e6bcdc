use super::*;
use std::sync::Arc;
use std::thread;

#[test]
fn set_then_get_round_trips() {
    let store = Store::new(8);
    store.set(b"k", EntryValue::Binary(b"v".to_vec()));
    assert_eq!(store.get(b"k").unwrap().read(), EntryValue::Binary(b"v".to_vec()));
}

#[test]
fn del_reports_presence() {
    let store = Store::new(8);
    store.set(b"k", EntryValue::Int64(1));
    assert!(store.del(b"k"));
    assert!(!store.del(b"k"));
}

#[test]
fn append_on_missing_key_creates_it() {
    let store = Store::new(8);
    let len = store.append(b"k", b"hi");
    assert_eq!(len, 2);
    assert_eq!(store.get(b"k").unwrap().read(), EntryValue::Binary(b"hi".to_vec()));
}

#[test]
fn append_coerces_existing_integer() {
    let store = Store::new(8);
    store.set(b"k", EntryValue::Int64(12));
    store.append(b"k", b"3");
    assert_eq!(store.get(b"k").unwrap().read(), EntryValue::Binary(b"123".to_vec()));
}

#[test]
fn incr_on_missing_key_starts_from_zero() {
    let store = Store::new(8);
    assert_eq!(store.add(b"k", 1), Ok(1));
}

#[test]
fn incr_on_non_integer_value_is_rejected() {
    let store = Store::new(8);
    store.set(b"k", EntryValue::Binary(b"not a number".to_vec()));
    assert_eq!(store.add(b"k", 1), Err(IncrError::NotAnInteger));
}

#[test]
fn incr_overflow_is_rejected_without_mutating() {
    let store = Store::new(8);
    store.set(b"k", EntryValue::Int64(i64::MAX));
    assert_eq!(store.add(b"k", 1), Err(IncrError::Overflow));
    assert_eq!(store.get(b"k").unwrap().read(), EntryValue::Int64(i64::MAX));
}

#[test]
fn scan_visits_every_key_exactly_once_across_calls() {
    let store = Store::new(4);
    for i in 0..50 {
        store.set(format!("key{i}").as_bytes(), EntryValue::Int64(i));
    }
    let mut seen = std::collections::HashSet::new();
    let mut cursor = 0u64;
    loop {
        let (next, keys) = store.scan(cursor, 7, None);
        for k in keys {
            assert!(seen.insert(k), "key returned twice in one pass");
        }
        if next == 0 {
            break;
        }
        cursor = next;
    }
    assert_eq!(seen.len(), 50);
}

#[test]
fn scan_respects_match_pattern() {
    let store = Store::new(4);
    store.set(b"apple", EntryValue::Int64(1));
    store.set(b"avocado", EntryValue::Int64(2));
    store.set(b"banana", EntryValue::Int64(3));
    let mut matched = Vec::new();
    let mut cursor = 0u64;
    loop {
        let (next, keys) = store.scan(cursor, 10, Some(b"a*"));
        matched.extend(keys);
        if next == 0 {
            break;
        }
        cursor = next;
    }
    matched.sort();
    assert_eq!(matched, vec![b"apple".to_vec(), b"avocado".to_vec()]);
}

#[test]
fn concurrent_increments_across_threads_are_not_lost() {
    let store = Arc::new(Store::new(16));
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..100 {
                    store.add(b"counter", 1).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(store.get(b"counter").unwrap().read(), EntryValue::Int64(1600));
}
