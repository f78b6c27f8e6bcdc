use super::*;
use crate::store::value::EntryValue;

#[test]
fn put_then_get_round_trips() {
    let seg = Segment::new(0);
    seg.put(b"k".to_vec(), EntryValue::Binary(b"v".to_vec()));
    assert_eq!(seg.get(b"k").unwrap().read(), EntryValue::Binary(b"v".to_vec()));
}

#[test]
fn put_overwrites_in_place_so_existing_handles_see_it() {
    let seg = Segment::new(0);
    let first = seg.put(b"k".to_vec(), EntryValue::Int64(1));
    seg.put(b"k".to_vec(), EntryValue::Int64(2));
    assert_eq!(first.read(), EntryValue::Int64(2));
}

#[test]
fn remove_reports_whether_a_key_was_present() {
    let seg = Segment::new(0);
    seg.put(b"k".to_vec(), EntryValue::Int64(1));
    assert!(seg.remove(b"k"));
    assert!(!seg.remove(b"k"));
    assert!(seg.get(b"k").is_none());
}

#[test]
fn get_or_insert_zero_only_inserts_once() {
    let seg = Segment::new(0);
    let a = seg.get_or_insert_zero(b"k");
    a.try_add(5);
    let b = seg.get_or_insert_zero(b"k");
    assert_eq!(b.read(), EntryValue::Int64(5));
}

#[test]
fn snapshot_keys_reflects_current_contents() {
    let seg = Segment::new(0);
    seg.put(b"a".to_vec(), EntryValue::Int64(1));
    seg.put(b"b".to_vec(), EntryValue::Int64(2));
    let mut keys = seg.snapshot_keys();
    keys.sort();
    assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec()]);
}
