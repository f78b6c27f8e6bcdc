/*
 * This file is a part of respd
 *
 * respd is a free and open-source RESP-compatible in-memory key-value
 * server.
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! The segmented key-value store: a fixed, power-of-two array of
//! independently-locked segments. A key is routed to its segment by
//! `route_hash(key) & (segments.len() - 1)`; no operation ever holds more
//! than one segment's lock.

pub mod entry;
mod glob;
mod hash;
pub mod scan;
mod segment;
pub mod value;

pub use entry::Entry;
pub use value::EntryValue;

use segment::Segment;
use std::sync::Arc;

pub struct Store {
    segments: Vec<Segment>,
}

impl Store {
    /// `segment_count` must be a power of two; the caller (config validation)
    /// is responsible for enforcing that before construction.
    pub fn new(segment_count: u16) -> Self {
        debug_assert!(segment_count.is_power_of_two(), "segment count must be a power of two");
        let segments = (0..segment_count).map(Segment::new).collect();
        Self { segments }
    }

    fn segment_for(&self, key: &[u8]) -> &Segment {
        let mask = (self.segments.len() - 1) as u64;
        let idx = hash::route_hash(key) & mask;
        &self.segments[idx as usize]
    }

    pub fn get(&self, key: &[u8]) -> Option<Arc<Entry>> {
        self.segment_for(key).get(key)
    }

    pub fn set(&self, key: &[u8], value: EntryValue) {
        self.segment_for(key).put(key.to_vec(), value);
    }

    pub fn del(&self, key: &[u8]) -> bool {
        self.segment_for(key).remove(key)
    }

    /// `APPEND`: coerce-then-concatenate on the existing entry, creating it
    /// as empty binary first if absent. Returns the new total length.
    pub fn append(&self, key: &[u8], data: &[u8]) -> usize {
        let entry = self.segment_for(key).get_or_insert_empty_binary(key);
        entry.append(data)
    }

    /// `INCR`/`DECR`/`INCRBY`/`DECRBY`: apply `delta` atomically, creating
    /// the entry as `0` first if absent.
    ///
    /// `Ok(Ok(n))` is the new value, `Ok(Err(()))` is an overflow, and `Err`
    /// means the existing value wasn't an integer.
    pub fn add(&self, key: &[u8], delta: i64) -> Result<i64, IncrError> {
        let entry = self.segment_for(key).get_or_insert_zero(key);
        match entry.try_add(delta) {
            Some(Ok(n)) => Ok(n),
            Some(Err(())) => Err(IncrError::Overflow),
            None => Err(IncrError::NotAnInteger),
        }
    }

    /// Walks the store starting from `cursor` (`0` to begin), returning up
    /// to `count` keys whose bytes match `pattern` (if given) and a cursor to
    /// resume from, or `0` once the whole keyspace has been walked once.
    pub fn scan(&self, cursor: u64, count: usize, pattern: Option<&[u8]>) -> (u64, Vec<Vec<u8>>) {
        let (mut seg_idx, mut offset) = scan::decode_cursor(cursor);
        let mut out = Vec::with_capacity(count.min(1024));

        while (seg_idx as usize) < self.segments.len() {
            let keys = self.segments[seg_idx as usize].snapshot_keys();
            let start = offset as usize;
            if start >= keys.len() {
                seg_idx += 1;
                offset = 0;
                continue;
            }
            for key in &keys[start..] {
                offset += 1;
                if pattern.map_or(true, |p| glob::glob_match(p, key)) {
                    out.push(key.clone());
                }
                if out.len() >= count {
                    return (scan::encode_cursor(seg_idx, offset), out);
                }
            }
            seg_idx += 1;
            offset = 0;
        }
        (0, out)
    }

    pub fn len(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrError {
    NotAnInteger,
    Overflow,
}

#[cfg(test)]
mod tests;
