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

//! One shard of the keyspace: an independently-locked hash map. The store
//! never holds more than one segment's lock at a time.

use super::entry::Entry;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub struct Segment {
    pub id: u16,
    map: RwLock<HashMap<Vec<u8>, Arc<Entry>>>,
}

impl Segment {
    pub fn new(id: u16) -> Self {
        Self { id, map: RwLock::new(HashMap::new()) }
    }

    pub fn get(&self, key: &[u8]) -> Option<Arc<Entry>> {
        self.map.read().get(key).cloned()
    }

    /// Insert or replace the entry at `key`, returning the entry that now
    /// lives there (either the freshly inserted one, or the existing one
    /// with its value overwritten in place so outstanding handles observe
    /// the update too)
    pub fn put(&self, key: Vec<u8>, value: super::value::EntryValue) -> Arc<Entry> {
        let mut guard = self.map.write();
        if let Some(existing) = guard.get(&key) {
            existing.set(value);
            return Arc::clone(existing);
        }
        let entry = Arc::new(Entry::new(value));
        guard.insert(key, Arc::clone(&entry));
        entry
    }

    /// Fetch the entry at `key`, inserting `EntryValue::Binary(Vec::new())`
    /// first if it's absent — used by `APPEND` on a previously-unset key
    pub fn get_or_insert_empty_binary(&self, key: &[u8]) -> Arc<Entry> {
        self.get_or_insert_with(key, || super::value::EntryValue::Binary(Vec::new()))
    }

    /// Fetch the entry at `key`, inserting `EntryValue::Int64(0)` first if
    /// it's absent — used by `INCR`/`DECR`/`INCRBY`/`DECRBY` on a
    /// previously-unset key
    pub fn get_or_insert_zero(&self, key: &[u8]) -> Arc<Entry> {
        self.get_or_insert_with(key, || super::value::EntryValue::Int64(0))
    }

    fn get_or_insert_with(
        &self,
        key: &[u8],
        default: impl FnOnce() -> super::value::EntryValue,
    ) -> Arc<Entry> {
        let mut guard = self.map.write();
        if let Some(existing) = guard.get(key) {
            return Arc::clone(existing);
        }
        let entry = Arc::new(Entry::new(default()));
        guard.insert(key.to_vec(), Arc::clone(&entry));
        entry
    }

    pub fn remove(&self, key: &[u8]) -> bool {
        self.map.write().remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    /// Snapshot the keys currently present, in map iteration order. Used by
    /// `SCAN` while holding the segment's read lock only for the duration of
    /// this call.
    pub fn snapshot_keys(&self) -> Vec<Vec<u8>> {
        self.map.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests;
