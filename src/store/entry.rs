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

//! A single stored key's value, refcounted so a reader holding a handle
//! can't be invalidated by a concurrent write racing a segment eviction.
//!
//! The design notes describe a handle carrying a raw pointer plus an
//! "acquired" flag with explicit `borrow()`/`release()` calls; `Arc<Entry>`
//! is that same contract with the compiler doing the bookkeeping: cloning
//! the `Arc` is the borrow, dropping the last clone is the release.

use super::value::EntryValue;
use parking_lot::RwLock;

#[derive(Debug)]
pub struct Entry {
    value: RwLock<EntryValue>,
}

impl Entry {
    pub fn new(value: EntryValue) -> Self {
        Self { value: RwLock::new(value) }
    }

    /// A snapshot of the current value, cloned out from under the read lock
    pub fn read(&self) -> EntryValue {
        self.value.read().clone()
    }

    /// Overwrite the value entirely
    pub fn set(&self, value: EntryValue) {
        *self.value.write() = value;
    }

    /// Coerce the existing value to binary, append `data`, and store the
    /// result, returning the new total length
    pub fn append(&self, data: &[u8]) -> usize {
        let mut guard = self.value.write();
        let mut buf = guard.coerce_to_binary();
        buf.extend_from_slice(data);
        let new_len = buf.len();
        *guard = EntryValue::Binary(buf);
        new_len
    }

    /// Atomically apply `delta` to the stored integer, returning the new
    /// value, or `None` if the current value isn't a valid integer
    pub fn try_add(&self, delta: i64) -> Option<Result<i64, ()>> {
        let mut guard = self.value.write();
        let current = guard.as_i64()?;
        Some(match current.checked_add(delta) {
            Some(next) => {
                *guard = EntryValue::Int64(next);
                Ok(next)
            }
            None => Err(()),
        })
    }

    pub fn length_in_bytes(&self) -> usize {
        self.value.read().length_in_bytes()
    }
}

#[cfg(test)]
mod tests;
