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

//! Routes an arbitrary key to its segment. Only needs to be fast and stable
//! within one process's lifetime, not a general-purpose hasher, and never
//! exposed outside `store`.

use ahash::AHasher;
use std::hash::{Hash, Hasher};

pub fn route_hash(bytes: &[u8]) -> u64 {
    let mut hasher = AHasher::default();
    bytes.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_deterministic() {
        assert_eq!(route_hash(b"hello"), route_hash(b"hello"));
    }

    #[test]
    fn differs_across_distinct_keys() {
        assert_ne!(route_hash(b"hello"), route_hash(b"world"));
    }
}
