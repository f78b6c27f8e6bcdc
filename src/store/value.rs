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

//! The value a stored entry holds. A key always maps to exactly one of
//! these; there is no separate "type" field because the tag on the enum
//! itself is the type.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
    /// A native 64-bit integer, as produced by `INCR`/`DECR`/`INCRBY`/`DECRBY`
    /// or a `SET` whose body parsed as one
    Int64(i64),
    /// An opaque byte string
    Binary(Vec<u8>),
}

impl EntryValue {
    /// The length that `STRLEN` (and friends) report: the literal buffer
    /// length for `Binary`, or a fixed `4` for `Int64` regardless of its
    /// decimal rendering's length — it is never decimal-string-formatted
    /// just to be measured, and the constant is 4 rather than the type's
    /// actual 8-byte width (a documented quirk, reproduced as specified)
    pub fn length_in_bytes(&self) -> usize {
        match self {
            Self::Binary(b) => b.len(),
            Self::Int64(_) => 4,
        }
    }

    /// `APPEND` forces any existing value into its decimal string rendering
    /// before concatenating; there is no reverse coercion from `Binary` back
    /// to `Int64`; the result of an append is always `Binary`
    pub fn coerce_to_binary(&self) -> Vec<u8> {
        match self {
            Self::Binary(b) => b.clone(),
            Self::Int64(i) => i.to_string().into_bytes(),
        }
    }

    /// The signed integer this value holds for `INCR`/`DECR`, if any. A
    /// `Binary` value only qualifies if its entire content is a valid,
    /// in-range decimal integer (spec §4.3: "non-integer value" otherwise).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(i) => Some(*i),
            Self::Binary(b) => std::str::from_utf8(b).ok()?.parse().ok(),
        }
    }
}
