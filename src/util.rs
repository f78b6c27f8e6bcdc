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

pub mod compiler {
    //! Branch hints for the hot paths (command dispatch, store lookups)

    #[cold]
    #[inline(never)]
    pub const fn cold() {}

    pub const fn likely(b: bool) -> bool {
        if !b {
            cold()
        }
        b
    }

    pub const fn unlikely(b: bool) -> bool {
        if b {
            cold()
        }
        b
    }
}

/// Milliseconds since the Unix epoch, for `Client::created_at_millis` and log
/// timestamps that need to cross a wire boundary rather than just be printed
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
