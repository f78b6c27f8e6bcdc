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

//! The RESP wire codec: a reader, a writer, and the `readParameters`
//! positional/flag argument grammar built on top of the reader.

mod framebuf;
pub mod params;
pub mod reader;
pub mod writer;

pub use params::{FieldKind, FlagField, FlagKind, ParamResult, ParamValue, PositionalField};
pub use reader::{RespEnum, RespReader, TypePrefix};
pub use writer::RespWriter;
