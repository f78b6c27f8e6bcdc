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

//! # The error taxonomy
//!
//! Every fallible operation in this crate, from a single byte read off the
//! wire to a fully dispatched command, returns a [`RespdError`]. The variants
//! mirror the taxonomy a RESP server actually needs to distinguish: wire
//! framing is broken beyond recovery (`Protocol`), the wire was well-formed
//! but semantically rejected (`InvalidValue`), or the underlying transport
//! failed (`Io`).

use std::fmt;
use std::io::Error as IoError;

pub type RespdResult<T> = Result<T, RespdError>;

#[derive(Debug)]
pub enum RespdError {
    /// The underlying transport failed (read or write)
    Io(IoError),
    /// The wire format itself was violated: bad CRLF, bad type prefix, a
    /// short bulk string body
    Protocol(&'static str),
    /// Grammatically valid but semantically rejected: an oversized integer,
    /// a null where one isn't legal, an unrecognized enum value
    InvalidValue(String),
    /// Array/discard nesting exceeded the recursion bound
    RecursionLimitExceeded,
    /// `readParameters`'s positional/flag specification was violated
    InvalidParameters(String),
    /// Cooperative session termination (`QUIT`)
    Quit,
    /// Allocation failure
    OutOfMemory,
}

impl RespdError {
    pub fn protocol(msg: &'static str) -> Self {
        Self::Protocol(msg)
    }
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParameters(msg.into())
    }
    /// True if the underlying transport error indicates the peer just went
    /// away (connection-reset, broken-pipe, not-connected): these end a
    /// session silently, never as a logged failure
    pub fn is_peer_gone(&self) -> bool {
        use std::io::ErrorKind::*;
        matches!(
            self,
            Self::Io(e) if matches!(e.kind(), ConnectionReset | BrokenPipe | NotConnected)
        )
    }
    /// True if this error leaves the byte stream unframed, i.e. there is no
    /// sane resynchronization point and the connection must be dropped
    pub fn is_unframing(&self) -> bool {
        matches!(self, Self::Io(_) | Self::RecursionLimitExceeded)
    }
    /// The message to place after a leading `-` in an error reply. Lower-case
    /// English, present tense, no trailing punctuation beyond what's given.
    pub fn reply_message(&self) -> String {
        match self {
            Self::Io(e) => format!("io error: {e}"),
            Self::Protocol(m) => m.to_string(),
            Self::InvalidValue(m) => m.clone(),
            Self::RecursionLimitExceeded => "recursion limit exceeded".to_owned(),
            Self::InvalidParameters(m) => m.clone(),
            Self::Quit => "connection closing".to_owned(),
            Self::OutOfMemory => "out of memory".to_owned(),
        }
    }
}

impl fmt::Display for RespdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Protocol(m) => write!(f, "protocol error: {m}"),
            Self::InvalidValue(m) => write!(f, "invalid value: {m}"),
            Self::RecursionLimitExceeded => write!(f, "recursion limit exceeded"),
            Self::InvalidParameters(m) => write!(f, "invalid parameters: {m}"),
            Self::Quit => write!(f, "quit"),
            Self::OutOfMemory => write!(f, "out of memory"),
        }
    }
}

impl std::error::Error for RespdError {}

impl From<IoError> for RespdError {
    fn from(e: IoError) -> Self {
        Self::Io(e)
    }
}
