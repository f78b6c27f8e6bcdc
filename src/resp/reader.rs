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

//! # The RESP reader
//!
//! Parses RESP values off an asynchronous byte source. The reader holds a
//! single accumulating [`FrameBuffer`] for the line currently being read and
//! nothing else — it never looks further ahead than the next CRLF boundary,
//! mirroring the "single-byte peek" contract in spec §4.1.

use super::framebuf::FrameBuffer;
use crate::error::{RespdError, RespdResult};
use std::future::Future;
use std::io::ErrorKind;
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Largest bulk string body this server will allocate for
pub const MAX_BULK_LEN: i64 = 500 * 1024 * 1024;
/// Default cap on a simple string's length before it's rejected
pub const DEFAULT_SIMPLE_STRING_LIMIT: usize = 1024;
/// Array/discard nesting bound (spec §4.1: "bound recursion depth to 4")
pub const MAX_DISCARD_DEPTH: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypePrefix {
    Simple,
    Error,
    Integer,
    Bulk,
    Array,
}

impl TypePrefix {
    fn from_byte(b: u8) -> RespdResult<Self> {
        match b {
            b'+' => Ok(Self::Simple),
            b'-' => Ok(Self::Error),
            b':' => Ok(Self::Integer),
            b'$' => Ok(Self::Bulk),
            b'*' => Ok(Self::Array),
            _ => Err(RespdError::protocol("invalid type prefix")),
        }
    }
}

/// A value read while deciding whether a positional argument is an integer, a
/// byte string, or the start of the flag phase (see [`super::params`])
pub(super) enum ParamToken {
    Int(i64),
    Bytes(Vec<u8>),
    Null,
}

/// Parse a RESP integer body (sign + up to 18 digits) exactly as spec §4.1
/// requires: at most 18 digits, leading `+` skipped, leading `-` negates, any
/// other non-digit byte is a protocol violation.
pub(super) fn parse_i64_strict(bytes: &[u8]) -> RespdResult<i64> {
    let (neg, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    if digits.is_empty() {
        return Err(RespdError::protocol("expected an integer"));
    }
    if digits.len() > 18 {
        return Err(RespdError::invalid_value("int is outside of int64 range"));
    }
    let mut value: i64 = 0;
    for &d in digits {
        if !d.is_ascii_digit() {
            return Err(RespdError::protocol("non-digit byte in integer"));
        }
        value = value * 10 + (d - b'0') as i64;
    }
    Ok(if neg { -value } else { value })
}

pub struct RespReader<R> {
    inner: R,
    buf: FrameBuffer,
    simple_string_limit: usize,
}

impl<R: AsyncRead + Unpin + Send> RespReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: FrameBuffer::new(),
            simple_string_limit: DEFAULT_SIMPLE_STRING_LIMIT,
        }
    }

    pub fn with_simple_string_limit(inner: R, limit: usize) -> Self {
        Self { inner, buf: FrameBuffer::new(), simple_string_limit: limit }
    }

    async fn read_byte(&mut self) -> RespdResult<u8> {
        match self.inner.read_u8().await {
            Ok(b) => Ok(b),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                Err(RespdError::protocol("unexpected eof"))
            }
            Err(e) => Err(RespdError::Io(e)),
        }
    }

    async fn expect_lf(&mut self) -> RespdResult<()> {
        if self.read_byte().await? == b'\n' {
            Ok(())
        } else {
            Err(RespdError::protocol("expected LF after CR"))
        }
    }

    /// Accumulate bytes into `self.buf` until CR, then require LF. If `limit`
    /// is given and the line would exceed it, the buffer is capped at `limit`
    /// bytes but draining continues to the CRLF boundary so the stream stays
    /// framed; an `InvalidValue` is returned in that case.
    async fn read_line(&mut self, limit: Option<usize>) -> RespdResult<()> {
        self.buf.clear();
        let mut overflowed = false;
        loop {
            let b = self.read_byte().await?;
            if b == b'\r' {
                self.expect_lf().await?;
                break;
            }
            if b == b'\n' {
                return Err(RespdError::protocol("LF without preceding CR"));
            }
            match limit {
                Some(limit) if self.buf.len() >= limit => overflowed = true,
                _ => self.buf.push(b),
            }
        }
        if overflowed {
            Err(RespdError::invalid_value("line exceeds the configured limit"))
        } else {
            Ok(())
        }
    }

    pub async fn read_type_prefix(&mut self) -> RespdResult<TypePrefix> {
        let b = self.read_byte().await?;
        TypePrefix::from_byte(b)
    }

    /// `*<n>\r\n`. A negative length is normalized to `-1` (null/empty array).
    pub async fn read_array_header(&mut self) -> RespdResult<i64> {
        let prefix = self.read_type_prefix().await?;
        if prefix != TypePrefix::Array {
            self.drain_mismatched_value(prefix).await?;
            return Err(RespdError::protocol("expected an array"));
        }
        self.read_line(None).await?;
        let n = parse_i64_strict(self.buf.as_slice())?;
        Ok(if n < -1 { -1 } else { n })
    }

    /// Reads the CR then LF that every bulk string body (whether accepted or
    /// drained for being oversized) is terminated by.
    async fn expect_body_crlf(&mut self) -> RespdResult<()> {
        if self.read_byte().await? != b'\r' {
            return Err(RespdError::protocol("expected CR after bulk string body"));
        }
        self.expect_lf().await
    }

    /// Reads and discards exactly `remaining` bytes without allocating a
    /// buffer anywhere near that size, used to drain an oversized bulk
    /// string's declared body so the stream stays framed.
    async fn drain_bytes(&mut self, mut remaining: i64) -> RespdResult<()> {
        let mut scratch = [0u8; 4096];
        while remaining > 0 {
            let take = remaining.min(scratch.len() as i64) as usize;
            match self.inner.read(&mut scratch[..take]).await {
                Ok(0) => return Err(RespdError::protocol("unexpected eof while draining bulk string")),
                Ok(n) => remaining -= n as i64,
                Err(e) => return Err(RespdError::Io(e)),
            }
        }
        Ok(())
    }

    async fn read_bulk_body(&mut self) -> RespdResult<Option<Vec<u8>>> {
        self.read_line(None).await?;
        let len = parse_i64_strict(self.buf.as_slice())?;
        if len < 0 {
            return Ok(None);
        }
        if len > MAX_BULK_LEN {
            self.drain_bytes(len).await?;
            self.expect_body_crlf().await?;
            return Err(RespdError::invalid_value("bulk string exceeds the maximum length"));
        }
        let mut data = vec![0u8; len as usize];
        if let Err(e) = self.inner.read_exact(&mut data).await {
            return Err(if e.kind() == ErrorKind::UnexpectedEof {
                RespdError::protocol("short bulk string body")
            } else {
                RespdError::Io(e)
            });
        }
        self.expect_body_crlf().await?;
        Ok(Some(data))
    }

    /// Drains the body of a value whose type prefix has already been read and
    /// turned out not to be the one the caller expected, so a type mismatch
    /// never leaves unread bytes behind for the next command to trip over.
    async fn drain_mismatched_value(&mut self, prefix: TypePrefix) -> RespdResult<()> {
        match prefix {
            TypePrefix::Simple | TypePrefix::Error | TypePrefix::Integer => self.read_line(None).await,
            TypePrefix::Bulk => self.read_bulk_body().await.map(|_| ()),
            TypePrefix::Array => {
                self.read_line(None).await?;
                let n = parse_i64_strict(self.buf.as_slice())?;
                let n = if n < 0 { 0 } else { n as usize };
                for _ in 0..n {
                    self.discard_value_at_depth(1).await?;
                }
                Ok(())
            }
        }
    }

    /// `+...\r\n` or `$N\r\n...\r\n`. Returns `None` for a null bulk string.
    pub async fn read_string(&mut self) -> RespdResult<Option<Vec<u8>>> {
        match self.read_type_prefix().await? {
            TypePrefix::Simple => {
                self.read_line(Some(self.simple_string_limit)).await?;
                Ok(Some(self.buf.to_vec()))
            }
            TypePrefix::Bulk => self.read_bulk_body().await,
            other => {
                self.drain_mismatched_value(other).await?;
                Err(RespdError::protocol("expected a simple or bulk string"))
            }
        }
    }

    /// `:<i64>\r\n`
    pub async fn read_i64(&mut self) -> RespdResult<i64> {
        let prefix = self.read_type_prefix().await?;
        if prefix != TypePrefix::Integer {
            self.drain_mismatched_value(prefix).await?;
            return Err(RespdError::protocol("expected an integer"));
        }
        self.read_line(None).await?;
        parse_i64_strict(self.buf.as_slice())
    }

    /// An integer given either in native (`:`) or stringified (`+`/`$`) form
    pub async fn read_i64_string(&mut self) -> RespdResult<i64> {
        match self.read_type_prefix().await? {
            TypePrefix::Integer => {
                self.read_line(None).await?;
                parse_i64_strict(self.buf.as_slice())
            }
            TypePrefix::Simple => {
                self.read_line(Some(self.simple_string_limit)).await?;
                parse_i64_strict(self.buf.as_slice())
            }
            TypePrefix::Bulk => match self.read_bulk_body().await? {
                Some(bytes) => parse_i64_strict(&bytes),
                None => Err(RespdError::invalid_value("expected an integer, found null")),
            },
            other => {
                self.drain_mismatched_value(other).await?;
                Err(RespdError::protocol("expected an integer or a string"))
            }
        }
    }

    /// Read one string value and match it case-insensitively against `T`'s
    /// variants
    pub async fn read_enum<T: RespEnum>(&mut self) -> RespdResult<T> {
        let bytes = self
            .read_string()
            .await?
            .ok_or_else(|| RespdError::invalid_value("expected a value, found null"))?;
        T::from_bytes_ci(&bytes)
            .ok_or_else(|| RespdError::invalid_value(format!(
                "unrecognized value '{}'",
                String::from_utf8_lossy(&bytes)
            )))
    }

    /// Used internally by `readParameters` to decide, without committing to a
    /// type, whether the next token is a native integer, a byte string, or a
    /// null bulk string
    pub(super) async fn read_value_token(&mut self) -> RespdResult<ParamToken> {
        match self.read_type_prefix().await? {
            TypePrefix::Integer => {
                self.read_line(None).await?;
                Ok(ParamToken::Int(parse_i64_strict(self.buf.as_slice())?))
            }
            TypePrefix::Simple => {
                self.read_line(Some(self.simple_string_limit)).await?;
                Ok(ParamToken::Bytes(self.buf.to_vec()))
            }
            TypePrefix::Bulk => match self.read_bulk_body().await? {
                Some(bytes) => Ok(ParamToken::Bytes(bytes)),
                None => Ok(ParamToken::Null),
            },
            other => {
                self.drain_mismatched_value(other).await?;
                Err(RespdError::protocol("unexpected type in argument position"))
            }
        }
    }

    /// Discard one complete value, recursing into arrays up to
    /// [`MAX_DISCARD_DEPTH`]
    pub fn discard_value(&mut self) -> Pin<Box<dyn Future<Output = RespdResult<()>> + Send + '_>> {
        self.discard_value_at_depth(1)
    }

    fn discard_value_at_depth(
        &mut self,
        depth: u32,
    ) -> Pin<Box<dyn Future<Output = RespdResult<()>> + Send + '_>> {
        Box::pin(async move {
            if depth > MAX_DISCARD_DEPTH {
                return Err(RespdError::RecursionLimitExceeded);
            }
            match self.read_type_prefix().await? {
                TypePrefix::Simple | TypePrefix::Error | TypePrefix::Integer => {
                    self.read_line(None).await
                }
                TypePrefix::Bulk => self.read_bulk_body().await.map(|_| ()),
                TypePrefix::Array => {
                    self.read_line(None).await?;
                    let n = parse_i64_strict(self.buf.as_slice())?;
                    let n = if n < 0 { 0 } else { n as usize };
                    for _ in 0..n {
                        self.discard_value_at_depth(depth + 1).await?;
                    }
                    Ok(())
                }
            }
        })
    }

    pub async fn discard_n_values(&mut self, n: usize) -> RespdResult<()> {
        for _ in 0..n {
            self.discard_value().await?;
        }
        Ok(())
    }
}

/// Implemented by types that readEnum can recover from a case-insensitive
/// match against a RESP string
pub trait RespEnum: Sized {
    fn from_bytes_ci(bytes: &[u8]) -> Option<Self>;
}

#[cfg(test)]
mod tests;
