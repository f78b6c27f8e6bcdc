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

//! # The RESP writer
//!
//! Writes RESP values to an asynchronous byte sink. Every call is a full,
//! buffered write of one value; the writer never partially emits a type.

use crate::error::{RespdError, RespdResult};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Largest bulk string this server will ever emit
pub const MAX_BULK_LEN: i64 = 500 * 1024 * 1024;

pub mod groups {
    //! Precompiled, commonly-sent reply bodies
    pub const OK: &[u8] = b"+OK\r\n";
    pub const PONG: &[u8] = b"+PONG\r\n";
    pub const NIL: &[u8] = b"$-1\r\n";
}

pub struct RespWriter<W> {
    inner: W,
    /// Set once any byte has been written on behalf of the in-flight command;
    /// used by the connection loop to tell a partial write apart from a
    /// handler that bailed before producing output
    wrote_any: bool,
}

impl<W: AsyncWrite + Unpin + Send> RespWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, wrote_any: false }
    }

    /// True if this writer has produced at least one byte since construction
    /// or the last [`RespWriter::reset_activity`]
    pub fn wrote_any(&self) -> bool {
        self.wrote_any
    }

    pub fn reset_activity(&mut self) {
        self.wrote_any = false;
    }

    async fn write_raw(&mut self, bytes: &[u8]) -> RespdResult<()> {
        self.inner.write_all(bytes).await?;
        self.wrote_any = true;
        Ok(())
    }

    pub async fn write_integer(&mut self, value: i64) -> RespdResult<()> {
        self.write_raw(format!(":{value}\r\n").as_bytes()).await
    }

    pub async fn write_array_header(&mut self, len: usize) -> RespdResult<()> {
        self.write_raw(format!("*{len}\r\n").as_bytes()).await
    }

    pub async fn write_bulk_string(&mut self, bytes: &[u8]) -> RespdResult<()> {
        if bytes.len() as i64 > MAX_BULK_LEN {
            return Err(RespdError::invalid_value("bulk string exceeds the maximum length"));
        }
        self.write_raw(format!("${}\r\n", bytes.len()).as_bytes()).await?;
        self.write_raw(bytes).await?;
        self.write_raw(b"\r\n").await
    }

    pub async fn write_null(&mut self) -> RespdResult<()> {
        self.write_raw(groups::NIL).await
    }

    pub async fn write_simple_string(&mut self, s: &str) -> RespdResult<()> {
        debug_assert!(!s.contains(['\r', '\n']), "simple strings cannot contain CRLF");
        self.write_raw(b"+").await?;
        self.write_raw(s.as_bytes()).await?;
        self.write_raw(b"\r\n").await
    }

    pub async fn write_ok(&mut self) -> RespdResult<()> {
        self.write_raw(groups::OK).await
    }

    /// `-<message>\r\n`. `message` must not contain CR or LF.
    pub async fn write_error(&mut self, message: &str) -> RespdResult<()> {
        self.write_raw(b"-").await?;
        self.write_raw(message.as_bytes()).await?;
        self.write_raw(b"\r\n").await
    }

    pub async fn flush(&mut self) -> RespdResult<()> {
        self.inner.flush().await?;
        Ok(())
    }
}
