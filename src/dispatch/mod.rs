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

//! Reads one command envelope off the wire, looks up its handler by
//! lowercased name, and enforces the "whatever the handler didn't consume
//! gets discarded" invariant so one malformed or over-eager handler can never
//! leave the stream unaligned for the next command.

use crate::client::Client;
use crate::commands;
use crate::error::{RespdError, RespdResult};
use crate::resp::{FlagField, ParamResult, PositionalField, RespEnum, RespReader, RespWriter};
use crate::store::Store;
use tokio::io::{AsyncRead, AsyncWrite};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

fn wrong_arg_count(command_name: &str) -> RespdError {
    RespdError::invalid_params(format!(
        "wrong number of arguments for '{command_name}' command"
    ))
}

/// Binds one command's reader, writer, store and client handle, and tracks
/// how many envelope elements a handler has yet to consume
pub struct Context<'a, R, W> {
    pub reader: &'a mut RespReader<R>,
    pub writer: &'a mut RespWriter<W>,
    pub store: &'a Store,
    pub client: &'a Client,
    command_name: &'a str,
    remaining: usize,
}

impl<'a, R, W> Context<'a, R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn command_name(&self) -> &str {
        self.command_name
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn exact_arg_num(&self, n: usize) -> RespdResult<()> {
        if self.remaining == n {
            Ok(())
        } else {
            Err(wrong_arg_count(self.command_name))
        }
    }

    pub fn min_arg_num(&self, n: usize) -> RespdResult<()> {
        if self.remaining >= n {
            Ok(())
        } else {
            Err(wrong_arg_count(self.command_name))
        }
    }

    pub fn max_arg_num(&self, n: usize) -> RespdResult<()> {
        if self.remaining <= n {
            Ok(())
        } else {
            Err(wrong_arg_count(self.command_name))
        }
    }

    async fn take_one(&mut self) -> RespdResult<()> {
        if self.remaining == 0 {
            return Err(wrong_arg_count(self.command_name));
        }
        self.remaining -= 1;
        Ok(())
    }

    pub async fn next_string(&mut self) -> RespdResult<Option<Vec<u8>>> {
        self.take_one().await?;
        self.reader.read_string().await
    }

    pub async fn next_i64_string(&mut self) -> RespdResult<i64> {
        self.take_one().await?;
        self.reader.read_i64_string().await
    }

    pub async fn next_enum<T: RespEnum>(&mut self) -> RespdResult<T> {
        self.take_one().await?;
        self.reader.read_enum().await
    }

    pub async fn read_parameters(
        &mut self,
        positionals: &[PositionalField],
        flags: &[FlagField],
    ) -> RespdResult<ParamResult> {
        let result = self.reader.read_parameters(self.remaining, positionals, flags).await?;
        self.remaining -= result.consumed;
        Ok(result)
    }

    async fn discard_remaining(&mut self) -> RespdResult<()> {
        if self.remaining > 0 {
            log::warn!(
                "'{}': discarding {} unread argument(s)",
                self.command_name,
                self.remaining
            );
            self.reader.discard_n_values(self.remaining).await?;
            self.remaining = 0;
        }
        Ok(())
    }
}

/// Reads and fully executes one command. On success or on a non-unframing
/// error, any arguments the handler left unread are drained so the next
/// command on this connection starts aligned.
pub async fn execute<R, W>(
    reader: &mut RespReader<R>,
    writer: &mut RespWriter<W>,
    store: &Store,
    client: &Client,
) -> RespdResult<Outcome>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let argc = reader.read_array_header().await?;
    if argc <= 0 {
        return Err(RespdError::protocol("empty command envelope"));
    }
    let total = argc as usize;
    let name_bytes = reader
        .read_string()
        .await?
        .ok_or_else(|| RespdError::protocol("command name cannot be null"))?;
    let name = String::from_utf8_lossy(&name_bytes).to_lowercase();

    let mut ctx = Context {
        reader,
        writer,
        store,
        client,
        command_name: &name,
        remaining: total - 1,
    };

    match commands::dispatch(&mut ctx).await {
        Ok(outcome) => {
            ctx.discard_remaining().await?;
            Ok(outcome)
        }
        Err(e) => {
            if !e.is_unframing() {
                ctx.discard_remaining().await.ok();
            }
            Err(e)
        }
    }
}
