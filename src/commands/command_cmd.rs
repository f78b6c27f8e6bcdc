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

//! `COMMAND`: clients (notably redis-cli) probe this at connect time before
//! doing anything useful. An empty array is a legal, if uninformative, reply.

use crate::dispatch::{Context, Outcome};
use crate::error::RespdResult;
use tokio::io::{AsyncRead, AsyncWrite};

pub async fn handle<R, W>(ctx: &mut Context<'_, R, W>) -> RespdResult<Outcome>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    ctx.writer.write_array_header(0).await?;
    Ok(Outcome::Continue)
}
