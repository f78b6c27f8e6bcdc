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

use crate::dispatch::{Context, Outcome};
use crate::error::RespdResult;
use tokio::io::{AsyncRead, AsyncWrite};

pub async fn handle<R, W>(ctx: &mut Context<'_, R, W>) -> RespdResult<Outcome>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    ctx.max_arg_num(1)?;
    if ctx.remaining() == 1 {
        let message = ctx.next_string().await?.unwrap_or_default();
        ctx.writer.write_bulk_string(&message).await?;
    } else {
        ctx.writer.write_simple_string("PONG").await?;
    }
    Ok(Outcome::Continue)
}
