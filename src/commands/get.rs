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
use crate::error::{RespdError, RespdResult};
use crate::store::EntryValue;
use tokio::io::{AsyncRead, AsyncWrite};

pub async fn handle<R, W>(ctx: &mut Context<'_, R, W>) -> RespdResult<Outcome>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    ctx.exact_arg_num(1)?;
    let key = ctx
        .next_string()
        .await?
        .ok_or_else(|| RespdError::invalid_params("key cannot be null"))?;
    match ctx.store.get(&key) {
        Some(entry) => match entry.read() {
            EntryValue::Int64(i) => ctx.writer.write_integer(i).await?,
            EntryValue::Binary(b) => ctx.writer.write_bulk_string(&b).await?,
        },
        None => ctx.writer.write_null().await?,
    }
    Ok(Outcome::Continue)
}
