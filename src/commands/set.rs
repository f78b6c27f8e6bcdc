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

//! `SET key value [...]`: extra trailing arguments beyond `key`/`value` are
//! tolerated and ignored rather than rejected — the dispatcher drains them
//! generically once this handler returns. A null `value` deletes the key
//! rather than storing it, since there's no value to store.

use crate::dispatch::{Context, Outcome};
use crate::error::{RespdError, RespdResult};
use crate::store::EntryValue;
use tokio::io::{AsyncRead, AsyncWrite};

pub async fn handle<R, W>(ctx: &mut Context<'_, R, W>) -> RespdResult<Outcome>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    ctx.min_arg_num(2)?;
    let key = ctx
        .next_string()
        .await?
        .ok_or_else(|| RespdError::invalid_params("key cannot be null"))?;
    match ctx.next_string().await? {
        Some(value) => ctx.store.set(&key, EntryValue::Binary(value)),
        None => {
            ctx.store.del(&key);
        }
    }
    ctx.writer.write_ok().await?;
    Ok(Outcome::Continue)
}
