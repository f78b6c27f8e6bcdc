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
use crate::store::IncrError;
use tokio::io::{AsyncRead, AsyncWrite};

async fn finish<R, W>(ctx: &mut Context<'_, R, W>, key: &[u8], delta: i64) -> RespdResult<Outcome>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    match ctx.store.add(key, delta) {
        Ok(n) => {
            ctx.writer.write_integer(n).await?;
            Ok(Outcome::Continue)
        }
        Err(IncrError::NotAnInteger) => Err(RespdError::invalid_value(
            "cannot perform incr or decr operation on non-integer value",
        )),
        Err(IncrError::Overflow) => {
            Err(RespdError::invalid_value("operation resulted in integer overflow"))
        }
    }
}

pub async fn handle_incr<R, W>(ctx: &mut Context<'_, R, W>) -> RespdResult<Outcome>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    ctx.exact_arg_num(1)?;
    let key = ctx
        .next_string()
        .await?
        .ok_or_else(|| RespdError::invalid_params("key cannot be null"))?;
    finish(ctx, &key, 1).await
}

pub async fn handle_decr<R, W>(ctx: &mut Context<'_, R, W>) -> RespdResult<Outcome>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    ctx.exact_arg_num(1)?;
    let key = ctx
        .next_string()
        .await?
        .ok_or_else(|| RespdError::invalid_params("key cannot be null"))?;
    finish(ctx, &key, -1).await
}

pub async fn handle_incrby<R, W>(ctx: &mut Context<'_, R, W>) -> RespdResult<Outcome>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    ctx.exact_arg_num(2)?;
    let key = ctx
        .next_string()
        .await?
        .ok_or_else(|| RespdError::invalid_params("key cannot be null"))?;
    let amount = ctx.next_i64_string().await?;
    finish(ctx, &key, amount).await
}

pub async fn handle_decrby<R, W>(ctx: &mut Context<'_, R, W>) -> RespdResult<Outcome>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    ctx.exact_arg_num(2)?;
    let key = ctx
        .next_string()
        .await?
        .ok_or_else(|| RespdError::invalid_params("key cannot be null"))?;
    let amount = ctx.next_i64_string().await?;
    let delta = amount
        .checked_neg()
        .ok_or_else(|| RespdError::invalid_value("operation resulted in integer overflow"))?;
    finish(ctx, &key, delta).await
}
