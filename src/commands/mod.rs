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

//! Canonical command handlers, matched by lowercased command name.

mod append;
mod client_cmd;
mod command_cmd;
mod get;
mod incr;
mod ping;
mod quit;
mod scan;
mod set;

use crate::dispatch::{Context, Outcome};
use crate::error::{RespdError, RespdResult};
use tokio::io::{AsyncRead, AsyncWrite};

pub async fn dispatch<R, W>(ctx: &mut Context<'_, R, W>) -> RespdResult<Outcome>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    match ctx.command_name() {
        "ping" => ping::handle(ctx).await,
        "quit" => quit::handle(ctx).await,
        "get" => get::handle(ctx).await,
        "set" => set::handle(ctx).await,
        "append" => append::handle(ctx).await,
        "incr" => incr::handle_incr(ctx).await,
        "decr" => incr::handle_decr(ctx).await,
        "incrby" => incr::handle_incrby(ctx).await,
        "decrby" => incr::handle_decrby(ctx).await,
        "scan" => scan::handle(ctx).await,
        "client" => client_cmd::handle(ctx).await,
        "command" => command_cmd::handle(ctx).await,
        _ => Err(RespdError::invalid_params("unknown command".to_owned())),
    }
}
