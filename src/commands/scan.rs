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
use crate::resp::{FieldKind, FlagField, FlagKind, ParamValue, PositionalField};
use tokio::io::{AsyncRead, AsyncWrite};

const POSITIONALS: &[PositionalField] =
    &[PositionalField { name: "cursor", kind: FieldKind::Int, required: true }];

const FLAGS: &[FlagField] = &[
    FlagField { name: "MATCH", kind: FlagKind::Bytes },
    FlagField { name: "COUNT", kind: FlagKind::Int },
];

const DEFAULT_COUNT: usize = 10;

pub async fn handle<R, W>(ctx: &mut Context<'_, R, W>) -> RespdResult<Outcome>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    ctx.min_arg_num(1)?;
    let params = ctx.read_parameters(POSITIONALS, FLAGS).await?;

    let cursor = match params.positional("cursor") {
        Some(ParamValue::Int(i)) => *i as u64,
        _ => unreachable!("cursor is a required positional field"),
    };
    let count = match params.flag("COUNT") {
        Some(ParamValue::Int(n)) if *n > 0 => *n as usize,
        _ => DEFAULT_COUNT,
    };
    let pattern = match params.flag("MATCH") {
        Some(ParamValue::Bytes(b)) => Some(b.as_slice()),
        _ => None,
    };

    let (next_cursor, keys) = ctx.store.scan(cursor, count, pattern);

    ctx.writer.write_array_header(2).await?;
    ctx.writer.write_integer(next_cursor as i64).await?;
    ctx.writer.write_array_header(keys.len()).await?;
    for key in keys {
        ctx.writer.write_bulk_string(&key).await?;
    }
    Ok(Outcome::Continue)
}
