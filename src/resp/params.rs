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

//! `readParameters`: a positional-then-flags argument reader shared by
//! commands such as `SCAN` that mix ordered arguments with named options.
//!
//! Positional fields are consumed first, in order. An optional field may be
//! pre-empted by the flag phase: if the token read for it turns out to match
//! a known flag name rather than parsing as that field's type, positional
//! consumption stops there and the already-read token is reinterpreted as the
//! first flag name, never pushed back onto the stream.

use super::reader::{parse_i64_strict, ParamToken, RespReader};
use crate::error::{RespdError, RespdResult};
use tokio::io::AsyncRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Bytes,
}

#[derive(Debug, Clone, Copy)]
pub struct PositionalField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Int,
    Bytes,
    Bool,
}

#[derive(Debug, Clone, Copy)]
pub struct FlagField {
    pub name: &'static str,
    pub kind: FlagKind,
}

#[derive(Debug, Clone)]
pub enum ParamValue {
    Int(i64),
    Bytes(Vec<u8>),
    Bool(bool),
}

#[derive(Debug, Default)]
pub struct ParamResult {
    positionals: Vec<(&'static str, ParamValue)>,
    flags: Vec<(&'static str, ParamValue)>,
    pub consumed: usize,
}

impl ParamResult {
    pub fn positional(&self, name: &str) -> Option<&ParamValue> {
        self.positionals.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
    pub fn flag(&self, name: &str) -> Option<&ParamValue> {
        self.flags.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

fn find_flag<'a>(flags: &'a [FlagField], bytes: &[u8]) -> Option<&'a FlagField> {
    let s = std::str::from_utf8(bytes).ok()?;
    flags.iter().find(|f| f.name.eq_ignore_ascii_case(s))
}

impl<R: AsyncRead + Unpin + Send> RespReader<R> {
    /// Reads at most `max` remaining array elements into `positionals` then
    /// `flags`, per the algorithm described above.
    pub async fn read_parameters(
        &mut self,
        max: usize,
        positionals: &[PositionalField],
        flags: &[FlagField],
    ) -> RespdResult<ParamResult> {
        let mut result = ParamResult::default();
        let mut pos_idx = 0usize;
        let mut pending_flag_name: Option<String> = None;

        while result.consumed < max && pos_idx < positionals.len() {
            let field = &positionals[pos_idx];
            let token = self.read_value_token().await?;
            result.consumed += 1;
            match (field.kind, token) {
                (FieldKind::Int, ParamToken::Int(i)) => {
                    result.positionals.push((field.name, ParamValue::Int(i)));
                    pos_idx += 1;
                }
                (FieldKind::Int, ParamToken::Bytes(b)) => match parse_i64_strict(&b) {
                    Ok(i) => {
                        result.positionals.push((field.name, ParamValue::Int(i)));
                        pos_idx += 1;
                    }
                    Err(_) if !field.required && find_flag(flags, &b).is_some() => {
                        pending_flag_name = Some(String::from_utf8_lossy(&b).into_owned());
                        break;
                    }
                    Err(_) => {
                        return Err(RespdError::invalid_params(format!(
                            "expected an integer for '{}'",
                            field.name
                        )));
                    }
                },
                (FieldKind::Int, ParamToken::Null) => {
                    return Err(RespdError::invalid_params(format!(
                        "'{}' cannot be null",
                        field.name
                    )));
                }
                (FieldKind::Bytes, ParamToken::Bytes(b)) => {
                    if !field.required {
                        if let Some(f) = find_flag(flags, &b) {
                            pending_flag_name = Some(f.name.to_owned());
                            break;
                        }
                    }
                    result.positionals.push((field.name, ParamValue::Bytes(b)));
                    pos_idx += 1;
                }
                (FieldKind::Bytes, ParamToken::Int(i)) => {
                    result
                        .positionals
                        .push((field.name, ParamValue::Bytes(i.to_string().into_bytes())));
                    pos_idx += 1;
                }
                (FieldKind::Bytes, ParamToken::Null) => {
                    result.positionals.push((field.name, ParamValue::Bytes(Vec::new())));
                    pos_idx += 1;
                }
            }
        }

        for field in &positionals[pos_idx..] {
            if field.required {
                return Err(RespdError::invalid_params(format!("missing argument '{}'", field.name)));
            }
        }

        loop {
            if result.consumed >= max {
                break;
            }
            let flag_name = match pending_flag_name.take() {
                Some(name) => name,
                None => match self.read_value_token().await? {
                    ParamToken::Bytes(b) => {
                        result.consumed += 1;
                        String::from_utf8_lossy(&b).into_owned()
                    }
                    _ => return Err(RespdError::invalid_params("expected a flag name")),
                },
            };
            let Some(field) = flags.iter().find(|f| f.name.eq_ignore_ascii_case(&flag_name)) else {
                return Err(RespdError::invalid_params(format!("unknown flag '{flag_name}'")));
            };
            match field.kind {
                FlagKind::Bool => result.flags.push((field.name, ParamValue::Bool(true))),
                FlagKind::Int => {
                    if result.consumed >= max {
                        return Err(RespdError::invalid_params(format!(
                            "missing value for '{flag_name}'"
                        )));
                    }
                    let v = self.read_i64_string().await?;
                    result.consumed += 1;
                    result.flags.push((field.name, ParamValue::Int(v)));
                }
                FlagKind::Bytes => {
                    if result.consumed >= max {
                        return Err(RespdError::invalid_params(format!(
                            "missing value for '{flag_name}'"
                        )));
                    }
                    let v = self.read_string().await?.unwrap_or_default();
                    result.consumed += 1;
                    result.flags.push((field.name, ParamValue::Bytes(v)));
                }
            }
        }

        Ok(result)
    }
}
