// src/core/commands/streams/xread.rs

//! Implements `XREAD [BLOCK ms] STREAMS key [key ...] id [id ...]`.

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::commands::streams::xrange::format_entry;
use crate::core::errors::BasaltError;
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::storage::stream::StreamId;
use crate::core::RespValue;
use async_trait::async_trait;
use bytes::Bytes;
use std::ops::Bound;

#[derive(Debug, Clone, PartialEq)]
pub enum StreamIdSpec {
    Exact(StreamId),
    Last,
}

#[derive(Debug, Clone, Default)]
pub struct XRead {
    pub streams: Vec<(Bytes, StreamIdSpec)>,
    pub block_ms: Option<u64>,
}

impl ParseCommand for XRead {
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
        let mut cmd = XRead::default();
        let mut i = 0;

        while i < args.len() {
            let Ok(arg_str) = extract_string(&args[i]) else {
                break;
            };
            match arg_str.to_ascii_lowercase().as_str() {
                "block" => {
                    i += 1;
                    if i >= args.len() {
                        return Err(BasaltError::SyntaxError);
                    }
                    cmd.block_ms = Some(
                        extract_string(&args[i])?
                            .parse()
                            .map_err(|_| BasaltError::NotAnInteger)?,
                    );
                    i += 1;
                }
                "streams" => {
                    i += 1;
                    break;
                }
                _ => return Err(BasaltError::SyntaxError),
            }
        }

        let remaining = &args[i..];
        if remaining.is_empty() || remaining.len() % 2 != 0 {
            return Err(BasaltError::WrongArgumentCount("xread".to_string()));
        }
        let num_streams = remaining.len() / 2;
        let keys = &remaining[..num_streams];
        let ids = &remaining[num_streams..];

        for (key_frame, id_frame) in keys.iter().zip(ids.iter()) {
            let key = extract_bytes(key_frame)?;
            let id_str = extract_string(id_frame)?;
            let id_spec = if id_str == "$" {
                StreamIdSpec::Last
            } else {
                StreamIdSpec::Exact(
                    id_str
                        .parse::<StreamId>()
                        .map_err(|_| BasaltError::SyntaxError)?,
                )
            };
            cmd.streams.push((key, id_spec));
        }

        Ok(cmd)
    }
}

impl XRead {
    /// Resolves every `$` to the stream's current last ID exactly once, up
    /// front, so blocking waits for entries appended *after* this call.
    fn resolve_start_ids(&self, ctx: &ExecutionContext) -> Vec<(Bytes, StreamId)> {
        self.streams
            .iter()
            .map(|(key, spec)| {
                let start = match spec {
                    StreamIdSpec::Exact(id) => *id,
                    StreamIdSpec::Last => ctx
                        .db
                        .streams
                        .read(key, |s| s.map(|s| s.last_generated_id).unwrap_or_default()),
                };
                (key.clone(), start)
            })
            .collect()
    }

    fn read_once(ctx: &ExecutionContext, resolved: &[(Bytes, StreamId)]) -> Vec<RespValue> {
        resolved
            .iter()
            .filter_map(|(key, start)| {
                let entries: Vec<RespValue> = ctx.db.streams.read(key, |stream| {
                    let Some(stream) = stream else {
                        return Vec::new();
                    };
                    stream
                        .entries
                        .range((Bound::Excluded(*start), Bound::Unbounded))
                        .map(|(id, entry)| format_entry(id, entry))
                        .collect()
                });
                if entries.is_empty() {
                    None
                } else {
                    Some(RespValue::Array(vec![
                        RespValue::BulkString(key.clone()),
                        RespValue::Array(entries),
                    ]))
                }
            })
            .collect()
    }
}

#[async_trait]
impl ExecutableCommand for XRead {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        for (key, _) in &self.streams {
            ctx.db.check_is_stream(key)?;
        }

        let resolved = self.resolve_start_ids(ctx);
        let results = Self::read_once(ctx, &resolved);
        if !results.is_empty() {
            return Ok((RespValue::Array(results), WriteOutcome::DidNotWrite));
        }

        let Some(block_ms) = self.block_ms else {
            return Ok((RespValue::NullArray, WriteOutcome::DidNotWrite));
        };

        let keys: Vec<Bytes> = resolved.iter().map(|(k, _)| k.clone()).collect();
        let mut latest = Vec::new();
        let woke = ctx
            .state
            .stream_blocker_manager
            .block_until(&keys, block_ms, || {
                latest = Self::read_once(ctx, &resolved);
                !latest.is_empty()
            })
            .await;

        if woke && !latest.is_empty() {
            Ok((RespValue::Array(latest), WriteOutcome::DidNotWrite))
        } else {
            Ok((RespValue::NullArray, WriteOutcome::DidNotWrite))
        }
    }
}

impl CommandSpec for XRead {
    fn name(&self) -> &'static str {
        "xread"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        let mut args = Vec::new();
        if let Some(ms) = self.block_ms {
            args.extend([Bytes::from_static(b"BLOCK"), ms.to_string().into()]);
        }
        args.push(Bytes::from_static(b"STREAMS"));
        let (keys, ids): (Vec<_>, Vec<_>) = self.streams.iter().cloned().unzip();
        args.extend(keys);
        args.extend(ids.into_iter().map(|spec| match spec {
            StreamIdSpec::Exact(id) => id.to_string().into(),
            StreamIdSpec::Last => Bytes::from_static(b"$"),
        }));
        args
    }
}
