// src/core/commands/streams/xrange.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, extract_string, validate_arg_count};
use crate::core::errors::BasaltError;
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::storage::stream::{StreamEntry, StreamId};
use crate::core::RespValue;
use async_trait::async_trait;
use bytes::Bytes;
use std::ops::Bound;

#[derive(Debug, Clone, Default)]
pub struct XRange {
    pub key: Bytes,
    pub start: StreamId,
    pub end: StreamId,
}

/// A bare millis value (no `-seq` part) expands to sequence `0` on the start
/// side, so it includes every entry at that millisecond, but to sequence
/// `u64::MAX` on the end side, so it includes every entry at that
/// millisecond too rather than cutting them off at sequence `0`.
fn parse_boundary(s: &str, is_end: bool) -> Result<StreamId, BasaltError> {
    match s {
        "-" => Ok(StreamId::MIN),
        "+" => Ok(StreamId::MAX),
        _ if is_end && !s.contains('-') => {
            let millis: u64 = s.parse().map_err(|_| BasaltError::SyntaxError)?;
            Ok(StreamId::new(millis, u64::MAX))
        }
        _ => s.parse::<StreamId>().map_err(|_| BasaltError::SyntaxError),
    }
}

impl ParseCommand for XRange {
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
        validate_arg_count(args, 3, "xrange")?;
        Ok(XRange {
            key: extract_bytes(&args[0])?,
            start: parse_boundary(&extract_string(&args[1])?, false)?,
            end: parse_boundary(&extract_string(&args[2])?, true)?,
        })
    }
}

pub fn format_entry(id: &StreamId, entry: &StreamEntry) -> RespValue {
    let mut fields = Vec::with_capacity(entry.fields.len() * 2);
    for (k, v) in &entry.fields {
        fields.push(RespValue::BulkString(k.clone()));
        fields.push(RespValue::BulkString(v.clone()));
    }
    RespValue::Array(vec![
        RespValue::BulkString(id.to_string().into()),
        RespValue::Array(fields),
    ])
}

#[async_trait]
impl ExecutableCommand for XRange {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        ctx.db.check_is_stream(&self.key)?;
        let results = ctx.db.streams.read(&self.key, |stream| {
            let Some(stream) = stream else {
                return Vec::new();
            };
            stream
                .entries
                .range((Bound::Included(self.start), Bound::Included(self.end)))
                .map(|(id, entry)| format_entry(id, entry))
                .collect()
        });
        Ok((RespValue::Array(results), WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for XRange {
    fn name(&self) -> &'static str {
        "xrange"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![
            self.key.clone(),
            self.start.to_string().into(),
            self.end.to_string().into(),
        ]
    }
}
