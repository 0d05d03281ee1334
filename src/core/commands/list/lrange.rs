// src/core/commands/list/lrange.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, extract_string, validate_arg_count};
use crate::core::commands::list::logic::normalize_range;
use crate::core::errors::BasaltError;
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::RespValue;
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct LRange {
    pub key: Bytes,
    pub start: i64,
    pub stop: i64,
}

impl ParseCommand for LRange {
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
        validate_arg_count(args, 3, "lrange")?;
        Ok(LRange {
            key: extract_bytes(&args[0])?,
            start: extract_string(&args[1])?
                .parse()
                .map_err(|_| BasaltError::NotAnInteger)?,
            stop: extract_string(&args[2])?
                .parse()
                .map_err(|_| BasaltError::NotAnInteger)?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for LRange {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        ctx.db.check_is_list(&self.key)?;
        let len = ctx.db.lists.len(&self.key) as i64;
        let Some((start, stop)) = normalize_range(len, self.start, self.stop) else {
            return Ok((RespValue::Array(vec![]), WriteOutcome::DidNotWrite));
        };

        let values = ctx
            .db
            .lists
            .range(&self.key, start, stop)
            .into_iter()
            .map(RespValue::BulkString)
            .collect();
        Ok((RespValue::Array(values), WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for LRange {
    fn name(&self) -> &'static str {
        "lrange"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![
            self.key.clone(),
            self.start.to_string().into(),
            self.stop.to_string().into(),
        ]
    }
}
