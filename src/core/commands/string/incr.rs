// src/core/commands/string/incr.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::errors::BasaltError;
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::RespValue;
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct Incr {
    pub key: Bytes,
}

impl ParseCommand for Incr {
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
        validate_arg_count(args, 1, "incr")?;
        Ok(Incr {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Incr {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        ctx.db.check_is_list(&self.key)?;
        ctx.db.check_is_stream(&self.key)?;
        let new_val = ctx.db.strings.incr_by(&self.key, 1)?;
        Ok((
            RespValue::Integer(new_val),
            WriteOutcome::Write { keys_modified: 1 },
        ))
    }
}

impl CommandSpec for Incr {
    fn name(&self) -> &'static str {
        "incr"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
