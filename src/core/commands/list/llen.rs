// src/core/commands/list/llen.rs

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
pub struct LLen {
    pub key: Bytes,
}

impl ParseCommand for LLen {
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
        validate_arg_count(args, 1, "llen")?;
        Ok(LLen {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for LLen {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        ctx.db.check_is_list(&self.key)?;
        let len = ctx.db.lists.len(&self.key);
        Ok((RespValue::Integer(len as i64), WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for LLen {
    fn name(&self) -> &'static str {
        "llen"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
