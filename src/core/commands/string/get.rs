// src/core/commands/string/get.rs

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
pub struct Get {
    pub key: Bytes,
}

impl ParseCommand for Get {
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
        validate_arg_count(args, 1, "get")?;
        Ok(Get {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Get {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        ctx.db.check_is_string(&self.key)?;
        let reply = match ctx.db.strings.get(&self.key) {
            Some(v) => RespValue::BulkString(v),
            None => RespValue::Null,
        };
        Ok((reply, WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for Get {
    fn name(&self) -> &'static str {
        "get"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
