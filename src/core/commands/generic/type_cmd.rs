// src/core/commands/generic/type_cmd.rs

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
pub struct TypeCmd {
    pub key: Bytes,
}

impl ParseCommand for TypeCmd {
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
        validate_arg_count(args, 1, "type")?;
        Ok(TypeCmd {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for TypeCmd {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        Ok((
            RespValue::SimpleString(ctx.db.type_of(&self.key).to_string()),
            WriteOutcome::DidNotWrite,
        ))
    }
}

impl CommandSpec for TypeCmd {
    fn name(&self) -> &'static str {
        "type"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
