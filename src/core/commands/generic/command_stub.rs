// src/core/commands/generic/command_stub.rs

//! A minimal stand-in for `COMMAND`, which many clients probe on connect.
//! Real introspection (arity tables, per-command flags) is not offered; any
//! arguments are accepted and ignored.

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::errors::BasaltError;
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::RespValue;
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct CommandStub;

impl ParseCommand for CommandStub {
    fn parse(_args: &[RespFrame]) -> Result<Self, BasaltError> {
        Ok(CommandStub)
    }
}

#[async_trait]
impl ExecutableCommand for CommandStub {
    async fn execute(
        &self,
        _ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        Ok((
            RespValue::SimpleString("OK".to_string()),
            WriteOutcome::DidNotWrite,
        ))
    }
}

impl CommandSpec for CommandStub {
    fn name(&self) -> &'static str {
        "command"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![]
    }
}
