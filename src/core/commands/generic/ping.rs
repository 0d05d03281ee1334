// src/core/commands/generic/ping.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::extract_bytes;
use crate::core::errors::BasaltError;
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::RespValue;
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct Ping {
    pub message: Option<Bytes>,
}

impl ParseCommand for Ping {
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
        match args.len() {
            0 => Ok(Ping { message: None }),
            1 => Ok(Ping {
                message: Some(extract_bytes(&args[0])?),
            }),
            _ => Err(BasaltError::WrongArgumentCount("ping".to_string())),
        }
    }
}

#[async_trait]
impl ExecutableCommand for Ping {
    async fn execute(
        &self,
        _ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        let reply = match &self.message {
            Some(msg) => RespValue::BulkString(msg.clone()),
            None => RespValue::SimpleString("PONG".to_string()),
        };
        Ok((reply, WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for Ping {
    fn name(&self) -> &'static str {
        "ping"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        self.message.clone().into_iter().collect()
    }
}
