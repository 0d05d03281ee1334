// src/core/commands/generic/replconf.rs

//! `REPLCONF` is used during and after the replication handshake. Every
//! subform besides `GETACK` is answered with a plain `+OK` from here;
//! `GETACK` must be answered with the caller's real applied-byte offset,
//! which only the replica's connection task knows, so it is intercepted
//! before reaching normal dispatch.

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::extract_string;
use crate::core::errors::BasaltError;
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::RespValue;
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct Replconf {
    pub args: Vec<String>,
}

impl ParseCommand for Replconf {
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
        let args = args
            .iter()
            .map(extract_string)
            .collect::<Result<_, _>>()?;
        Ok(Replconf { args })
    }
}

#[async_trait]
impl ExecutableCommand for Replconf {
    async fn execute(
        &self,
        _ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        if self.args.first().is_some_and(|a| a.eq_ignore_ascii_case("getack")) {
            return Err(BasaltError::Internal(
                "REPLCONF GETACK must be handled by the connection layer".into(),
            ));
        }
        Ok((
            RespValue::SimpleString("OK".to_string()),
            WriteOutcome::DidNotWrite,
        ))
    }
}

impl CommandSpec for Replconf {
    fn name(&self) -> &'static str {
        "replconf"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::NO_PROPAGATE
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        self.args.iter().map(|s| Bytes::from(s.clone())).collect()
    }
}
