// src/core/commands/generic/psync.rs

//! `PSYNC` triggers a full replica handoff: the connection handler detects it
//! before normal dispatch and takes over the socket entirely, so `execute`
//! here only guards against the command ever being reached through a path
//! that forgot to special-case it.

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_string, validate_arg_count};
use crate::core::errors::BasaltError;
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::RespValue;
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct Psync {
    pub replication_id: String,
    pub offset: String,
}

impl ParseCommand for Psync {
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
        validate_arg_count(args, 2, "psync")?;
        Ok(Psync {
            replication_id: extract_string(&args[0])?,
            offset: extract_string(&args[1])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Psync {
    async fn execute(
        &self,
        _ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        Err(BasaltError::Internal(
            "PSYNC must be handled by the connection layer".into(),
        ))
    }
}

impl CommandSpec for Psync {
    fn name(&self) -> &'static str {
        "psync"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::NO_PROPAGATE
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![
            Bytes::from(self.replication_id.clone()),
            Bytes::from(self.offset.clone()),
        ]
    }
}
