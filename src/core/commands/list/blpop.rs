// src/core/commands/list/blpop.rs

//! Implements `BLPOP key timeout_seconds`, blocking the calling connection
//! until an element is available or the timeout elapses.

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, extract_string, validate_arg_count};
use crate::core::errors::BasaltError;
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::RespValue;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct BLPop {
    pub key: Bytes,
    pub timeout: Duration,
}

impl ParseCommand for BLPop {
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
        validate_arg_count(args, 2, "blpop")?;
        let key = extract_bytes(&args[0])?;
        let timeout_secs: f64 = extract_string(&args[1])?
            .parse()
            .map_err(|_| BasaltError::NotAFloat)?;
        if !timeout_secs.is_finite() || timeout_secs < 0.0 {
            return Err(BasaltError::NotAFloat);
        }
        let timeout = Duration::from_secs_f64(timeout_secs);
        Ok(BLPop { key, timeout })
    }
}

#[async_trait]
impl ExecutableCommand for BLPop {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        let popped = ctx
            .state
            .blocker_manager
            .block_on_pop(&ctx.db, &self.key, self.timeout)
            .await?;

        match popped {
            Some(value) => Ok((
                RespValue::Array(vec![
                    RespValue::BulkString(self.key.clone()),
                    RespValue::BulkString(value),
                ]),
                WriteOutcome::Write { keys_modified: 1 },
            )),
            None => Ok((RespValue::NullArray, WriteOutcome::DidNotWrite)),
        }
    }
}

impl CommandSpec for BLPop {
    fn name(&self) -> &'static str {
        "blpop"
    }
    fn flags(&self) -> CommandFlags {
        // Propagated to replicas as an equivalent LPOP by the connection
        // handler, since a replica must never itself block.
        CommandFlags::WRITE
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![self.key.clone(), self.timeout.as_secs_f64().to_string().into()]
    }
}
