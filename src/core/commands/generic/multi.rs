// src/core/commands/generic/multi.rs

//! `MULTI`/`EXEC`/`DISCARD` are transaction-boundary markers. The actual
//! state machine (queuing subsequent commands, running the batch on `EXEC`)
//! lives in the connection layer, which sees every command before dispatch;
//! these `execute` bodies only guard against being reached directly.

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

macro_rules! transaction_marker {
    ($name:ident, $lower:expr, $err:expr) => {
        #[derive(Debug, Clone, Default)]
        pub struct $name;

        impl ParseCommand for $name {
            fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
                if !args.is_empty() {
                    return Err(BasaltError::WrongArgumentCount($lower.to_string()));
                }
                Ok($name)
            }
        }

        #[async_trait]
        impl ExecutableCommand for $name {
            async fn execute(
                &self,
                _ctx: &ExecutionContext,
            ) -> Result<(RespValue, WriteOutcome), BasaltError> {
                Err($err)
            }
        }

        impl CommandSpec for $name {
            fn name(&self) -> &'static str {
                $lower
            }
            fn flags(&self) -> CommandFlags {
                CommandFlags::NO_PROPAGATE
            }
            fn to_resp_args(&self) -> Vec<Bytes> {
                vec![]
            }
        }
    };
}

transaction_marker!(
    Multi,
    "multi",
    BasaltError::Internal("MULTI must be handled by the connection layer".into())
);
transaction_marker!(
    Exec,
    "exec",
    BasaltError::ExecWithoutMulti
);
transaction_marker!(
    Discard,
    "discard",
    BasaltError::DiscardWithoutMulti
);
