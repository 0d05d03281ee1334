// src/core/commands/list/lpush.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::parse_key_and_values;
use crate::core::commands::list::logic::list_push_logic;
use crate::core::errors::BasaltError;
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::storage::PushDirection;
use crate::core::RespValue;
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct LPush {
    pub key: Bytes,
    pub values: Vec<Bytes>,
}

impl ParseCommand for LPush {
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
        let (key, values) = parse_key_and_values(args, 2, "lpush")?;
        Ok(LPush { key, values })
    }
}

#[async_trait]
impl ExecutableCommand for LPush {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        list_push_logic(ctx, &self.key, &self.values, PushDirection::Left).await
    }
}

impl CommandSpec for LPush {
    fn name(&self) -> &'static str {
        "lpush"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        let mut args = vec![self.key.clone()];
        args.extend(self.values.clone());
        args
    }
}
