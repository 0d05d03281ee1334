// src/core/commands/list/lpop.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::commands::list::logic::list_pop_logic;
use crate::core::errors::BasaltError;
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::storage::PopDirection;
use crate::core::RespValue;
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct LPop {
    pub key: Bytes,
    pub count: Option<usize>,
}

impl ParseCommand for LPop {
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
        if args.is_empty() || args.len() > 2 {
            return Err(BasaltError::WrongArgumentCount("lpop".to_string()));
        }
        let key = extract_bytes(&args[0])?;
        let count = if let Some(arg) = args.get(1) {
            let n: i64 = extract_string(arg)?
                .parse()
                .map_err(|_| BasaltError::NotAnInteger)?;
            if n < 0 {
                return Err(BasaltError::SyntaxError);
            }
            Some(n as usize)
        } else {
            None
        };
        Ok(LPop { key, count })
    }
}

#[async_trait]
impl ExecutableCommand for LPop {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        list_pop_logic(ctx, &self.key, PopDirection::Left, self.count).await
    }
}

impl CommandSpec for LPop {
    fn name(&self) -> &'static str {
        "lpop"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        let mut args = vec![self.key.clone()];
        if let Some(count) = self.count {
            args.push(count.to_string().into());
        }
        args
    }
}
