// src/core/commands/string/set.rs

//! Implements `SET key value [PX milliseconds]`. Unconditionally overwrites
//! any prior value at `key`, regardless of its existing type.

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::errors::BasaltError;
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::RespValue;
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct Set {
    pub key: Bytes,
    pub value: Bytes,
    pub px_millis: Option<u64>,
}

impl ParseCommand for Set {
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
        if args.len() != 2 && args.len() != 4 {
            return Err(BasaltError::WrongArgumentCount("set".to_string()));
        }
        let key = extract_bytes(&args[0])?;
        let value = extract_bytes(&args[1])?;

        let px_millis = if args.len() == 4 {
            if !extract_string(&args[2])?.eq_ignore_ascii_case("px") {
                return Err(BasaltError::SyntaxError);
            }
            Some(
                extract_string(&args[3])?
                    .parse()
                    .map_err(|_| BasaltError::NotAnInteger)?,
            )
        } else {
            None
        };

        Ok(Set {
            key,
            value,
            px_millis,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Set {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        ctx.db
            .set_string(self.key.clone(), self.value.clone(), self.px_millis);
        Ok((
            RespValue::SimpleString("OK".to_string()),
            WriteOutcome::Write { keys_modified: 1 },
        ))
    }
}

impl CommandSpec for Set {
    fn name(&self) -> &'static str {
        "set"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        let mut args = vec![self.key.clone(), self.value.clone()];
        if let Some(px) = self.px_millis {
            args.push(Bytes::from_static(b"PX"));
            args.push(px.to_string().into());
        }
        args
    }
}
