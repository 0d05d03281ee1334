// src/core/commands/streams/xadd.rs

//! Implements `XADD key id field value [field value ...]`, appending an
//! entry to a stream (creating it on first use).

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::errors::BasaltError;
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::storage::stream::{IdSpec, StreamId};
use crate::core::RespValue;
use async_trait::async_trait;
use bytes::Bytes;
use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct XAdd {
    pub key: Bytes,
    pub id_spec: IdSpec,
    pub fields: IndexMap<Bytes, Bytes>,
}

impl ParseCommand for XAdd {
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
        if args.len() < 4 {
            return Err(BasaltError::WrongArgumentCount("xadd".to_string()));
        }
        let key = extract_bytes(&args[0])?;
        let id_str = extract_string(&args[1])?;
        let id_spec = if id_str == "*" {
            IdSpec::Auto
        } else if let Some(millis_str) = id_str.strip_suffix("-*") {
            let millis: u64 = millis_str.parse().map_err(|_| BasaltError::SyntaxError)?;
            IdSpec::AutoSeq(millis)
        } else {
            IdSpec::Explicit(
                id_str
                    .parse::<StreamId>()
                    .map_err(|_| BasaltError::SyntaxError)?,
            )
        };

        let remaining = &args[2..];
        if remaining.is_empty() || remaining.len() % 2 != 0 {
            return Err(BasaltError::WrongArgumentCount("xadd".to_string()));
        }
        let fields = remaining
            .chunks_exact(2)
            .map(|chunk| Ok((extract_bytes(&chunk[0])?, extract_bytes(&chunk[1])?)))
            .collect::<Result<IndexMap<Bytes, Bytes>, BasaltError>>()?;

        Ok(XAdd {
            key,
            id_spec,
            fields,
        })
    }
}

#[async_trait]
impl ExecutableCommand for XAdd {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        ctx.db.check_is_stream(&self.key)?;
        let new_id = ctx.db.streams.with_stream(&self.key, |stream| {
            stream.add_entry(self.id_spec, self.fields.clone())
        });
        let new_id = new_id.map_err(|e| BasaltError::InvalidState(e.to_string()))?;

        ctx.state.stream_blocker_manager.notify(&self.key);

        Ok((
            RespValue::BulkString(new_id.to_string().into()),
            WriteOutcome::Write { keys_modified: 1 },
        ))
    }
}

impl CommandSpec for XAdd {
    fn name(&self) -> &'static str {
        "xadd"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        let id_arg = match self.id_spec {
            IdSpec::Auto => "*".to_string(),
            IdSpec::AutoSeq(m) => format!("{m}-*"),
            IdSpec::Explicit(id) => id.to_string(),
        };
        let mut args = vec![self.key.clone(), id_arg.into()];
        args.extend(
            self.fields
                .iter()
                .flat_map(|(k, v)| vec![k.clone(), v.clone()]),
        );
        args
    }
}
