// src/core/commands/generic/info.rs

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
use std::sync::atomic::Ordering;

#[derive(Debug, Clone, Default)]
pub struct Info {
    pub section: Option<String>,
}

impl ParseCommand for Info {
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError> {
        match args.len() {
            0 => Ok(Info { section: None }),
            1 => Ok(Info {
                section: Some(extract_string(&args[0])?.to_ascii_lowercase()),
            }),
            _ => Err(BasaltError::WrongArgumentCount("info".to_string())),
        }
    }
}

#[async_trait]
impl ExecutableCommand for Info {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError> {
        let wants = |s: &str| self.section.as_deref().is_none_or(|sec| sec == s);
        let mut out = String::new();

        if wants("server") {
            out.push_str("# Server\r\n");
            out.push_str("basaltdb_version:0.1.0\r\n");
            out.push_str(&format!(
                "uptime_in_seconds:{}\r\n",
                ctx.state.start_time.elapsed().as_secs()
            ));
            out.push_str("\r\n");
        }

        if wants("replication") {
            out.push_str("# Replication\r\n");
            out.push_str(&format!("role:{}\r\n", ctx.state.replication.role_name()));
            out.push_str(&format!("master_replid:{}\r\n", ctx.state.replication.repl_id));
            out.push_str(&format!(
                "master_repl_offset:{}\r\n",
                ctx.state.replication.repl_offset.load(Ordering::SeqCst)
            ));
            out.push_str(&format!(
                "connected_slaves:{}\r\n",
                ctx.state.replication.replica_count()
            ));
            out.push_str("\r\n");
        }

        Ok((RespValue::BulkString(Bytes::from(out)), WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for Info {
    fn name(&self) -> &'static str {
        "info"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        self.section
            .clone()
            .map(Bytes::from)
            .into_iter()
            .collect()
    }
}
