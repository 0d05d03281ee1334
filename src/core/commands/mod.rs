// src/core/commands/mod.rs

//! Defines all supported commands and the central `Command` enum that wraps
//! their parsed state. Parsing, dispatch, and serialization back to wire
//! frames are all done by hand here rather than through a macro, since the
//! command set is small and fixed.

use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome};
use crate::core::errors::BasaltError;
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::RespValue;
use bytes::Bytes;

pub mod command_spec;
pub mod command_trait;
pub mod generic;
pub mod helpers;
pub mod list;
pub mod streams;
pub mod string;

pub use command_spec::CommandSpec;

use generic::{CommandStub, Discard, Echo, Exec, Info, Multi, Ping, Psync, Replconf, TypeCmd};
use list::{BLPop, LLen, LPop, LPush, LRange, RPush};
use streams::{XAdd, XRange, XRead};
use string::{Get, Incr, Set};

/// The full set of commands this server understands. Each variant wraps the
/// already-parsed command struct, which carries both its `ParseCommand` and
/// `ExecutableCommand`/`CommandSpec` implementations.
#[derive(Debug, Clone)]
pub enum Command {
    Ping(Ping),
    Echo(Echo),
    Set(Set),
    Get(Get),
    Incr(Incr),
    LPush(LPush),
    RPush(RPush),
    LPop(LPop),
    LRange(LRange),
    LLen(LLen),
    BLPop(BLPop),
    Type(TypeCmd),
    XAdd(XAdd),
    XRange(XRange),
    XRead(XRead),
    Multi(Multi),
    Exec(Exec),
    Discard(Discard),
    Info(Info),
    Replconf(Replconf),
    Psync(Psync),
    CommandStub(CommandStub),
}

/// Dispatches `$body` against every `Command` variant, binding the inner
/// parsed struct to `$cmd` for each arm. Used to avoid repeating the full
/// variant list for every cross-cutting operation (`execute`, `flags`, ...).
macro_rules! for_each_command {
    ($self:expr, $cmd:ident => $body:expr) => {
        match $self {
            Command::Ping($cmd) => $body,
            Command::Echo($cmd) => $body,
            Command::Set($cmd) => $body,
            Command::Get($cmd) => $body,
            Command::Incr($cmd) => $body,
            Command::LPush($cmd) => $body,
            Command::RPush($cmd) => $body,
            Command::LPop($cmd) => $body,
            Command::LRange($cmd) => $body,
            Command::LLen($cmd) => $body,
            Command::BLPop($cmd) => $body,
            Command::Type($cmd) => $body,
            Command::XAdd($cmd) => $body,
            Command::XRange($cmd) => $body,
            Command::XRead($cmd) => $body,
            Command::Multi($cmd) => $body,
            Command::Exec($cmd) => $body,
            Command::Discard($cmd) => $body,
            Command::Info($cmd) => $body,
            Command::Replconf($cmd) => $body,
            Command::Psync($cmd) => $body,
            Command::CommandStub($cmd) => $body,
        }
    };
}

impl Command {
    /// Parses a complete wire frame (expected to be a RESP array of bulk
    /// strings) into a `Command`, looking the command name up case-insensitively.
    pub fn try_from_frame(frame: RespFrame) -> Result<Self, BasaltError> {
        let parts = match frame {
            RespFrame::Array(parts) => parts,
            _ => return Err(BasaltError::ProtocolError("expected array frame".into())),
        };
        if parts.is_empty() {
            return Err(BasaltError::ProtocolError("empty command".into()));
        }
        let name = match &parts[0] {
            RespFrame::BulkString(b) => String::from_utf8_lossy(b).to_ascii_lowercase(),
            _ => return Err(BasaltError::ProtocolError("command name must be a bulk string".into())),
        };
        let args = &parts[1..];

        Ok(match name.as_str() {
            "ping" => Command::Ping(Ping::parse(args)?),
            "echo" => Command::Echo(Echo::parse(args)?),
            "set" => Command::Set(Set::parse(args)?),
            "get" => Command::Get(Get::parse(args)?),
            "incr" => Command::Incr(Incr::parse(args)?),
            "lpush" => Command::LPush(LPush::parse(args)?),
            "rpush" => Command::RPush(RPush::parse(args)?),
            "lpop" => Command::LPop(LPop::parse(args)?),
            "lrange" => Command::LRange(LRange::parse(args)?),
            "llen" => Command::LLen(LLen::parse(args)?),
            "blpop" => Command::BLPop(BLPop::parse(args)?),
            "type" => Command::Type(TypeCmd::parse(args)?),
            "xadd" => Command::XAdd(XAdd::parse(args)?),
            "xrange" => Command::XRange(XRange::parse(args)?),
            "xread" => Command::XRead(XRead::parse(args)?),
            "multi" => Command::Multi(Multi::parse(args)?),
            "exec" => Command::Exec(Exec::parse(args)?),
            "discard" => Command::Discard(Discard::parse(args)?),
            "info" => Command::Info(Info::parse(args)?),
            "replconf" => Command::Replconf(Replconf::parse(args)?),
            "psync" => Command::Psync(Psync::parse(args)?),
            "command" => Command::CommandStub(CommandStub::parse(args)?),
            other => return Err(BasaltError::UnknownCommand(other.to_string())),
        })
    }

    pub async fn execute(&self, ctx: &ExecutionContext) -> Result<(RespValue, WriteOutcome), BasaltError> {
        for_each_command!(self, cmd => cmd.execute(ctx).await)
    }

    pub fn flags(&self) -> CommandFlags {
        for_each_command!(self, cmd => cmd.flags())
    }

    pub fn name(&self) -> &'static str {
        for_each_command!(self, cmd => cmd.name())
    }

    /// Re-serializes this command back into a wire frame, used for
    /// replication propagation.
    pub fn to_resp_frame(&self) -> RespFrame {
        let mut parts = vec![RespFrame::BulkString(Bytes::from_static(
            self.name().as_bytes(),
        ))];
        parts.extend(
            for_each_command!(self, cmd => cmd.to_resp_args())
                .into_iter()
                .map(RespFrame::BulkString),
        );
        RespFrame::Array(parts)
    }
}
