// src/core/commands/command_trait.rs

//! Defines the core traits for all executable commands.

use crate::core::errors::BasaltError;
use crate::core::protocol::RespFrame;
use crate::core::state::ExecutionContext;
use crate::core::RespValue;
use async_trait::async_trait;
use bitflags::bitflags;

bitflags! {
    /// Flags that describe the properties and behavior of a command.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CommandFlags: u32 {
        /// The command modifies the dataset.
        const WRITE          = 1 << 0;
        /// The command only reads data.
        const READONLY       = 1 << 1;
        /// The command should not be propagated to replicas.
        const NO_PROPAGATE   = 1 << 2;
    }
}

/// Represents the outcome of a write operation, used to determine whether
/// propagation to replicas is necessary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The command did not modify any data.
    DidNotWrite,
    /// The command modified one or more keys.
    Write { keys_modified: u64 },
    /// The command deleted one or more keys.
    Delete { keys_deleted: u64 },
}

impl WriteOutcome {
    /// Merges two `WriteOutcome` values, prioritizing more impactful outcomes.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Delete { keys_deleted: k1 }, Self::Delete { keys_deleted: k2 }) => {
                Self::Delete {
                    keys_deleted: k1 + k2,
                }
            }
            (Self::Delete { keys_deleted: k1 }, Self::Write { keys_modified: k2 })
            | (Self::Write { keys_modified: k2 }, Self::Delete { keys_deleted: k1 }) => {
                Self::Delete {
                    keys_deleted: k1 + k2,
                }
            }
            (Self::Delete { keys_deleted }, Self::DidNotWrite)
            | (Self::DidNotWrite, Self::Delete { keys_deleted }) => Self::Delete { keys_deleted },
            (Self::Write { keys_modified: k1 }, Self::Write { keys_modified: k2 }) => Self::Write {
                keys_modified: k1 + k2,
            },
            (Self::Write { keys_modified }, Self::DidNotWrite)
            | (Self::DidNotWrite, Self::Write { keys_modified }) => Self::Write { keys_modified },
            (Self::DidNotWrite, Self::DidNotWrite) => Self::DidNotWrite,
        }
    }
}

/// A trait for the actual execution logic of a command.
/// Implemented by each command's struct (e.g., `Get`, `Set`).
#[async_trait]
pub trait ExecutableCommand {
    /// The core logic for the command's execution.
    async fn execute(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<(RespValue, WriteOutcome), BasaltError>;
}

/// A trait for parsing a command's arguments from a slice of `RespFrame`.
pub trait ParseCommand: Sized {
    /// Parses the arguments and returns an instance of the command struct.
    fn parse(args: &[RespFrame]) -> Result<Self, BasaltError>;
}
