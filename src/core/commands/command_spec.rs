// src/core/commands/command_spec.rs

//! Defines the `CommandSpec` trait, which provides metadata about a command.

use crate::core::commands::command_trait::CommandFlags;
use bytes::Bytes;

/// A trait for describing a command's properties: its name, flags, and how
/// to re-serialize it for replication.
pub trait CommandSpec {
    /// The name of the command in lowercase.
    fn name(&self) -> &'static str;

    /// A bitmask of flags describing the command's behavior (e.g., `WRITE`, `READONLY`).
    fn flags(&self) -> CommandFlags;

    /// Converts the parsed command's arguments back into a vector of `Bytes`
    /// for serialization (used for replication).
    fn to_resp_args(&self) -> Vec<Bytes>;
}
