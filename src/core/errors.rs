// src/core/errors.rs

//! Defines the primary error type for the entire application.

use std::num::{ParseFloatError, ParseIntError};
use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the server.
/// Using `thiserror` allows for clean error definitions and automatic `From` trait implementations.
#[derive(Error, Debug)]
pub enum BasaltError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Incomplete data in stream")]
    IncompleteData,

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("syntax error")]
    SyntaxError,

    #[error("wrong number of arguments for '{0}' command")]
    WrongArgumentCount(String),

    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("value is not an integer or out of range")]
    NotAnInteger,

    #[error("value is not a valid float")]
    NotAFloat,

    #[error("{0}")]
    InvalidState(String),

    #[error("EXEC without MULTI")]
    ExecWithoutMulti,

    #[error("DISCARD without MULTI")]
    DiscardWithoutMulti,

    #[error("MULTI calls can not be nested")]
    NestedMulti,

    #[error("Replication Error: {0}")]
    ReplicationError(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
// We wrap it in an Arc to allow for cheap, shared cloning.
impl Clone for BasaltError {
    fn clone(&self) -> Self {
        match self {
            BasaltError::Io(e) => BasaltError::Io(Arc::clone(e)),
            BasaltError::IncompleteData => BasaltError::IncompleteData,
            BasaltError::ProtocolError(s) => BasaltError::ProtocolError(s.clone()),
            BasaltError::UnknownCommand(s) => BasaltError::UnknownCommand(s.clone()),
            BasaltError::SyntaxError => BasaltError::SyntaxError,
            BasaltError::WrongArgumentCount(s) => BasaltError::WrongArgumentCount(s.clone()),
            BasaltError::WrongType => BasaltError::WrongType,
            BasaltError::NotAnInteger => BasaltError::NotAnInteger,
            BasaltError::NotAFloat => BasaltError::NotAFloat,
            BasaltError::InvalidState(s) => BasaltError::InvalidState(s.clone()),
            BasaltError::ExecWithoutMulti => BasaltError::ExecWithoutMulti,
            BasaltError::DiscardWithoutMulti => BasaltError::DiscardWithoutMulti,
            BasaltError::NestedMulti => BasaltError::NestedMulti,
            BasaltError::ReplicationError(s) => BasaltError::ReplicationError(s.clone()),
            BasaltError::Internal(s) => BasaltError::Internal(s.clone()),
        }
    }
}

impl PartialEq for BasaltError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (BasaltError::Io(e1), BasaltError::Io(e2)) => e1.to_string() == e2.to_string(),
            (BasaltError::ProtocolError(s1), BasaltError::ProtocolError(s2)) => s1 == s2,
            (BasaltError::UnknownCommand(s1), BasaltError::UnknownCommand(s2)) => s1 == s2,
            (BasaltError::WrongArgumentCount(s1), BasaltError::WrongArgumentCount(s2)) => {
                s1 == s2
            }
            (BasaltError::InvalidState(s1), BasaltError::InvalidState(s2)) => s1 == s2,
            (BasaltError::ReplicationError(s1), BasaltError::ReplicationError(s2)) => s1 == s2,
            (BasaltError::Internal(s1), BasaltError::Internal(s2)) => s1 == s2,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl BasaltError {
    /// Maps the error to its wire-visible `-PREFIX message` form, without the
    /// leading `-` or trailing CRLF (the encoder adds those).
    pub fn wire_message(&self) -> String {
        match self {
            BasaltError::WrongType => self.to_string(),
            BasaltError::UnknownCommand(_) => format!("ERR {self}"),
            BasaltError::ExecWithoutMulti => "ERR EXEC without MULTI".to_string(),
            BasaltError::DiscardWithoutMulti => "ERR DISCARD without MULTI".to_string(),
            BasaltError::NestedMulti => "ERR MULTI calls can not be nested".to_string(),
            _ => format!("ERR {self}"),
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for BasaltError {
    fn from(e: std::io::Error) -> Self {
        BasaltError::Io(Arc::new(e))
    }
}

impl From<ParseIntError> for BasaltError {
    fn from(_: ParseIntError) -> Self {
        BasaltError::NotAnInteger
    }
}

impl From<ParseFloatError> for BasaltError {
    fn from(_: ParseFloatError) -> Self {
        BasaltError::NotAFloat
    }
}
