// src/connection/session.rs

//! State associated with a single client connection that commands themselves
//! never see: specifically, the `MULTI`/`EXEC`/`DISCARD` queue. Command
//! `execute` bodies only receive an `ExecutionContext`, so the transaction
//! state machine lives here, in the connection layer, instead.
//!
//! Queued entries are raw, unparsed frames: a command queued during a
//! transaction is never validated (arity, known-ness) until `EXEC` actually
//! runs it, so a bad command further down the queue doesn't abort queuing
//! the rest.

use crate::core::protocol::RespFrame;

#[derive(Debug, Default)]
pub struct SessionState {
    pub in_transaction: bool,
    pub queued: Vec<RespFrame>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}
