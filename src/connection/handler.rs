// src/connection/handler.rs

//! Manages the full lifecycle of a single client TCP connection: decoding
//! frames off the wire, routing them through the transaction state machine,
//! executing commands, and propagating writes to replicas.

use super::session::SessionState;
use crate::core::errors::BasaltError;
use crate::core::protocol::{RespFrame, RespFrameCodec};
use crate::core::replication::{self, Role};
use crate::core::state::{ExecutionContext, ServerState};
use crate::core::Command;
use bytes::BytesMut;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio_util::codec::Decoder;
use tracing::{debug, info, warn};

/// Manages a single client connection from accept to disconnect.
pub struct ConnectionHandler {
    socket: Option<TcpStream>,
    addr: SocketAddr,
    state: Arc<ServerState>,
    session_id: u64,
    shutdown_rx: broadcast::Receiver<()>,
    session: SessionState,
    buf: BytesMut,
    codec: RespFrameCodec,
}

impl ConnectionHandler {
    pub fn new(
        socket: TcpStream,
        addr: SocketAddr,
        state: Arc<ServerState>,
        session_id: u64,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            socket: Some(socket),
            addr,
            state,
            session_id,
            shutdown_rx,
            session: SessionState::new(),
            buf: BytesMut::new(),
            codec: RespFrameCodec::new(),
        }
    }

    /// Drives the connection until the peer disconnects, a protocol error
    /// occurs, a `PSYNC` hands the socket off to the replication subsystem,
    /// or the server is shutting down.
    pub async fn run(&mut self) {
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown_rx.recv() => {
                    debug!(addr = %self.addr, "connection closing for shutdown");
                    return;
                }
                frame = self.read_frame() => {
                    match frame {
                        Ok(Some(frame)) => {
                            if !self.process_frame(frame).await {
                                return;
                            }
                        }
                        Ok(None) => {
                            debug!(addr = %self.addr, "connection closed by peer");
                            return;
                        }
                        Err(e) => {
                            if is_normal_disconnect(&e) {
                                debug!(addr = %self.addr, "connection reset by peer");
                            } else {
                                warn!(addr = %self.addr, error = %e, "protocol error, closing connection");
                            }
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Reads and decodes one frame, pulling more bytes off the socket as
    /// needed. Returns `Ok(None)` on a clean EOF with no partial frame
    /// pending.
    async fn read_frame(&mut self) -> Result<Option<RespFrame>, BasaltError> {
        let socket = self.socket.as_mut().expect("socket taken while still running");
        loop {
            if let Some(frame) = self.codec.decode(&mut self.buf)? {
                return Ok(Some(frame));
            }
            let mut chunk = [0u8; 4096];
            let n = socket.read(&mut chunk).await?;
            if n == 0 {
                return Ok(None);
            }
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    async fn write_frame(&mut self, frame: &RespFrame) -> Result<(), BasaltError> {
        let socket = self.socket.as_mut().expect("socket taken while still running");
        socket.write_all(&frame.encode_to_vec()).await?;
        Ok(())
    }

    async fn write_error(&mut self, e: BasaltError) -> Result<(), BasaltError> {
        self.write_frame(&RespFrame::Error(e.wire_message())).await
    }

    /// Parses and dispatches one frame. Returns `false` if the connection's
    /// main loop should stop (disconnect, fatal write error, or a `PSYNC`
    /// handoff).
    ///
    /// While a transaction is open, any frame other than `MULTI`/`EXEC`/
    /// `DISCARD` is queued as-is: its command name and arguments are never
    /// parsed or validated here, only at `EXEC`.
    async fn process_frame(&mut self, frame: RespFrame) -> bool {
        if self.session.in_transaction {
            match frame_command_name(&frame).as_deref() {
                Some("multi") | Some("exec") | Some("discard") => {}
                _ => {
                    self.session.queued.push(frame);
                    return self
                        .write_frame(&RespFrame::SimpleString("QUEUED".to_string()))
                        .await
                        .is_ok();
                }
            }
        }

        let command = match Command::try_from_frame(frame) {
            Ok(c) => c,
            Err(e) => return self.write_error(e).await.is_ok(),
        };

        if let Command::Psync(_) = &command {
            let Some(socket) = self.socket.take() else {
                return false;
            };
            info!(addr = %self.addr, "handing off connection to replication subsystem");
            tokio::spawn(replication::serve_replica_connection(
                self.state.clone(),
                socket,
            ));
            return false;
        }

        match command {
            Command::Multi(_) => self.handle_multi().await,
            Command::Discard(_) => self.handle_discard().await,
            Command::Exec(_) => self.handle_exec().await,
            other => self.dispatch(&other).await,
        }
    }

    async fn handle_multi(&mut self) -> bool {
        if self.session.in_transaction {
            return self.write_error(BasaltError::NestedMulti).await.is_ok();
        }
        self.session.in_transaction = true;
        self.session.queued.clear();
        self.write_frame(&RespFrame::SimpleString("OK".to_string()))
            .await
            .is_ok()
    }

    async fn handle_discard(&mut self) -> bool {
        if !self.session.in_transaction {
            return self
                .write_error(BasaltError::DiscardWithoutMulti)
                .await
                .is_ok();
        }
        self.session.in_transaction = false;
        self.session.queued.clear();
        self.write_frame(&RespFrame::SimpleString("OK".to_string()))
            .await
            .is_ok()
    }

    async fn handle_exec(&mut self) -> bool {
        if !self.session.in_transaction {
            return self
                .write_error(BasaltError::ExecWithoutMulti)
                .await
                .is_ok();
        }
        self.session.in_transaction = false;
        let queued = std::mem::take(&mut self.session.queued);

        let mut replies = Vec::with_capacity(queued.len());
        for frame in queued {
            let reply = match Command::try_from_frame(frame) {
                Ok(command) => self.execute_and_propagate(&command).await,
                Err(e) => RespFrame::Error(e.wire_message()),
            };
            replies.push(reply);
        }
        self.write_frame(&RespFrame::Array(replies)).await.is_ok()
    }

    /// Executes a single top-level (non-transaction, non-special) command.
    async fn dispatch(&mut self, command: &Command) -> bool {
        let reply = self.execute_and_propagate(command).await;
        self.write_frame(&reply).await.is_ok()
    }

    async fn execute_and_propagate(&mut self, command: &Command) -> RespFrame {
        let ctx = ExecutionContext::new(self.state.clone(), self.session_id);
        match command.execute(&ctx).await {
            Ok((value, outcome)) => {
                if self.state.replication.role == Role::Primary {
                    replication::maybe_propagate(&self.state, command, outcome);
                }
                value.into()
            }
            Err(e) => RespFrame::Error(e.wire_message()),
        }
    }
}

/// Reads just the command name out of a frame, without validating or
/// parsing its arguments. Returns `None` for anything that isn't a
/// non-empty array of bulk strings.
fn frame_command_name(frame: &RespFrame) -> Option<String> {
    match frame {
        RespFrame::Array(parts) => match parts.first() {
            Some(RespFrame::BulkString(b)) => {
                Some(String::from_utf8_lossy(b).to_ascii_lowercase())
            }
            _ => None,
        },
        _ => None,
    }
}

fn is_normal_disconnect(e: &BasaltError) -> bool {
    matches!(e, BasaltError::Io(io) if matches!(
        io.kind(),
        std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionAborted
    ))
}
