// src/core/replication/mod.rs

//! Primary/replica replication: a primary propagates every write command to
//! its connected replicas over the same connection a `PSYNC` arrived on; a
//! replica connects out to its primary, performs the handshake, and applies
//! the resulting command stream to its own keyspace.

use crate::core::commands::command_trait::WriteOutcome;
use crate::core::errors::BasaltError;
use crate::core::protocol::{RespFrame, RespFrameCodec};
use crate::core::state::{ExecutionContext, ServerState};
use crate::core::Command;
use bytes::{Buf, Bytes, BytesMut};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Decoder;
use tracing::{error, info, warn};

/// The fixed byte payload sent in place of an RDB-style snapshot after a
/// `+FULLRESYNC` reply. A freshly-attached replica receives no reconstruction
/// of the primary's existing dataset — only commands propagated from this
/// point on.
pub const EMPTY_SNAPSHOT_PAYLOAD: &[u8] = b"BASALTDB-EMPTY-SNAPSHOT-V1";

const INITIAL_CONNECT_ATTEMPTS: u32 = 5;
const INITIAL_CONNECT_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Primary,
    Replica,
}

/// Shared replication bookkeeping: this node's role, replication ID, the
/// cumulative byte offset of propagated commands, and (if primary) the set
/// of currently-attached replica sinks.
pub struct ReplicationState {
    pub role: Role,
    pub repl_id: String,
    pub repl_offset: AtomicU64,
    replicas: Mutex<HashMap<u64, mpsc::UnboundedSender<Bytes>>>,
    next_replica_id: AtomicU64,
}

impl ReplicationState {
    pub fn new(role: Role) -> Arc<Self> {
        Arc::new(Self {
            role,
            repl_id: generate_repl_id(),
            repl_offset: AtomicU64::new(0),
            replicas: Mutex::new(HashMap::new()),
            next_replica_id: AtomicU64::new(1),
        })
    }

    pub fn role_name(&self) -> &'static str {
        match self.role {
            Role::Primary => "primary",
            Role::Replica => "replica",
        }
    }

    /// Registers a newly-handshaked replica connection, returning an ID (used
    /// to unregister later) and the receiving end of its propagation channel.
    pub fn register_replica(&self) -> (u64, mpsc::UnboundedReceiver<Bytes>) {
        let id = self.next_replica_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();
        self.replicas.lock().unwrap().insert(id, tx);
        (id, rx)
    }

    pub fn unregister_replica(&self, id: u64) {
        self.replicas.lock().unwrap().remove(&id);
    }

    /// Propagates an already-encoded command frame to every attached replica
    /// and advances the replication offset. A replica whose channel is full
    /// or closed is dropped silently; its socket task will notice on its own.
    pub fn propagate(&self, encoded: &[u8]) {
        self.repl_offset
            .fetch_add(encoded.len() as u64, Ordering::SeqCst);
        let replicas = self.replicas.lock().unwrap();
        for tx in replicas.values() {
            let _ = tx.send(Bytes::copy_from_slice(encoded));
        }
    }

    pub fn replica_count(&self) -> usize {
        self.replicas.lock().unwrap().len()
    }
}

fn generate_repl_id() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..40)
        .map(|_| {
            let n = rng.gen_range(0..16);
            std::char::from_digit(n, 16).unwrap()
        })
        .collect()
}

/// Builds the primary's non-standard `PSYNC` reply preamble: a `+FULLRESYNC`
/// simple string followed by a bulk-string-shaped snapshot payload that, per
/// the wire format real replicas expect, carries no trailing CRLF.
pub fn encode_fullresync_preamble(repl_id: &str) -> Vec<u8> {
    let mut out = format!("+FULLRESYNC {repl_id} 0\r\n").into_bytes();
    out.extend_from_slice(format!("${}\r\n", EMPTY_SNAPSHOT_PAYLOAD.len()).as_bytes());
    out.extend_from_slice(EMPTY_SNAPSHOT_PAYLOAD);
    out
}

/// Propagates a successful write command to every attached replica, unless
/// the command is flagged not to be (or did not in fact write anything).
/// `BLPOP` propagates as the equivalent deterministic `LPOP`, since a replica
/// must never itself block.
pub fn maybe_propagate(state: &ServerState, command: &Command, outcome: WriteOutcome) {
    if matches!(outcome, WriteOutcome::DidNotWrite) {
        return;
    }
    if state.replication.replica_count() == 0 {
        return;
    }
    let propagated = match command {
        Command::BLPop(blpop) => Command::LPop(crate::core::commands::list::LPop {
            key: blpop.key.clone(),
            count: None,
        }),
        other => other.clone(),
    };
    let frame = propagated.to_resp_frame();
    state.replication.propagate(&frame.encode_to_vec());
}

/// Reads frames from an already-connected socket into `buf`, feeding each
/// complete frame to `codec`, until one frame is available.
async fn read_one_frame(
    socket: &mut TcpStream,
    buf: &mut BytesMut,
    codec: &mut RespFrameCodec,
) -> Result<Option<RespFrame>, BasaltError> {
    loop {
        if let Some(frame) = codec.decode(buf)? {
            return Ok(Some(frame));
        }
        let mut chunk = [0u8; 4096];
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

async fn write_array(socket: &mut TcpStream, parts: &[&str]) -> Result<(), BasaltError> {
    let frame = RespFrame::Array(
        parts
            .iter()
            .map(|p| RespFrame::BulkString(Bytes::copy_from_slice(p.as_bytes())))
            .collect(),
    );
    socket.write_all(&frame.encode_to_vec()).await?;
    Ok(())
}

async fn expect_simple_reply(
    socket: &mut TcpStream,
    buf: &mut BytesMut,
    codec: &mut RespFrameCodec,
) -> Result<(), BasaltError> {
    match read_one_frame(socket, buf, codec).await? {
        Some(RespFrame::SimpleString(_)) => Ok(()),
        Some(other) => Err(BasaltError::ReplicationError(format!(
            "unexpected handshake reply: {other:?}"
        ))),
        None => Err(BasaltError::ReplicationError(
            "connection closed during handshake".into(),
        )),
    }
}

/// Connects to the primary, performs the `PING`/`REPLCONF`/`PSYNC` handshake,
/// and applies every subsequently-propagated command to `state.db`. On the
/// very first connection attempt, tries up to [`INITIAL_CONNECT_ATTEMPTS`]
/// times with a fixed one-second backoff; if all attempts fail the process
/// exits with a non-zero status. Once a connection has been established, a
/// later drop is retried indefinitely with the same backoff.
pub async fn run_replica(
    state: Arc<ServerState>,
    primary_host: String,
    primary_port: u16,
    listening_port: u16,
) {
    let mut established_once = false;
    let mut initial_attempts = 0u32;

    loop {
        match connect_and_sync(&state, &primary_host, primary_port, listening_port).await {
            Ok(()) => {
                // The connection ran to a clean close (primary went away).
                established_once = true;
            }
            Err(e) => {
                warn!(error = %e, "replication connection to primary failed");
            }
        }

        if !established_once {
            initial_attempts += 1;
            if initial_attempts >= INITIAL_CONNECT_ATTEMPTS {
                error!(
                    "failed to connect to primary {primary_host}:{primary_port} after {INITIAL_CONNECT_ATTEMPTS} attempts, exiting"
                );
                std::process::exit(1);
            }
        }

        tokio::time::sleep(INITIAL_CONNECT_BACKOFF).await;
    }
}

async fn connect_and_sync(
    state: &Arc<ServerState>,
    primary_host: &str,
    primary_port: u16,
    listening_port: u16,
) -> Result<(), BasaltError> {
    let mut socket = TcpStream::connect((primary_host, primary_port)).await?;
    let mut buf = BytesMut::new();
    let mut codec = RespFrameCodec::new();

    write_array(&mut socket, &["PING"]).await?;
    expect_simple_reply(&mut socket, &mut buf, &mut codec).await?;

    write_array(
        &mut socket,
        &["REPLCONF", "listening-port", &listening_port.to_string()],
    )
    .await?;
    expect_simple_reply(&mut socket, &mut buf, &mut codec).await?;

    write_array(&mut socket, &["REPLCONF", "capa", "psync2"]).await?;
    expect_simple_reply(&mut socket, &mut buf, &mut codec).await?;

    write_array(&mut socket, &["PSYNC", "?", "-1"]).await?;
    match read_one_frame(&mut socket, &mut buf, &mut codec).await? {
        Some(RespFrame::SimpleString(s)) if s.starts_with("FULLRESYNC") => {}
        Some(other) => {
            return Err(BasaltError::ReplicationError(format!(
                "unexpected PSYNC reply: {other:?}"
            )));
        }
        None => {
            return Err(BasaltError::ReplicationError(
                "connection closed awaiting PSYNC reply".into(),
            ));
        }
    }
    // The snapshot payload follows as a raw `$<len>\r\n<bytes>` bulk string
    // with no trailing CRLF; consume it without interpreting its contents.
    read_snapshot_payload(&mut socket, &mut buf).await?;

    info!(primary = %format!("{primary_host}:{primary_port}"), "replica handshake complete");

    let applied_offset = Arc::new(AtomicU64::new(0));
    loop {
        let frame = match read_one_frame(&mut socket, &mut buf, &mut codec).await? {
            Some(f) => f,
            None => return Ok(()),
        };
        let encoded_len = frame.encode_to_vec().len() as u64;
        apply_propagated_frame(state, &mut socket, frame, &applied_offset).await?;
        applied_offset.fetch_add(encoded_len, Ordering::SeqCst);
    }
}

/// Reads the fixed-format snapshot payload (`$<len>\r\n<bytes>`, no trailing
/// CRLF) directly off the wire without going through the normal RESP codec,
/// since this framing is non-standard.
async fn read_snapshot_payload(socket: &mut TcpStream, buf: &mut BytesMut) -> Result<(), BasaltError> {
    loop {
        if let Some(pos) = buf.windows(2).position(|w| w == b"\r\n") {
            if buf.first() != Some(&b'$') {
                return Err(BasaltError::ReplicationError(
                    "expected bulk-string snapshot header".into(),
                ));
            }
            let len: usize = std::str::from_utf8(&buf[1..pos])
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| BasaltError::ReplicationError("invalid snapshot length".into()))?;
            let header_len = pos + 2;
            if buf.len() >= header_len + len {
                buf.advance(header_len + len);
                return Ok(());
            }
        }
        let mut chunk = [0u8; 4096];
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Err(BasaltError::ReplicationError(
                "connection closed reading snapshot".into(),
            ));
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Takes over a connection on which a `PSYNC ? -1` was just received: sends
/// the `+FULLRESYNC` preamble and snapshot, registers the socket as a replica
/// sink, and forwards every subsequently propagated command frame to it
/// verbatim until the connection drops.
pub async fn serve_replica_connection(state: Arc<ServerState>, mut socket: TcpStream) {
    let preamble = encode_fullresync_preamble(&state.replication.repl_id);
    if socket.write_all(&preamble).await.is_err() {
        return;
    }

    let (replica_id, mut rx) = state.replication.register_replica();
    info!("replica attached, now streaming propagated writes");

    let (mut read_half, mut write_half) = socket.into_split();
    let mut reader = tokio::spawn(async move {
        let mut discard = [0u8; 4096];
        loop {
            match read_half.read(&mut discard).await {
                Ok(0) | Err(_) => return,
                Ok(_) => {}
            }
        }
    });

    loop {
        tokio::select! {
            biased;
            _ = &mut reader => break,
            maybe_bytes = rx.recv() => {
                match maybe_bytes {
                    Some(bytes) => {
                        if write_half.write_all(&bytes).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    reader.abort();
    state.replication.unregister_replica(replica_id);
    info!("replica detached");
}

async fn apply_propagated_frame(
    state: &Arc<ServerState>,
    socket: &mut TcpStream,
    frame: RespFrame,
    applied_offset: &Arc<AtomicU64>,
) -> Result<(), BasaltError> {
    let command = Command::try_from_frame(frame)?;

    if let Command::Replconf(replconf) = &command
        && replconf
            .args
            .first()
            .is_some_and(|a| a.eq_ignore_ascii_case("getack"))
    {
        let offset = applied_offset.load(Ordering::SeqCst);
        write_array(socket, &["REPLCONF", "ACK", &offset.to_string()]).await?;
        return Ok(());
    }

    let ctx = ExecutionContext::new(state.clone(), 0);
    let _ = command.execute(&ctx).await;
    Ok(())
}
