// src/core/state.rs

//! Process-wide server state shared by every connection and background task.

use crate::core::blocking::BlockerManager;
use crate::core::replication::ReplicationState;
use crate::core::storage::Db;
use crate::core::stream_blocking::StreamBlockerManager;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

/// Shared state reachable from every connection task: the keyspace, the
/// blocking-wait registries, and the replication subsystem.
pub struct ServerState {
    pub db: Arc<Db>,
    pub blocker_manager: BlockerManager,
    pub stream_blocker_manager: StreamBlockerManager,
    pub replication: Arc<ReplicationState>,
    pub start_time: Instant,
    pub shutdown_tx: broadcast::Sender<()>,
}

impl ServerState {
    pub fn new(replication: Arc<ReplicationState>, shutdown_tx: broadcast::Sender<()>) -> Arc<Self> {
        Arc::new(Self {
            db: Arc::new(Db::new()),
            blocker_manager: BlockerManager::new(),
            stream_blocker_manager: StreamBlockerManager::new(),
            replication,
            start_time: Instant::now(),
            shutdown_tx,
        })
    }
}

/// The context handed to every command's `execute`: a handle to the shared
/// state plus the identity of the calling session. Commands never see
/// connection-level details (the socket, the session's transaction queue).
pub struct ExecutionContext {
    pub db: Arc<Db>,
    pub state: Arc<ServerState>,
    pub session_id: u64,
}

impl ExecutionContext {
    pub fn new(state: Arc<ServerState>, session_id: u64) -> Self {
        Self {
            db: state.db.clone(),
            state,
            session_id,
        }
    }
}
