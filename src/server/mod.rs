// src/server/mod.rs

//! Server bootstrap: bind the listener, construct shared state, spawn the
//! replica handshake task if configured as a replica, then run the accept
//! loop until a shutdown signal arrives.

use crate::config::{Config, ReplicaOf};
use crate::core::replication::{ReplicationState, Role};
use crate::core::state::ServerState;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::info;

mod connection_loop;

pub async fn run(config: Config) -> std::io::Result<()> {
    let role = match &config.replicaof {
        ReplicaOf::None => Role::Primary,
        ReplicaOf::Primary { .. } => Role::Replica,
    };
    let replication = ReplicationState::new(role);

    let (shutdown_tx, _) = broadcast::channel(1);
    let state = ServerState::new(replication, shutdown_tx.clone());

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(port = config.port, role = state.replication.role_name(), "listening");

    if let ReplicaOf::Primary { host, port } = config.replicaof {
        let replica_state = state.clone();
        let listening_port = config.port;
        tokio::spawn(async move {
            crate::core::replication::run_replica(replica_state, host, port, listening_port).await;
        });
    }

    connection_loop::run(listener, state, shutdown_tx).await;
    Ok(())
}
