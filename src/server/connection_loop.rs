// src/server/connection_loop.rs

//! The main accept loop and graceful shutdown sequence.

use crate::connection::ConnectionHandler;
use crate::core::state::ServerState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

#[cfg(windows)]
use tokio::signal;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Waits for a shutdown signal based on the operating system.
/// On Unix, it listens for SIGINT and SIGTERM.
/// On Windows, it listens for Ctrl+C.
async fn await_shutdown_signal() {
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to create SIGINT stream");
    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to create SIGTERM stream");

    #[cfg(windows)]
    let mut ctrl_c = signal::ctrl_c().expect("failed to create Ctrl+C stream");

    tokio::select! {
        _ = async { #[cfg(unix)] { sigint.recv().await; info!("SIGINT received, initiating graceful shutdown"); } } => {},
        _ = async { #[cfg(unix)] { sigterm.recv().await; info!("SIGTERM received, initiating graceful shutdown"); } } => {},
        _ = async { #[cfg(windows)] { ctrl_c.await; info!("Ctrl-C received, initiating graceful shutdown"); } } => {},
    }
}

pub async fn run(listener: TcpListener, state: Arc<ServerState>, shutdown_tx: broadcast::Sender<()>) {
    let mut session_id_counter: u64 = 0;
    let mut client_tasks = JoinSet::new();

    loop {
        tokio::select! {
            biased;

            _ = await_shutdown_signal() => {
                break;
            },

            res = listener.accept() => {
                match res {
                    Ok((socket, addr)) => {
                        info!(%addr, "accepted connection");
                        session_id_counter = session_id_counter.wrapping_add(1);
                        let session_id = session_id_counter;
                        let state_clone = state.clone();
                        let conn_shutdown_rx = shutdown_tx.subscribe();

                        client_tasks.spawn(async move {
                            let mut handler = ConnectionHandler::new(socket, addr, state_clone, session_id, conn_shutdown_rx);
                            handler.run().await;
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "failed to accept connection");
                    }
                }
            },

            Some(res) = client_tasks.join_next() => {
                if let Err(e) = res {
                    if e.is_panic() {
                        error!(error = ?e, "a client handler panicked");
                    }
                }
            },
        }
    }

    info!("shutting down, signaling all connections");
    if shutdown_tx.send(()).is_err() {
        warn!("no connections were listening for the shutdown signal");
    }
    client_tasks.shutdown().await;
    info!("all client connections closed");
}
