// src/main.rs

//! Entry point: parse CLI args, install logging, run the server.

use basaltdb::config::Config;
use basaltdb::server;
use std::env;
use tracing::error;

#[tokio::main]
async fn main() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .compact()
        .with_ansi(true)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server::run(config).await {
        error!(error = %e, "server exited with error");
        std::process::exit(1);
    }
}
