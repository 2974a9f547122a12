//! Logger module
//!
//! Installs the `tracing` subscriber and provides the lifecycle and access
//! log helpers used by the server.

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use tracing::Level;

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};

/// Initialize the global subscriber with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let level = parse_level(&config.level)?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::Logger(e.to_string()))
}

fn parse_level(level: &str) -> Result<Level> {
    level
        .parse::<Level>()
        .map_err(|_| Error::LogLevel(level.to_string()))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, files: usize) {
    tracing::info!("======================================");
    tracing::info!("SPA server started successfully");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Serving {files} files from '{}'", config.spa.root);
    tracing::info!("Index document: {}", config.spa.index_path);
    if !config.spa.strip_prefix.is_empty() {
        tracing::info!("URL prefix: {}", config.spa.strip_prefix);
    }
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    tracing::info!("======================================");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}
