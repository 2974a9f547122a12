//! Crate error type
//!
//! Request handling never fails with these; they cover startup (configuration,
//! logger, listener, loading the file tree).

use crate::fs::FsError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address: {0}")]
    Addr(#[from] std::net::AddrParseError),

    #[error("invalid log level '{0}'")]
    LogLevel(String),

    #[error("logger setup failed: {0}")]
    Logger(String),

    #[error("failed to load static files: {0}")]
    Fs(#[from] FsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
