// Configuration module entry point
// Loads file/environment configuration and holds the immutable handler settings

mod spa;
mod state;
mod types;

use std::net::SocketAddr;

pub use spa::{SpaConfig, SpaConfigBuilder};
pub use state::AppState;
pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig, SpaSettings};

/// Default config file, looked up without extension ("config.toml", "config.yaml", ...)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional. `SERVER__SECTION__KEY` environment variables
    /// override it, e.g. `SERVER__SPA__ROOT=public`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("spa.root", "dist")?
            .set_default("spa.index_path", "index.html")?
            .set_default("spa.strip_prefix", "")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    /// Handler settings derived from the `[spa]` section
    pub fn spa_config(&self) -> SpaConfig {
        SpaConfig::from(&self.spa)
    }
}
