// Application state module
// Shared, read-only state handed to every connection

use std::sync::Arc;

use super::types::Config;
use crate::fs::VirtualFs;
use crate::handler::SpaHandler;

/// Application state
pub struct AppState {
    pub config: Config,
    pub spa: SpaHandler,
}

impl AppState {
    pub fn new(config: Config, fs: Arc<dyn VirtualFs>) -> Self {
        let spa = SpaHandler::new(fs, config.spa_config());
        Self { config, spa }
    }
}
