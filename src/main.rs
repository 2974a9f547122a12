use std::sync::Arc;

use embed_spa::config::{self, AppState, Config};
use embed_spa::fs::{MemoryFs, VirtualFs};
use embed_spa::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument: config file path without extension
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg.logging)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let tree = Arc::new(MemoryFs::from_dir(&cfg.spa.root)?);
    let files = tree.len();
    let state = Arc::new(AppState::new(cfg, tree.clone()));

    if tree.open(state.spa.config().index_path()).is_err() {
        tracing::warn!(
            "Index document '{}' not found under '{}'; unmatched routes will return 404",
            state.config.spa.index_path,
            state.config.spa.root
        );
    }

    let listener = server::create_listener(addr)?;
    logger::log_server_start(&listener.local_addr()?, &state.config, files);

    server::start_server_loop(listener, state).await?;

    tracing::info!("Server stopped");
    Ok(())
}
