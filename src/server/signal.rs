// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

/// Resolves when the process is asked to stop.
///
/// If a handler cannot be registered the corresponding signal is ignored and
/// the other one still works.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!("SIGTERM received");
            }
            Err(e) => {
                tracing::warn!("Failed to register SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("SIGINT received (Ctrl+C)"),
            Err(e) => {
                tracing::warn!("Failed to register Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        () = terminate => {}
        () = interrupt => {}
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Ctrl+C received"),
        Err(e) => {
            tracing::warn!("Failed to register Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    }
}
