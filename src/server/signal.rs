// Signal handling module
//
// Supported signals:
// - SIGTERM: Stop
// - SIGINT:  Stop (Ctrl+C)
//
// Stopping does not drain: the connection being served is dropped.

use crate::logger;

/// Resolve once the process is asked to stop
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            logger::log_warning(&format!("Failed to register SIGTERM handler: {e}"));
            ctrl_c().await;
            log::info!("[SIGNAL] SIGINT received (Ctrl+C), stopping");
            return;
        }
    };

    tokio::select! {
        () = ctrl_c() => {
            log::info!("[SIGNAL] SIGINT received (Ctrl+C), stopping");
        }
        _ = sigterm.recv() => {
            log::info!("[SIGNAL] SIGTERM received, stopping");
        }
    }
}

/// Resolve once the process is asked to stop
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    ctrl_c().await;
    log::info!("[SIGNAL] Ctrl+C received, stopping");
}

/// Wait for Ctrl+C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
        std::future::pending::<()>().await;
    }
}
