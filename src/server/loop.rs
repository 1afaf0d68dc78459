// Server loop module
// Accepts connections and serves them one after another

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::serve_connection;
use crate::config::AppState;
use crate::logger;

/// Accept and serve connections until `shutdown` resolves.
///
/// Each connection is served to completion before the next is accepted, so
/// requests never run concurrently. Pending clients wait in the listen
/// backlog.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop<S>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: S,
) -> std::io::Result<()>
where
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                logger::log_server_stopped();
                return Ok(());
            }

            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        tokio::select! {
                            _ = &mut shutdown => {
                                logger::log_server_stopped();
                                return Ok(());
                            }
                            () = serve_connection(stream, peer_addr, Arc::clone(&state)) => {}
                        }
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }
        }
    }
}
