// Connection handling module
// Serves one TCP connection to completion

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve a single connection, returning once it is closed.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Configures HTTP/1 keep-alive from `server.keep_alive`
/// 3. Limits the time a client may take to send request headers to
///    `server.read_timeout`
/// 4. Serves the connection with the request handler
///
/// Response bodies are not time-limited, so slow downloads of large
/// packages run to completion.
pub async fn serve_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) {
    let io = TokioIo::new(stream);

    let mut builder = http1::Builder::new();
    builder
        .timer(TokioTimer::new())
        .header_read_timeout(Duration::from_secs(state.config.server.read_timeout))
        .keep_alive(state.config.server.keep_alive);

    let conn = builder.serve_connection(
        io,
        service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer_addr)),
    );

    if let Err(err) = conn.await {
        if err.is_timeout() {
            logger::log_warning(&format!(
                "Connection from {peer_addr} did not send request headers in time"
            ));
        } else {
            logger::log_connection_error(&err);
        }
    }
}
