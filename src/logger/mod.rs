//! Logger module
//!
//! Named logging helpers on top of the `log` facade, backed by `env_logger`:
//! - Server lifecycle logging
//! - Request and access logging
//! - Manifest patch summaries
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::Config;
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// `logging.level` is the default filter, `RUST_LOG` overrides it. Calling
/// this twice is harmless.
pub fn init(config: &Config) {
    let env = env_logger::Env::default().default_filter_or(config.logging.level.as_str());
    let _ = env_logger::Builder::from_env(env)
        .format_target(false)
        .try_init();
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    log::info!("======================================");
    log::info!("Range file server started");
    log::info!("Listening on: http://{addr}");
    log::info!("Serving files from: {}", config.server.root_dir);
    log::info!("Log level: {}", config.logging.level);
    log::info!("Requests are handled one at a time, press Ctrl+C to stop");
    log::info!("Try: curl -I -H 'Range: bytes=0-1023' http://{addr}/hap/AppSigned.hap");
    log::info!("======================================");
}

pub fn log_server_stopped() {
    log::info!("Server stopped");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log::error!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    log::debug!("[Request] {method} {uri} {version:?}");
}

pub fn log_file_request(path: &std::path::Path, file_size: u64, range: Option<&str>) {
    log::debug!(
        "[File] {} ({file_size} bytes), Range: {}",
        path.display(),
        range.unwrap_or("-")
    );
}

pub fn log_response(status: u16, size: u64) {
    log::debug!("[Response] Sent {status} ({size} bytes)");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    log::info!("{}", entry.format(format));
}

pub fn log_manifest_patched(source: &str, copy: &str, deploy_domain: &str) {
    log::info!("Manifest updated: {source} (copied to {copy})");
    log::info!("Deploy domain: {deploy_domain}");
}

pub fn log_manifest_links(package_url: &str, manifest_url: &str, deep_link: &str) {
    log::info!("Package URL: {package_url}");
    log::info!("Manifest URL: {manifest_url}");
    log::info!("Deep link: {deep_link}");
}

pub fn log_error(message: &str) {
    log::error!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    log::warn!("[WARN] {message}");
}
