// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub manifest: ManifestConfig,
}

/// Range file server configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory request paths are resolved against
    pub root_dir: String,
    /// HTTP/1.1 keep-alive; off keeps one client from holding the server
    pub keep_alive: bool,
    /// Seconds a client may take to send request headers
    pub read_timeout: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Manifest patcher configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ManifestConfig {
    /// Distribution host every rewritten URL points at
    pub base_url: String,
    /// Manifest that is read and overwritten in place
    pub source_path: String,
    /// Second destination receiving the same bytes
    pub copy_path: String,
    /// Custom scheme prefix the encoded manifest URL is appended to
    pub deep_link_prefix: String,
}
