// Configuration module entry point
// Loads server, logging and manifest settings from defaults, file and environment

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, ManifestConfig, ServerConfig};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "hap-distribution";

/// Environment variable prefix, e.g. `HAPDIST__SERVER__PORT=9000`
const ENV_PREFIX: &str = "HAPDIST";

impl Config {
    /// Load configuration from the default file in the working directory
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    /// The file is optional; defaults cover every key
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("server.root_dir", ".")?
            .set_default("server.keep_alive", false)?
            .set_default("server.read_timeout", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default(
                "manifest.base_url",
                "https://harmony-hap-distribution.q17626049428.workers.dev",
            )?
            .set_default("manifest.source_path", "hap/manifest-jsdelivr.json5")?
            .set_default("manifest.copy_path", "manifest.json5")?
            .set_default("manifest.deep_link_prefix", "store://enterprise/manifest?url=")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
