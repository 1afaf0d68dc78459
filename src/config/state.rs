// Application state module
// Holds the loaded configuration and the resolved serving root

use std::io;
use std::path::PathBuf;

use super::types::Config;

/// Application state shared with every request
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Canonical form of `server.root_dir`
    pub root_dir: PathBuf,
}

impl AppState {
    /// Create `AppState`, failing if the root directory does not exist
    pub fn new(config: &Config) -> io::Result<Self> {
        let root_dir = PathBuf::from(&config.server.root_dir).canonicalize()?;
        if !root_dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a directory", root_dir.display()),
            ));
        }

        Ok(Self {
            config: config.clone(),
            root_dir,
        })
    }

    /// Whether a line is written per request
    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
