//! Error types
//!
//! Manifest errors are fatal for the patcher. Serve errors are per-request and
//! map to HTTP status codes in the router.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to access manifest '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("manifest is missing field '{0}'")]
    MissingField(&'static str),
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("file not found")]
    NotFound,
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}
