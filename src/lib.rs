//! Tools for distributing an installable app bundle.
//!
//! - [`manifest`] points a manifest's download URLs at a distribution host.
//! - [`server`] runs a local file server with byte-range support.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod manifest;
pub mod server;
