//! Dough CLI library - everything behind the `dough` binary.
//!
//! - [`commands`] - `cart` and `checkout` command implementations
//! - [`config`] - Environment configuration
//! - [`store`] - File-backed key-value store
//! - [`api`] - HTTP client for the ordering API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod commands;
pub mod config;
pub mod store;

pub use api::HttpOrderingApi;
pub use commands::CommandError;
pub use config::{CliConfig, ConfigError};
pub use store::FileStore;
