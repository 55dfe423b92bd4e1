//! Parsing and validation of `hdlkit.toml` backend configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`BackendConfig`] controlling interface naming and code generation.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::*;
