//! Parsing and validation of `bitgrid.toml` configuration files.
//!
//! The configuration supplies defaults for array lowering (barrier wires,
//! generated wire names, slice coalescing) so that a host build step can set
//! them once per project instead of at every call site.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::{LoweringConfig, ProjectConfig};
