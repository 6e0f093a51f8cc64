//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "bitgrid.toml";

/// Loads `<project_dir>/bitgrid.toml`, falling back to defaults when absent.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if !config_path.is_file() {
        return Ok(ProjectConfig::default());
    }
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Wire prefixes end up as signal names, so they must be plain identifiers.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    let prefix = &config.lowering.wire_prefix;
    let invalid = |reason: String| ConfigError::Invalid {
        key: "lowering.wire_prefix",
        reason,
    };
    let mut chars = prefix.chars();
    match chars.next() {
        None => return Err(invalid("must not be empty".to_string())),
        Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
            return Err(invalid(format!("'{prefix}' must start with a letter or '_'")))
        }
        _ => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid(format!(
            "'{prefix}' may only contain letters, digits and '_'"
        )));
    }
    Ok(())
}
