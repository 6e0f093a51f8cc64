//! Failures while reading `bitgrid.toml`.

/// Why a project configuration could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read bitgrid.toml: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or does not match the expected tables.
    #[error("malformed bitgrid.toml: {0}")]
    Parse(#[from] toml::de::Error),

    /// A key parsed but holds a value lowering cannot use.
    #[error("invalid {key}: {reason}")]
    Invalid {
        /// Dotted key path, e.g. `lowering.wire_prefix`.
        key: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_names_the_key() {
        let err = ConfigError::Invalid {
            key: "lowering.wire_prefix",
            reason: "must not be empty".to_string(),
        };
        assert_eq!(err.to_string(), "invalid lowering.wire_prefix: must not be empty");
    }

    #[test]
    fn sources_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(ConfigError::from(io), ConfigError::Io(_)));
        let parse = toml::from_str::<toml::Table>("a = ").unwrap_err();
        let err = ConfigError::from(parse);
        assert!(err.to_string().starts_with("malformed bitgrid.toml:"));
    }
}
