//! Configuration types deserialized from `bitgrid.toml`.

use serde::Deserialize;

/// The top-level configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Lowering defaults.
    #[serde(default)]
    pub lowering: LoweringConfig,
}

/// How arrays are turned into a single flat signal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoweringConfig {
    /// Wrap every lowered array in a named pass-through wire.
    #[serde(default = "default_true")]
    pub create_wire: bool,
    /// Prefix for wire names of arrays built without a name (`ndarray_0`, ...).
    #[serde(default = "default_wire_prefix")]
    pub wire_prefix: String,
    /// Merge runs of consecutive bits of one signal into a single slice.
    #[serde(default = "default_true")]
    pub coalesce: bool,
}

impl Default for LoweringConfig {
    fn default() -> Self {
        Self {
            create_wire: true,
            wire_prefix: default_wire_prefix(),
            coalesce: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_wire_prefix() -> String {
    "ndarray".to_string()
}
