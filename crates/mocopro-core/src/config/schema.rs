//! Configuration schema for config.toml

use serde::{Deserialize, Serialize};

/// Which container runtime to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimePreference {
    /// Probe podman first, then docker
    #[default]
    Auto,
    Podman,
    Docker,
}

/// Root settings structure for config.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Preferred container runtime
    #[serde(default)]
    pub container_runtime: RuntimePreference,

    /// Start servers detached when `--detach` is not given
    #[serde(default)]
    pub default_detach: bool,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize settings to TOML text.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
