//! Translation settings.
//!
//! Example config.toml:
//! ```toml
//! reserved_params = 1
//! api_object = "API"
//! ```

use serde::Deserialize;
use std::path::Path;

/// Settings shared by every translation a converter performs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScriptifyConfig {
    /// Leading parameters that are never bound (the `self`/context slot).
    pub reserved_params: usize,
    /// Root name whose method calls are VK API calls (`API.users.get(...)`).
    pub api_object: String,
}

impl Default for ScriptifyConfig {
    fn default() -> Self {
        Self {
            reserved_params: 1,
            api_object: "API".to_string(),
        }
    }
}

impl ScriptifyConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load config from a file path. Missing or invalid files yield `None`.
    pub fn load(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match Self::from_toml_str(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "ignoring invalid config");
                None
            }
        }
    }
}
