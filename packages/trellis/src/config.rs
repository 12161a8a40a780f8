//! Builder configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_layout::{LayoutConfig, LayoutState};

use crate::error::{ConfigError, Result};

/// Configuration for a builder instance.
///
/// Every field has a default, so `{}` is a valid config:
///
/// ```json
/// {
///   "root_type": "Column",
///   "plugins": ["outline", "frame"],
///   "plugin_props": {"theme": "dark"},
///   "key_attempts": 1024,
///   "layout": "saved/home.json"
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Type of the root node of a fresh tree.
    pub root_type: String,
    /// Plugin names, resolved in order against a catalog.
    pub plugins: Vec<String>,
    /// Context handed to every plugin factory.
    pub plugin_props: Value,
    pub key_attempts: u32,
    /// Saved tree to start from instead of a fresh one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<PathBuf>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            root_type: "Column".to_string(),
            plugins: Vec::new(),
            plugin_props: Value::Object(Default::default()),
            key_attempts: LayoutConfig::default().key_attempts,
            layout: None,
        }
    }
}

impl BuilderConfig {
    pub fn from_json_str(json: &str) -> std::result::Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::from_json_str(&read(path)?)?;
        // A relative layout path is relative to the config file.
        if let (Some(layout), Some(dir)) = (&config.layout, path.parent()) {
            if layout.is_relative() {
                config.layout = Some(dir.join(layout));
            }
        }
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.root_type.is_empty() {
            return Err(ConfigError::Invalid {
                message: "root_type must not be empty".to_string(),
            });
        }
        if self.key_attempts == 0 {
            return Err(ConfigError::Invalid {
                message: "key_attempts must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            key_attempts: self.key_attempts,
        }
    }

    /// The tree an editing session starts from.
    ///
    /// Loads `layout` when set, otherwise a root-only tree of `root_type`.
    pub fn initial_state(&self) -> Result<LayoutState> {
        let state = match &self.layout {
            Some(path) => LayoutState::from_json_str(&read(path)?)?,
            None => LayoutState::new(self.root_type.as_str()),
        };
        Ok(state.with_config(self.layout_config()))
    }
}

pub(crate) fn read(path: &Path) -> std::result::Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}
