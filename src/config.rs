//! User settings
//!
//! The language server receives these as JSON (`octopus.*` client settings);
//! the CLI reads them from a `.octopus-tools.yaml` file next to the input.

use crate::catalog::DEFAULT_VERSION;
use crate::error::{OctoError, OctoResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the per-project settings file looked up by the CLI
pub const PROJECT_SETTINGS_FILE: &str = ".octopus-tools.yaml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Octopus release whose variables are used for checking
    pub version: String,
    /// Directory holding extra `varinfo-<version>.json` files
    pub data_dir: Option<PathBuf>,
    pub inlay_hints: InlayHintSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            data_dir: None,
            inlay_hints: InlayHintSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InlayHintSettings {
    pub enabled: bool,
    pub show_builtin: bool,
    pub show_user: bool,
}

impl Default for InlayHintSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            show_builtin: true,
            show_user: true,
        }
    }
}

impl Settings {
    /// Parse settings sent by an LSP client.
    ///
    /// Accepts either the bare settings object or one nested under `octopus`.
    pub fn from_lsp_value(value: serde_json::Value) -> OctoResult<Self> {
        let inner = match value {
            serde_json::Value::Object(mut map) if map.contains_key("octopus") => {
                map.remove("octopus").unwrap_or_default()
            }
            other => other,
        };
        if inner.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(inner).map_err(|e| OctoError::Config(e.to_string()))
    }

    /// Read a YAML settings file
    pub fn from_yaml_file(path: &Path) -> OctoResult<Self> {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Find `.octopus-tools.yaml` in `start` or one of its ancestors
    pub fn discover(start: &Path) -> OctoResult<Option<Self>> {
        for dir in start.ancestors() {
            let candidate = dir.join(PROJECT_SETTINGS_FILE);
            if candidate.is_file() {
                let mut settings = Self::from_yaml_file(&candidate)?;
                // A relative data directory is relative to the settings file
                if let Some(data_dir) = settings.data_dir.as_mut() {
                    if data_dir.is_relative() {
                        *data_dir = dir.join(&*data_dir);
                    }
                }
                return Ok(Some(settings));
            }
        }
        Ok(None)
    }
}
