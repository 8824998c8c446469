use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Notation used for task metadata the engine emits (completion markers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataFormat {
    /// Emoji notation: `✅ 2025-07-07`
    #[default]
    Tasks,
    /// Dataview inline-field notation: `[completion:: 2025-07-07]`
    Dataview,
}

/// Configuration from onward.toml at the vault root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub metadata_format: MetadataFormat,
    #[serde(default)]
    pub on_completion: OnCompletionSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnCompletionSettings {
    /// Archive file used when a directive names none.
    #[serde(default)]
    pub default_archive_file: Option<String>,
}

/// Error type for settings loading
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse onward.toml: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// File name looked up at the vault root.
pub const SETTINGS_FILE: &str = "onward.toml";

impl Settings {
    /// Load settings from `<vault_root>/onward.toml`. A missing file yields
    /// the defaults; a present-but-malformed file is an error.
    pub fn load(vault_root: &Path) -> Result<Settings, SettingsError> {
        let path = vault_root.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Settings::default());
        }
        let text = fs::read_to_string(&path).map_err(|e| SettingsError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(toml::from_str(&text)?)
    }
}
