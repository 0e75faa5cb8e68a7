//! Configuration for the editor

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_CAPACITY, DEFAULT_HISTORY_CAPACITY};
use crate::highlight;
use crate::parser::{DEFAULT_ESCAPE_TIMEOUT, DEFAULT_SEQUENCE_TIMEOUT};

/// Editor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Buffer and editing settings
    pub editor: EditorConfig,
    /// Selection behavior
    pub selection: SelectionConfig,
    /// Input decoding settings
    pub input: InputConfig,
    /// Keyword highlighting settings
    pub highlight: HighlightConfig,
}

/// Buffer and editing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum document size in bytes
    pub capacity: usize,
    /// Undo steps kept
    pub history_capacity: usize,
    /// Spaces inserted by Tab
    pub tab_width: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            tab_width: 2,
        }
    }
}

/// Selection behavior
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Start sessions with persistent selection mode on
    pub persistent_by_default: bool,
    /// In persistent mode a mouse press extends the selection instead of
    /// re-anchoring it
    pub mouse_extends_persistent: bool,
}

/// Input decoding settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Wait after a lone ESC before reporting Escape
    pub escape_timeout_ms: u64,
    /// Wait between bytes of a started escape sequence
    pub sequence_timeout_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            escape_timeout_ms: DEFAULT_ESCAPE_TIMEOUT.as_millis() as u64,
            sequence_timeout_ms: DEFAULT_SEQUENCE_TIMEOUT.as_millis() as u64,
        }
    }
}

impl InputConfig {
    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
    }

    pub fn sequence_timeout(&self) -> Duration {
        Duration::from_millis(self.sequence_timeout_ms)
    }
}

/// Keyword highlighting settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enabled: bool,
    /// Directory holding `<language>.config` keyword files
    pub languages_dir: Option<PathBuf>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            languages_dir: None,
        }
    }
}

impl HighlightConfig {
    /// Keyword directory, falling back to `<config-dir>/zt/languages`
    pub fn languages_dir(&self) -> Option<PathBuf> {
        self.languages_dir.clone().or_else(highlight::languages_dir)
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from default location or return default config
    pub fn load_or_default() -> Self {
        // Try to load from <config-dir>/zt/config.json
        if let Some(config_path) = default_path() {
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), error = %e, "ignoring config file")
                    }
                }
            }
        }
        Self::default()
    }
}

/// Default configuration file path
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("zt").join("config.json"))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.editor.capacity, 65536);
        assert_eq!(config.editor.history_capacity, 1024);
        assert_eq!(config.editor.tab_width, 2);
        assert!(!config.selection.persistent_by_default);
        assert_eq!(config.input.escape_timeout(), Duration::from_millis(25));
        assert!(config.highlight.enabled);
    }

    #[test]
    fn test_config_partial_json() {
        let config: Config =
            serde_json::from_str(r#"{"editor": {"tab_width": 4}, "selection": {"persistent_by_default": true}}"#)
                .unwrap();
        assert_eq!(config.editor.tab_width, 4);
        assert_eq!(config.editor.capacity, DEFAULT_CAPACITY);
        assert!(config.selection.persistent_by_default);
        assert_eq!(config.input, InputConfig::default());
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.highlight.languages_dir = Some(PathBuf::from("/tmp/langs"));
        config.input.sequence_timeout_ms = 50;
        config.save(&path).unwrap();

        let restored = Config::load(&path).unwrap();
        assert_eq!(restored, config);
        assert_eq!(
            restored.highlight.languages_dir(),
            Some(PathBuf::from("/tmp/langs"))
        );
    }

    #[test]
    fn test_config_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Json(_))));
    }
}
