// ABOUTME: Editor configuration handling.
// ABOUTME: Loads and saves drag, codec, and palette settings from TOML config files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::Color;

/// Pointer drag tuning for dividers and padding handles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeSettings {
    /// Fixed margin (in pointer units) subtracted from each end of a split's
    /// extent before converting a drag delta into a ratio change
    pub divider_margin: f32,
    /// Scale applied to padding drags (1.0 = the edge follows the pointer)
    pub padding_sensitivity: f32,
}

impl Default for ResizeSettings {
    fn default() -> Self {
        Self {
            divider_margin: 2.0,
            padding_sensitivity: 0.5,
        }
    }
}

/// Layout document settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSettings {
    /// Share one image entry between nodes carrying identical payloads
    pub dedupe_images: bool,
    /// Write indented JSON
    pub pretty: bool,
    /// Directory new layout files are saved into (None = per-user data dir)
    pub layout_dir: Option<PathBuf>,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            dedupe_images: true,
            pretty: true,
            layout_dir: None,
        }
    }
}

/// Background swatches offered by the color picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub swatches: Vec<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            swatches: Color::presets(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Divider and padding drag behavior
    pub resize: ResizeSettings,

    /// Save/load behavior
    pub codec: CodecSettings,

    /// Color picker swatches
    pub palette: Palette,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("No per-user {0} directory on this platform")]
    NoUserDir(&'static str),
}

const APP_DIR: &str = "splitbox";

impl CodecSettings {
    /// Where new layout files go: `layout_dir` if set, else `<data_dir>/splitbox/layouts`
    pub fn resolved_layout_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.layout_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|p| p.join(APP_DIR).join("layouts"))
                .ok_or(ConfigError::NoUserDir("data")),
        }
    }
}

impl EditorConfig {
    /// `<config_dir>/splitbox/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR).join("config.toml"))
            .ok_or(ConfigError::NoUserDir("config"))
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Defaults when no config file exists; a broken file is logged and skipped
    pub fn load_or_default() -> Self {
        let path = match Self::default_path() {
            Ok(path) if path.exists() => path,
            _ => return Self::default(),
        };
        match Self::load(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring editor config");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Write to [`Self::default_path`], returning the path written
    pub fn save_to_default(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path()?;
        self.save(&path)?;
        tracing::debug!(path = %path.display(), "editor config saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let mut config = EditorConfig::default();
        config.resize.padding_sensitivity = 0.25;
        config.codec.dedupe_images = false;
        config.palette.swatches = vec![Color::AQUA];

        let temp_path = std::env::temp_dir().join("splitbox_test_config.toml");
        config.save(&temp_path).unwrap();

        let loaded = EditorConfig::load(&temp_path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EditorConfig = toml::from_str("[resize]\ndivider_margin = 6.0\n").unwrap();
        assert_eq!(config.resize.divider_margin, 6.0);
        assert_eq!(config.resize.padding_sensitivity, 0.5);
        assert!(config.codec.dedupe_images);
        assert_eq!(config.palette.swatches.len(), 6);
    }

    #[test]
    fn test_swatches_are_hex_strings() {
        let config: EditorConfig =
            toml::from_str("[palette]\nswatches = [\"#123456\", \"#fff\"]\n").unwrap();
        assert_eq!(
            config.palette.swatches,
            vec![Color::rgb(0x12, 0x34, 0x56), Color::rgb(0xff, 0xff, 0xff)]
        );

        let bad = toml::from_str::<EditorConfig>("[palette]\nswatches = [\"red\"]\n");
        assert!(bad.is_err());
    }

    #[test]
    fn test_default_path() {
        if let Ok(p) = EditorConfig::default_path() {
            assert!(p.ends_with("splitbox/config.toml"));
        }
    }

    #[test]
    fn test_layout_dir_override() {
        let config = EditorConfig::from_toml("[codec]\nlayout_dir = \"/tmp/boards\"\n").unwrap();
        assert_eq!(
            config.codec.resolved_layout_dir().unwrap(),
            PathBuf::from("/tmp/boards")
        );

        if let Ok(dir) = CodecSettings::default().resolved_layout_dir() {
            assert!(dir.ends_with("splitbox/layouts"));
        }
    }

    #[test]
    fn test_broken_file_reports_parse_error() {
        let err = EditorConfig::from_toml("[resize]\ndivider_margin = \"wide\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
