//! User configuration, persisted as TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::infer::InferenceConfig;
use crate::layout::GlyphStyle;

/// How inputs are set when a session starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InitialInputs {
    /// Every input starts true.
    #[default]
    AllOn,
    /// Every input starts false.
    AllOff,
}

impl InitialInputs {
    pub fn is_on(self) -> bool {
        matches!(self, InitialInputs::AllOn)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Connector character set.
    #[serde(default)]
    pub glyphs: GlyphStyle,
    /// Input state for sessions started outside the menu.
    #[serde(default)]
    pub initial_inputs: InitialInputs,
    /// Terminal event poll interval in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Optional cap on inference passes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_passes: Option<usize>,
}

fn default_poll_interval_ms() -> u64 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            glyphs: GlyphStyle::default(),
            initial_inputs: InitialInputs::default(),
            poll_interval_ms: default_poll_interval_ms(),
            max_passes: None,
        }
    }
}

impl Config {
    /// The inference settings this config selects.
    pub fn inference(&self) -> InferenceConfig {
        InferenceConfig {
            max_passes: self.max_passes,
        }
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = toml::from_str("glyphs = \"ascii\"").unwrap();
        assert_eq!(config.glyphs, GlyphStyle::Ascii);
        assert_eq!(config.initial_inputs, InitialInputs::AllOn);
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.max_passes, None);
    }

    #[test]
    fn kebab_case_input_modes() {
        let config: Config = toml::from_str("initial_inputs = \"all-off\"").unwrap();
        assert!(!config.initial_inputs.is_on());
    }

    #[test]
    fn unknown_glyph_style_is_rejected() {
        assert!(toml::from_str::<Config>("glyphs = \"emoji\"").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Path::new("/nonexistent/regula.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
