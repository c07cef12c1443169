//! Desktop configuration.
//!
//! [`DesktopConfig`] collects the tunables of input routing. Every field has
//! a default, so a TOML file only needs the values it changes:
//!
//! ```toml
//! double_click_interval_ms = 400
//! event_discipline = "bubbling"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order in which events queued during one input pass are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventDiscipline {
    /// First queued, first dispatched.
    #[default]
    Capturing,
    /// Last queued, first dispatched.
    Bubbling,
}

/// Errors loading, saving or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("{field} is out of range: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables of a [`Desktop`](crate::desktop::Desktop).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    /// Two touch-downs closer than this (strictly) form a double click.
    pub double_click_interval_ms: u64,
    /// Maximum per-axis distance between the two touch-downs, inclusive.
    pub double_click_radius: f32,
    /// Delay before a held key starts repeating.
    pub repeat_key_down_start_ms: u64,
    /// Delay between repeats of a held key.
    pub repeat_key_down_interval_ms: u64,
    pub event_discipline: EventDiscipline,
    /// Read touches from the input source's touch panel instead of
    /// treating a pressed mouse button as a touch.
    pub touch_input: bool,
    /// Whether Tab and Shift+Tab move keyboard focus.
    pub tab_navigation: bool,
    /// Opacity applied to everything the desktop renders.
    pub opacity: f32,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            double_click_interval_ms: 500,
            double_click_radius: 2.0,
            repeat_key_down_start_ms: 500,
            repeat_key_down_interval_ms: 50,
            event_discipline: EventDiscipline::Capturing,
            touch_input: false,
            tab_navigation: true,
            opacity: 1.0,
        }
    }
}

impl DesktopConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Write the configuration as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.double_click_radius.is_finite() || self.double_click_radius < 0.0 {
            return Err(ConfigError::Invalid {
                field: "double_click_radius",
                reason: format!("expected a non-negative number, got {}", self.double_click_radius),
            });
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ConfigError::Invalid {
                field: "opacity",
                reason: format!("expected a value in [0, 1], got {}", self.opacity),
            });
        }
        if self.repeat_key_down_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "repeat_key_down_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn double_click_interval(&self) -> Duration {
        Duration::from_millis(self.double_click_interval_ms)
    }

    #[inline]
    pub fn repeat_key_down_start(&self) -> Duration {
        Duration::from_millis(self.repeat_key_down_start_ms)
    }

    #[inline]
    pub fn repeat_key_down_interval(&self) -> Duration {
        Duration::from_millis(self.repeat_key_down_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = DesktopConfig::from_toml_str(
            r#"
double_click_interval_ms = 300
event_discipline = "bubbling"
"#,
        )
        .unwrap();

        assert_eq!(config.double_click_interval(), Duration::from_millis(300));
        assert_eq!(config.event_discipline, EventDiscipline::Bubbling);
        assert_eq!(config.repeat_key_down_start_ms, 500);
        assert!(config.tab_navigation);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let err = DesktopConfig::from_toml_str("opacity = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "opacity", .. }));

        let err = DesktopConfig::from_toml_str("event_discipline = \"sideways\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desktop.toml");

        let config = DesktopConfig {
            touch_input: true,
            double_click_radius: 4.0,
            ..DesktopConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(DesktopConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = DesktopConfig::load("/nonexistent/weft/desktop.toml").unwrap_err();
        assert!(err.to_string().contains("desktop.toml"));
    }
}
