//! TOML configuration file support for replays and the TUI.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::replay::{ReplayStep, WindowState};

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading/writing file
    Io(std::io::Error),
    /// TOML parsing error
    Parse(toml::de::Error),
    /// TOML serialization error
    Serialize(toml::ser::Error),
    /// Error merging configuration layers
    Merge(Box<figment::Error>),
    /// A value is out of range
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(e) => write!(f, "TOML parse error: {}", e),
            Self::Serialize(e) => write!(f, "TOML serialize error: {}", e),
            Self::Merge(e) => write!(f, "Configuration error: {}", e),
            Self::Invalid(s) => write!(f, "Invalid configuration: {}", s),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Serialize(e)
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Merge(Box::new(e))
    }
}

/// Root configuration structure for TOML files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuicastConfig {
    /// Viewport the events are replayed in
    pub window: WindowConfig,
    /// Headless replay settings
    pub replay: ReplayConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

/// Viewport settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Viewport width in columns
    pub width: u16,
    /// Viewport height in rows
    pub height: u16,
    /// Total scrollable content height in rows
    pub content_height: u32,
    /// Initial vertical scroll offset
    pub scroll_y: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            content_height: 200,
            scroll_y: 0,
        }
    }
}

impl WindowConfig {
    pub fn to_state(&self) -> WindowState {
        WindowState {
            width: self.width,
            height: self.height,
            content_height: self.content_height,
            scroll_y: self.scroll_y,
        }
    }
}

/// Replay settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Native events to replay, in order
    pub steps: Vec<ReplayStep>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file path
    pub file: Option<PathBuf>,
    /// Level filter: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

impl TuicastConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Merge defaults, an optional TOML file, and overrides, in that order.
    ///
    /// `overrides` should skip unset fields when serialized so that only
    /// explicitly provided values replace what the file says.
    pub fn layered<T: Serialize>(file: Option<&Path>, overrides: &T) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            if !path.exists() {
                return Err(ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file not found: {}", path.display()),
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        let config: Self = figment.merge(Serialized::defaults(overrides)).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject window settings no viewport can have.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if self.window.scroll_y < 0 {
            return Err(ConfigError::Invalid(format!(
                "scroll_y must not be negative, got {}",
                self.window.scroll_y
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Overrides {
        window: WindowOverrides,
    }

    #[derive(Serialize)]
    struct WindowOverrides {
        #[serde(skip_serializing_if = "Option::is_none")]
        width: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        height: Option<u16>,
    }

    #[test]
    fn unset_overrides_keep_defaults() {
        let overrides = Overrides {
            window: WindowOverrides {
                width: Some(120),
                height: None,
            },
        };

        let config = TuicastConfig::layered(None, &overrides).unwrap();
        assert_eq!(config.window.width, 120);
        assert_eq!(config.window.height, 24);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn zero_sized_window_is_rejected() {
        let overrides = Overrides {
            window: WindowOverrides {
                width: Some(0),
                height: None,
            },
        };

        let err = TuicastConfig::layered(None, &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = TuicastConfig::layered(Some(Path::new("/nonexistent/tuicast.toml")), &())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
