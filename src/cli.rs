//! CLI argument parsing and conversion to configuration overrides.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::replay::ReplayStep;

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML format (default)
    #[default]
    Yaml,
    /// JSON format
    Json,
}

/// Broadcast native window events to a component tree and trace who handles them.
#[derive(Parser, Debug)]
#[command(name = "tuicast")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Native event to replay: scroll:Y, resize:WxH, or dismiss (repeatable, in order)
    #[arg(short, long = "step", value_name = "STEP")]
    pub steps: Vec<ReplayStep>,

    /// Viewport width in columns (default: 80)
    #[arg(long)]
    pub width: Option<u16>,

    /// Viewport height in rows (default: 24)
    #[arg(long)]
    pub height: Option<u16>,

    /// Scrollable content height in rows (default: 200)
    #[arg(long, value_name = "ROWS")]
    pub content_height: Option<u32>,

    /// Initial vertical scroll offset (default: 0)
    #[arg(long, value_name = "ROWS")]
    pub scroll_y: Option<i32>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: yaml or json
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Launch interactive TUI
    #[arg(short, long)]
    pub interactive: bool,

    /// Load configuration from TOML file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Save the effective configuration to TOML file
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Log file path (default: tuicast.log)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error (default: info)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Generate shell completions for the specified shell
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,
}

/// CLI values in configuration shape. Unset fields are skipped when
/// serialized so they do not replace values from the TOML file.
#[derive(Debug, Default, Serialize)]
pub struct ConfigOverrides {
    pub window: WindowOverrides,
    pub replay: ReplayOverrides,
    pub logging: LoggingOverrides,
}

#[derive(Debug, Default, Serialize)]
pub struct WindowOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_y: Option<i32>,
}

#[derive(Debug, Default, Serialize)]
pub struct ReplayOverrides {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<ReplayStep>,
}

#[derive(Debug, Default, Serialize)]
pub struct LoggingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl Cli {
    /// Convert flat CLI args to nested overrides for Figment merging.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            window: WindowOverrides {
                width: self.width,
                height: self.height,
                content_height: self.content_height,
                scroll_y: self.scroll_y,
            },
            replay: ReplayOverrides {
                steps: self.steps.clone(),
            },
            logging: LoggingOverrides {
                file: self.log_file.clone(),
                level: self.log_level.clone(),
            },
        }
    }
}
