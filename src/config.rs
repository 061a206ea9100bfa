//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/wmprompt/config.json`.
//! Every section is optional; a minimal `{}` file is valid and all sections
//! fall back to their compiled-in defaults.  Unknown keys are ignored so the
//! file can grow new sections without breaking older daemons.
//!
//! # Example
//!
//! ```json
//! {
//!   "prompt": { "marker": ">" },
//!   "notifications": {
//!     "default_duration_ms": 2000,
//!     "styles": {
//!       "info":  { "fg": "#32302f", "bg": "#d79921" },
//!       "warn":  { "fg": "#ebdbb2", "bg": "#d65d0e" },
//!       "error": { "fg": "#ebdbb2", "bg": "#cc241d" }
//!     }
//!   },
//!   "sinks": { "files": ["/run/user/1000/wmprompt/slot0.json"], "log": true },
//!   "layout": { "web_group": "web" },
//!   "overlay": { "enabled": true, "monitors": 2 },
//!   "socket_path": "/run/user/1000/wmprompt.sock"
//! }
//! ```

use crate::notification::SeverityStyles;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub prompt: PromptConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Where notifications are displayed.
    #[serde(default)]
    pub sinks: SinkConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    /// GTK banner settings.  Ignored without the `overlay-gtk` feature.
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Listener socket.  Defaults to `$XDG_RUNTIME_DIR/wmprompt.sock`.
    #[serde(default)]
    pub socket_path: Option<PathBuf>,
}

/// Prompt appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Marker shown in front of the input.
    pub marker: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self { marker: ">".into() }
    }
}

/// Notification timing and colours.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long a notification stays visible when the sender does not say (ms).
    pub default_duration_ms: u64,
    pub styles: SeverityStyles,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 2000,
            styles: SeverityStyles::default(),
        }
    }
}

impl NotificationConfig {
    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default_duration_ms)
    }
}

/// Display sinks to create at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// One [`FileSink`](crate::sink::FileSink) per path.
    pub files: Vec<PathBuf>,
    /// Also mirror notifications into the log.
    pub log: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            log: true,
        }
    }
}

/// Host layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Group whose tree layout `add`/`del`/`col`/`exp`/`hide`/`show` drive.
    pub web_group: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            web_group: "web".into(),
        }
    }
}

/// GTK banner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub enabled: bool,
    /// Number of monitors to put a banner on, starting from the first.
    pub monitors: usize,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            monitors: 1,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
