//! Display sinks that need no GUI toolkit.
//!
//! * [`LogSink`] mirrors every update into the log.
//! * [`FileSink`] rewrites a small JSON file on every update, for status
//!   bars that poll a file (e.g. a custom module running `cat`).
//!
//! # File format
//!
//! One JSON object, followed by `\n`:
//!
//! ```json
//! {"text":"Unknown command 'x'","fg":"#ebdbb2","bg":"#cc241d"}
//! {"text":""}
//! ```

use crate::notification::ColorPair;
use crate::traits::{DisplaySink, SinkError};
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Writes notifications to the log at `info` level.
#[derive(Debug, Default)]
pub struct LogSink;

impl DisplaySink for LogSink {
    fn show(&mut self, text: &str, _colors: &ColorPair) -> Result<(), SinkError> {
        info!("notification: {}", text);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

#[derive(Serialize)]
struct SlotJson<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fg: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bg: Option<&'a str>,
}

/// Keeps a JSON file in sync with the current notification.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// The file (and its parent directory) is created on first update.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, slot: &SlotJson<'_>) -> Result<(), SinkError> {
        let mut line = serde_json::to_string(slot)
            .map_err(|e| SinkError(format!("encode for {}: {}", self.path.display(), e)))?;
        line.push('\n');
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| SinkError(format!("create {}: {}", dir.display(), e)))?;
        }
        std::fs::write(&self.path, line)
            .map_err(|e| SinkError(format!("write {}: {}", self.path.display(), e)))
    }
}

impl DisplaySink for FileSink {
    fn show(&mut self, text: &str, colors: &ColorPair) -> Result<(), SinkError> {
        self.write(&SlotJson {
            text,
            fg: Some(colors.fg.as_str()),
            bg: Some(colors.bg.as_str()),
        })
    }

    fn clear(&mut self) -> Result<(), SinkError> {
        self.write(&SlotJson {
            text: "",
            fg: None,
            bg: None,
        })
    }
}
