//! Timed, severity-tagged status messages.
//!
//! [`NotificationQueue`] is a FIFO of pending [`Notification`]s drained one
//! at a time onto every attached [`DisplaySink`].  Each message stays
//! visible for its own duration; the queue then advances to the next one.
//!
//! # State machine
//!
//! ```text
//!            enqueue (queue was idle)
//!   Idle ──────────────────────────────▶ Draining ──┐
//!    ▲                                      │       │ drain step, queue
//!    │      drain step finds queue empty    │       │ non-empty: pop, show,
//!    └──────────────────────────────────────┘  ◀────┘ schedule next step
//! ```
//!
//! Enqueueing while already draining only appends; the step that is already
//! scheduled picks the new entry up.

use crate::traits::{DisplaySink, Timer};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

/// How urgent a notification is.  Selects the display colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warn => write!(f, "warn"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single queued message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    /// How long the message stays on the sinks before the next one.
    pub duration: Duration,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity, duration: Duration) -> Self {
        Self {
            message: message.into(),
            severity,
            duration,
        }
    }
}

/// Foreground / background colour pair, as CSS-style colour strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub fg: String,
    pub bg: String,
}

impl ColorPair {
    pub fn new(fg: impl Into<String>, bg: impl Into<String>) -> Self {
        Self {
            fg: fg.into(),
            bg: bg.into(),
        }
    }
}

/// Severity → colour table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityStyles {
    pub info: ColorPair,
    pub warn: ColorPair,
    pub error: ColorPair,
}

impl Default for SeverityStyles {
    fn default() -> Self {
        Self {
            info: ColorPair::new("#32302f", "#d79921"),
            warn: ColorPair::new("#ebdbb2", "#d65d0e"),
            error: ColorPair::new("#ebdbb2", "#cc241d"),
        }
    }
}

impl SeverityStyles {
    pub fn for_severity(&self, severity: Severity) -> &ColorPair {
        match severity {
            Severity::Info => &self.info,
            Severity::Warn => &self.warn,
            Severity::Error => &self.error,
        }
    }
}

/// FIFO of pending notifications plus the sinks they are drained onto.
///
/// `draining` is true iff a drain step is scheduled or running.
pub struct NotificationQueue {
    pending: VecDeque<Notification>,
    draining: bool,
    sinks: Vec<Box<dyn DisplaySink>>,
    timer: Box<dyn Timer>,
    styles: SeverityStyles,
    default_duration: Duration,
}

impl NotificationQueue {
    /// Create an idle, empty queue.
    pub fn new(
        sinks: Vec<Box<dyn DisplaySink>>,
        timer: Box<dyn Timer>,
        styles: SeverityStyles,
        default_duration: Duration,
    ) -> Self {
        Self {
            pending: VecDeque::new(),
            draining: false,
            sinks,
            timer,
            styles,
            default_duration,
        }
    }

    /// Whether a drain cycle is in progress.
    pub fn is_draining(&self) -> bool {
        self.draining
    }

    /// Number of notifications waiting behind the one on display.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Duration used by [`notify`](Self::notify).
    pub fn default_duration(&self) -> Duration {
        self.default_duration
    }

    /// Enqueue `message` with the default display duration.
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        let duration = self.default_duration;
        self.enqueue(Notification::new(message, severity, duration));
    }

    /// Append a notification.  Starts a drain cycle if the queue was idle.
    pub fn enqueue(&mut self, notification: Notification) {
        debug!(
            "enqueue [{}] {:?} for {}ms",
            notification.severity,
            notification.message,
            notification.duration.as_millis()
        );
        self.pending.push_back(notification);
        if !self.draining {
            self.draining = true;
            self.drain_step();
        }
    }

    /// Show the next notification and schedule the following step, or clear
    /// the sinks and go idle if nothing is left.
    ///
    /// Called once by [`enqueue`](Self::enqueue) to start a cycle, then once
    /// per [`Timer`] expiry.
    pub fn drain_step(&mut self) {
        match self.pending.pop_front() {
            Some(n) => {
                let colors = self.styles.for_severity(n.severity);
                for sink in &mut self.sinks {
                    if let Err(e) = sink.show(&n.message, colors) {
                        error!("{}", e);
                    }
                }
                self.timer.schedule(n.duration);
            }
            None => {
                for sink in &mut self.sinks {
                    if let Err(e) = sink.clear() {
                        error!("{}", e);
                    }
                }
                self.draining = false;
                debug!("notification queue idle");
            }
        }
    }
}
