//! Wire vocabulary shared by the prompt widget, the listener and the
//! session.
//!
//! The prompt widget (or a key-binding helper script) sends one
//! [`PromptEvent`] per line and receives one [`PromptReply`] per line.

use crate::notification::Severity;
use serde::{Deserialize, Serialize};
use std::sync::mpsc;

/// Everything the prompt side can ask of the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptEvent {
    /// The prompt opened.  Starts a fresh completion session and replies
    /// with the marker to display.
    Start,

    /// Tab pressed with the given input text.  Replies with the next
    /// candidate to display.
    Complete(String),

    /// The input text changed by typing or deleting.
    Reset,

    /// Ask for the value behind the last completion shown.
    Accept,

    /// The user pressed enter.  Dispatches the line and ends the session.
    Submit(String),

    /// The prompt closed without submitting.
    Cancel,

    /// Show a group on its pinned screen (or the focused one).
    ShowGroup(String),

    /// Queue a notification from outside, e.g. a shell script.
    Notify {
        message: String,
        #[serde(default)]
        severity: Option<Severity>,
        #[serde(default)]
        duration_ms: Option<u64>,
    },
}

/// The daemon's answer to a [`PromptEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptReply {
    Ok,
    /// Marker to show in front of the input.
    Prompt(String),
    /// Text to put into the input after a completion request.
    Completion(String),
    /// Value of the last completion, if one was produced this session.
    LastCompletion(Option<String>),
    /// The request could not be parsed or handled.
    Error(String),
}

/// A [`PromptEvent`] together with the channel its reply goes to.
///
/// Sources that do not care about replies (tests, fire-and-forget key
/// bindings) leave `reply` empty.
#[derive(Debug)]
pub struct PromptRequest {
    pub event: PromptEvent,
    pub reply: Option<mpsc::Sender<PromptReply>>,
}

impl PromptRequest {
    pub fn new(event: PromptEvent) -> Self {
        Self { event, reply: None }
    }

    pub fn with_reply(event: PromptEvent, reply: mpsc::Sender<PromptReply>) -> Self {
        Self {
            event,
            reply: Some(reply),
        }
    }

    /// Send `reply` back if anyone is listening.
    pub fn respond(self, reply: PromptReply) {
        if let Some(tx) = self.reply {
            let _ = tx.send(reply);
        }
    }
}
