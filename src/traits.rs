//! Core traits that decouple wmprompt from any specific window manager,
//! status bar or transport mechanism.
//!
//! Every concrete backend (Qtile, a Unix-socket listener, a GTK banner, a
//! test harness, …) implements one of these traits.  The
//! [`Session`](crate::session::Session) only depends on these abstractions.

use crate::event::PromptRequest;
use crate::notification::ColorPair;
use std::sync::mpsc;
use std::time::Duration;

/// Handle to a live group (workspace) owned by the host window manager.
///
/// Obtained from [`HostRuntime::find_group_by_name`] and only valid for the
/// duration of one command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupHandle {
    /// Name the host uses for the group.
    pub name: String,
}

/// Operations on the tree layout of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutOp {
    /// Add a top-level section with the given title.
    AddSection(String),
    /// Remove the section with the given title.
    DelSection(String),
    /// Collapse the branch under the focused window.
    CollapseBranch,
    /// Expand the branch under the focused window.
    ExpandBranch,
    /// Hide the tab panel.
    HideTabs,
    /// Show the tab panel again.
    ShowTabs,
}

/// Abstraction over the window manager that hosts the prompt.
///
/// An implementation might talk to Qtile through its command client, or it
/// might be a recording stub used in tests.
pub trait HostRuntime {
    /// The error type produced by this host.
    type Error: std::error::Error + Send + 'static;

    /// Look up a live group by name.  Returns `None` if the host has no such
    /// group.
    fn find_group_by_name(&self, name: &str) -> Result<Option<GroupHandle>, Self::Error>;

    /// Name of the group shown on the focused screen, if any.
    fn current_group(&self) -> Result<Option<String>, Self::Error>;

    /// Index of the focused screen, if any.
    fn current_screen(&self) -> Result<Option<usize>, Self::Error>;

    /// Run a layout operation against the current layout of `group`.
    fn layout_call(&self, group: &GroupHandle, op: LayoutOp) -> Result<(), Self::Error>;

    /// Show `group` on `screen`, or on the focused screen when `None`.
    fn group_to_screen(&self, group: &str, screen: Option<usize>) -> Result<(), Self::Error>;
}

/// Error reported by a [`DisplaySink`].
#[derive(Debug, thiserror::Error)]
#[error("display sink error: {0}")]
pub struct SinkError(pub String);

/// A host-owned text slot (typically a status-bar element) that displays
/// the notification currently at the head of the queue.
pub trait DisplaySink {
    /// Replace the slot text and colours.
    fn show(&mut self, text: &str, colors: &ColorPair) -> Result<(), SinkError>;

    /// Reset the slot to empty text.
    fn clear(&mut self) -> Result<(), SinkError>;
}

/// Deferred re-invocation of the notification drain step.
///
/// A call to [`schedule`](Timer::schedule) arranges for exactly one future
/// call of [`NotificationQueue::drain_step`](crate::notification::NotificationQueue::drain_step)
/// once `after` has elapsed.  The timer never blocks; firing is the event
/// loop's job.
pub trait Timer {
    fn schedule(&mut self, after: Duration);
}

/// A source of [`PromptRequest`]s.
///
/// Implementations listen on some transport (a Unix socket, an in-memory
/// channel, …) and forward parsed requests into the provided
/// [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](PromptSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received request must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait PromptSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming request into `sink`.
    fn run(&mut self, sink: mpsc::Sender<PromptRequest>) -> Result<(), Self::Error>;
}
