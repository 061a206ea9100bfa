//! **wmprompt**: a command prompt and notification daemon for Qtile.
//!
//! A prompt widget sends what the user types; wmprompt completes command
//! names, runs the submitted line against a registry of commands and
//! reports every outcome as a timed notification.  Notifications are shown
//! one at a time, oldest first, in the severity's colours.
//!
//! # Architecture
//!
//! The crate is organised around the collaborator traits in [`traits`]:
//!
//! * [`traits::HostRuntime`]: the window manager the commands act on
//!   (groups, screens, the tree layout).
//! * [`traits::DisplaySink`] and [`traits::Timer`]: where notifications
//!   are shown and how the next one is scheduled.
//! * [`traits::PromptSource`]: the transport that delivers prompt events
//!   (a Unix socket, a test harness, …).
//!
//! [`session::Session`] ties the [`command`] registry, the [`completion`]
//! cycler and the [`notification`] queue together.  Concrete backends live
//! in [`qtile`] (the `qtile cmd-obj` client), [`ipc`] (Unix-socket
//! listener), [`sink`] and [`overlay`] (GTK banner).

pub mod bindings;
pub mod command;
pub mod commands;
pub mod completion;
pub mod config;
pub mod dispatcher;
pub mod event;
pub mod ipc;
pub mod notification;
pub mod overlay;
pub mod qtile;
pub mod runtime;
pub mod session;
pub mod sink;
pub mod traits;
