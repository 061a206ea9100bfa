//! IPC listener that accepts prompt events over a Unix socket.
//!
//! The prompt widget and helper scripts connect to the socket, send
//! newline-delimited JSON [`PromptEvent`](crate::event::PromptEvent)s and
//! read one JSON [`PromptReply`](crate::event::PromptReply) line back per
//! event.

pub mod listener;
