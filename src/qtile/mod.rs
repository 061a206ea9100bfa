//! Qtile-specific implementations.
//!
//! This module provides the concrete backend for the
//! [`HostRuntime`](crate::traits::HostRuntime) trait, powered by Qtile's
//! `qtile cmd-obj` command client.
//!
//! Nothing outside this module should reference Qtile directly.

pub mod host;
