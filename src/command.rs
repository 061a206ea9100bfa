//! Commands and the registry that names them.
//!
//! This module defines the vocabulary every typed command shares:
//! [`Command`] is the capability a name maps to, [`CommandContext`] is what
//! a command may touch while it runs, and [`Registry`] is the name → command
//! table consulted by the [`dispatcher`](crate::dispatcher) and the
//! [`completion`](crate::completion) cycler.

use crate::bindings::ScreenBindings;
use crate::notification::{NotificationQueue, Severity};
use crate::traits::HostRuntime;
use indexmap::IndexMap;
use log::warn;
use std::fmt;

/// Failure of a single command invocation.
///
/// Never fatal to the daemon: the dispatcher reports it as an error
/// notification and carries on.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The host window manager returned an error.
    #[error("host error: {0}")]
    Host(String),
    /// A group the command needs does not exist on the host.
    #[error("no group named '{0}'")]
    GroupNotFound(String),
    /// The host reports no focused group.
    #[error("no focused group")]
    NoCurrentGroup,
    /// The host reports no focused screen.
    #[error("no focused screen")]
    NoCurrentScreen,
}

impl CommandError {
    /// Wrap a host-side error.
    pub fn host(e: impl fmt::Display) -> Self {
        CommandError::Host(e.to_string())
    }
}

/// Everything a command may read or modify while it runs.
pub struct CommandContext<'a, H: HostRuntime> {
    pub host: &'a H,
    pub registry: &'a Registry<H>,
    pub notifications: &'a mut NotificationQueue,
    pub bindings: &'a mut ScreenBindings,
}

impl<H: HostRuntime> CommandContext<'_, H> {
    /// Queue a notification with the default display duration.
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.notifications.notify(message, severity);
    }
}

/// A named action that can be typed into the prompt.
pub trait Command<H: HostRuntime> {
    /// Run the command with the whitespace-separated tokens that followed
    /// its name.
    fn invoke(&self, args: &[&str], ctx: &mut CommandContext<'_, H>) -> Result<(), CommandError>;

    /// One-line description shown by `help`.
    fn help_text(&self) -> &str;
}

/// A [`Command`] built from a closure.
pub struct FnCommand<F> {
    help: String,
    f: F,
}

impl<F> FnCommand<F> {
    pub fn new(help: impl Into<String>, f: F) -> Self {
        Self {
            help: help.into(),
            f,
        }
    }
}

impl<H, F> Command<H> for FnCommand<F>
where
    H: HostRuntime,
    F: Fn(&[&str], &mut CommandContext<'_, H>) -> Result<(), CommandError>,
{
    fn invoke(&self, args: &[&str], ctx: &mut CommandContext<'_, H>) -> Result<(), CommandError> {
        (self.f)(args, ctx)
    }

    fn help_text(&self) -> &str {
        &self.help
    }
}

/// Name → command table.
///
/// Lookups are by exact name.  Iteration follows registration order.
/// Registering a name twice replaces the earlier command.
pub struct Registry<H: HostRuntime> {
    commands: IndexMap<String, Box<dyn Command<H>>>,
}

impl<H: HostRuntime> Default for Registry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: HostRuntime> Registry<H> {
    pub fn new() -> Self {
        Self {
            commands: IndexMap::new(),
        }
    }

    /// Register `command` under `name`, returning the command it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        command: Box<dyn Command<H>>,
    ) -> Option<Box<dyn Command<H>>> {
        let name = name.into();
        let previous = self.commands.insert(name.clone(), command);
        if previous.is_some() {
            warn!("command '{}' registered twice, keeping the last one", name);
        }
        previous
    }

    /// Register a closure as a command.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, help: impl Into<String>, f: F)
    where
        F: Fn(&[&str], &mut CommandContext<'_, H>) -> Result<(), CommandError> + 'static,
    {
        self.register(name, Box::new(FnCommand::new(help, f)));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command<H>> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Help text of `name`, if registered.
    pub fn help_text(&self, name: &str) -> Option<&str> {
        self.get(name).map(|c| c.help_text())
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Split a typed line into the command name and its argument tokens.
///
/// Returns `None` for an empty or whitespace-only line.
pub fn split_line(line: &str) -> Option<(&str, Vec<&str>)> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?;
    Some((name, tokens.collect()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::traits::{GroupHandle, LayoutOp};

    /// Host with nothing in it, for tests that never reach the host.
    #[derive(Debug, Default)]
    pub(crate) struct NullHost;

    #[derive(Debug, thiserror::Error)]
    #[error("null host")]
    pub(crate) struct NullHostError;

    impl HostRuntime for NullHost {
        type Error = NullHostError;

        fn find_group_by_name(&self, _: &str) -> Result<Option<GroupHandle>, NullHostError> {
            Ok(None)
        }

        fn current_group(&self) -> Result<Option<String>, NullHostError> {
            Ok(None)
        }

        fn current_screen(&self) -> Result<Option<usize>, NullHostError> {
            Ok(None)
        }

        fn layout_call(&self, _: &GroupHandle, _: LayoutOp) -> Result<(), NullHostError> {
            Ok(())
        }

        fn group_to_screen(&self, _: &str, _: Option<usize>) -> Result<(), NullHostError> {
            Ok(())
        }
    }

    struct Noop;

    impl Command<NullHost> for Noop {
        fn invoke(&self, _: &[&str], _: &mut CommandContext<'_, NullHost>) -> Result<(), CommandError> {
            Ok(())
        }

        fn help_text(&self) -> &str {
            "does nothing"
        }
    }

    fn noop() -> Box<dyn Command<NullHost>> {
        Box::new(Noop)
    }

    #[test]
    fn split_line_separates_name_and_args() {
        assert_eq!(split_line("add a b"), Some(("add", vec!["a", "b"])));
        assert_eq!(split_line("  help\t add  "), Some(("help", vec!["add"])));
        assert_eq!(split_line("col"), Some(("col", vec![])));
    }

    #[test]
    fn split_line_empty_is_none() {
        assert_eq!(split_line(""), None);
        assert_eq!(split_line("   \t"), None);
    }

    #[test]
    fn register_and_lookup() {
        let mut reg = Registry::<NullHost>::new();
        assert!(reg.is_empty());
        assert!(reg.register("add", noop()).is_none());
        assert!(reg.contains("add"));
        assert_eq!(reg.help_text("add"), Some("does nothing"));
        assert!(reg.get("ADD").is_none());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn names_follow_registration_order() {
        let mut reg = Registry::<NullHost>::new();
        for name in ["show", "add", "hide"] {
            reg.register(name, noop());
        }
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["show", "add", "hide"]);
    }

    #[test]
    fn reregistration_overwrites() {
        let mut reg = Registry::<NullHost>::new();
        reg.register("x", noop());
        reg.register_fn("x", "second", |_, _| Ok(()));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.help_text("x"), Some("second"));
    }

    #[test]
    fn command_error_messages() {
        assert_eq!(
            CommandError::GroupNotFound("web".into()).to_string(),
            "no group named 'web'"
        );
        assert_eq!(CommandError::host("boom").to_string(), "host error: boom");
    }
}
