//! Routing of a typed line to its command.
//!
//! [`dispatch`] splits the line, looks the first token up in the
//! [`Registry`](crate::command::Registry) and runs the command with the
//! remaining tokens.  Every user-facing outcome is a notification:
//!
//! | Input                        | Notification                          |
//! |------------------------------|---------------------------------------|
//! | empty / whitespace           | none                                  |
//! | unknown name                 | error `Unknown command '<name>'`      |
//! | command returns `Err(e)`     | error `<name>: <e>`                   |
//! | command panics               | error `<name>: command panicked`      |

use crate::command::{split_line, Command, CommandContext, CommandError};
use crate::notification::Severity;
use crate::traits::HostRuntime;
use log::{debug, error, info};
use std::panic::{self, AssertUnwindSafe};

/// Message used for names missing from the registry.
pub fn unknown_command(name: &str) -> String {
    format!("Unknown command '{}'", name)
}

/// Parse `line` and run the matching command.
pub fn dispatch<H: HostRuntime>(line: &str, ctx: &mut CommandContext<'_, H>) {
    let Some((name, args)) = split_line(line) else {
        debug!("empty command line, ignoring");
        return;
    };

    let registry = ctx.registry;
    let Some(command) = registry.get(name) else {
        info!("unknown command {:?}", name);
        ctx.notify(unknown_command(name), Severity::Error);
        return;
    };

    info!("run {} {:?}", name, args);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| command.invoke(&args, ctx)));
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!("command {} failed: {}", name, e);
            ctx.notify(format!("{}: {}", name, e), Severity::Error);
        }
        Err(_) => {
            error!("command {} panicked", name);
            ctx.notify(format!("{}: command panicked", name), Severity::Error);
        }
    }
}

/// The built-in `help` command.
///
/// With no arguments it reports `Expected command name`.  Otherwise it
/// queues one notification per argument: the command's help text, or an
/// unknown-command error.
#[derive(Debug, Default)]
pub struct Help;

impl<H: HostRuntime> Command<H> for Help {
    fn invoke(&self, args: &[&str], ctx: &mut CommandContext<'_, H>) -> Result<(), CommandError> {
        if args.is_empty() {
            ctx.notify("Expected command name", Severity::Error);
        }
        let registry = ctx.registry;
        for arg in args {
            match registry.help_text(arg) {
                Some(text) => ctx.notify(text, Severity::Info),
                None => ctx.notify(unknown_command(arg), Severity::Error),
            }
        }
        Ok(())
    }

    fn help_text(&self) -> &str {
        "prints documentation of a command"
    }
}
