//! Commands that drive the tree layout of the web group.
//!
//! The group is looked up on the host once per invocation; a missing group
//! aborts the command with [`CommandError::GroupNotFound`].

use crate::command::{Command, CommandContext, CommandError};
use crate::traits::{GroupHandle, HostRuntime, LayoutOp};
use log::debug;

fn find_group<H: HostRuntime>(host: &H, name: &str) -> Result<GroupHandle, CommandError> {
    host.find_group_by_name(name)
        .map_err(CommandError::host)?
        .ok_or_else(|| CommandError::GroupNotFound(name.to_string()))
}

/// Runs one argument-less layout operation (`col`, `exp`, `hide`, `show`).
pub struct WebLayout {
    group: String,
    op: LayoutOp,
    help: &'static str,
}

impl WebLayout {
    pub fn new(group: &str, op: LayoutOp, help: &'static str) -> Self {
        Self {
            group: group.to_string(),
            op,
            help,
        }
    }
}

impl<H: HostRuntime> Command<H> for WebLayout {
    fn invoke(&self, _args: &[&str], ctx: &mut CommandContext<'_, H>) -> Result<(), CommandError> {
        let group = find_group(ctx.host, &self.group)?;
        debug!("{:?} on {}", self.op, group.name);
        ctx.host
            .layout_call(&group, self.op.clone())
            .map_err(CommandError::host)
    }

    fn help_text(&self) -> &str {
        self.help
    }
}

/// Runs a layout operation once per argument (`add`, `del`).
///
/// Stops at the first host failure; earlier arguments stay applied.
pub struct EachArg {
    group: String,
    op: fn(String) -> LayoutOp,
    help: &'static str,
}

impl EachArg {
    pub fn new(group: &str, op: fn(String) -> LayoutOp, help: &'static str) -> Self {
        Self {
            group: group.to_string(),
            op,
            help,
        }
    }
}

impl<H: HostRuntime> Command<H> for EachArg {
    fn invoke(&self, args: &[&str], ctx: &mut CommandContext<'_, H>) -> Result<(), CommandError> {
        let group = find_group(ctx.host, &self.group)?;
        for arg in args {
            let op = (self.op)(arg.to_string());
            debug!("{:?} on {}", op, group.name);
            ctx.host.layout_call(&group, op).map_err(CommandError::host)?;
        }
        Ok(())
    }

    fn help_text(&self) -> &str {
        self.help
    }
}
