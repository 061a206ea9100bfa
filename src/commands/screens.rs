//! Commands that pin groups to screens.
//!
//! The pins live in [`ScreenBindings`](crate::bindings::ScreenBindings) and
//! are honoured when a group is switched to through
//! [`Session::show_group`](crate::session::Session::show_group).

use crate::command::{Command, CommandContext, CommandError};
use crate::notification::Severity;
use crate::traits::HostRuntime;
use log::info;

fn current_group<H: HostRuntime>(host: &H) -> Result<String, CommandError> {
    host.current_group()
        .map_err(CommandError::host)?
        .ok_or(CommandError::NoCurrentGroup)
}

/// `bind`: pin the focused group to the focused screen.
pub struct Bind;

impl<H: HostRuntime> Command<H> for Bind {
    fn invoke(&self, _args: &[&str], ctx: &mut CommandContext<'_, H>) -> Result<(), CommandError> {
        let screen = ctx
            .host
            .current_screen()
            .map_err(CommandError::host)?
            .ok_or(CommandError::NoCurrentScreen)?;
        let group = current_group(ctx.host)?;
        info!("bind {} to screen {}", group, screen);
        ctx.bindings.bind(group, screen);
        Ok(())
    }

    fn help_text(&self) -> &str {
        "binds current layout to current screen"
    }
}

/// `unbind`: drop the pin of the focused group.
pub struct Unbind;

impl<H: HostRuntime> Command<H> for Unbind {
    fn invoke(&self, _args: &[&str], ctx: &mut CommandContext<'_, H>) -> Result<(), CommandError> {
        let group = current_group(ctx.host)?;
        if ctx.bindings.unbind(&group).is_some() {
            info!("unbind {}", group);
        }
        Ok(())
    }

    fn help_text(&self) -> &str {
        "removes bindings on workspace"
    }
}

/// `unbindall`: drop every pin.
pub struct UnbindAll;

impl<H: HostRuntime> Command<H> for UnbindAll {
    fn invoke(&self, _args: &[&str], ctx: &mut CommandContext<'_, H>) -> Result<(), CommandError> {
        info!("unbind all ({} binding(s))", ctx.bindings.len());
        ctx.bindings.clear();
        Ok(())
    }

    fn help_text(&self) -> &str {
        "removes bindings on all workspaces"
    }
}

/// `bindlist`: show every pin in one notification.  Silent when there are
/// none.
pub struct BindList;

impl<H: HostRuntime> Command<H> for BindList {
    fn invoke(&self, _args: &[&str], ctx: &mut CommandContext<'_, H>) -> Result<(), CommandError> {
        if !ctx.bindings.is_empty() {
            let message = format!("Screen bindings: {}", ctx.bindings.summary());
            ctx.notify(message, Severity::Info);
        }
        Ok(())
    }

    fn help_text(&self) -> &str {
        "list all screen bindings in a notification"
    }
}
