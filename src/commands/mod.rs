//! Commands available at the prompt.
//!
//! [`builtin_registry`] builds the default table:
//!
//! | Name        | Module         |
//! |-------------|----------------|
//! | `add`, `del`, `col`, `exp`, `hide`, `show` | [`web`] |
//! | `bind`, `unbind`, `unbindall`, `bindlist`  | [`screens`] |
//! | `help`      | [`dispatcher`](crate::dispatcher) |

pub mod screens;
pub mod web;

use crate::command::Registry;
use crate::dispatcher::Help;
use crate::traits::{HostRuntime, LayoutOp};
use screens::{Bind, BindList, Unbind, UnbindAll};
use web::{EachArg, WebLayout};

/// Registry with every built-in command.  `web_group` names the group whose
/// tree layout the web-section commands drive.
pub fn builtin_registry<H: HostRuntime>(web_group: &str) -> Registry<H> {
    let mut reg = Registry::new();
    reg.register(
        "add",
        Box::new(EachArg::new(web_group, LayoutOp::AddSection, "add sections to web layout")),
    );
    reg.register(
        "del",
        Box::new(EachArg::new(web_group, LayoutOp::DelSection, "remove sections from web layout")),
    );
    reg.register(
        "col",
        Box::new(WebLayout::new(web_group, LayoutOp::CollapseBranch, "collapse section")),
    );
    reg.register(
        "exp",
        Box::new(WebLayout::new(web_group, LayoutOp::ExpandBranch, "expand section")),
    );
    reg.register(
        "hide",
        Box::new(WebLayout::new(web_group, LayoutOp::HideTabs, "hides web tabs")),
    );
    reg.register(
        "show",
        Box::new(WebLayout::new(web_group, LayoutOp::ShowTabs, "shows web tabs")),
    );
    reg.register("bind", Box::new(Bind));
    reg.register("unbind", Box::new(Unbind));
    reg.register("unbindall", Box::new(UnbindAll));
    reg.register("bindlist", Box::new(BindList));
    reg.register("help", Box::new(Help));
    reg
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::traits::GroupHandle;
    use std::cell::RefCell;

    /// Host with a fixed set of groups that records every mutating call.
    #[derive(Debug)]
    pub(crate) struct RecordingHost {
        pub groups: Vec<String>,
        pub current_group: Option<String>,
        pub current_screen: Option<usize>,
        pub layout_calls: RefCell<Vec<(String, LayoutOp)>>,
        pub screen_moves: RefCell<Vec<(String, Option<usize>)>>,
        pub fail_layout: bool,
    }

    impl Default for RecordingHost {
        fn default() -> Self {
            Self {
                groups: vec!["code".into(), "web".into(), "chat".into()],
                current_group: Some("code".into()),
                current_screen: Some(1),
                layout_calls: RefCell::default(),
                screen_moves: RefCell::default(),
                fail_layout: false,
            }
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("recording host refused")]
    pub(crate) struct RecordingHostError;

    impl HostRuntime for RecordingHost {
        type Error = RecordingHostError;

        fn find_group_by_name(&self, name: &str) -> Result<Option<GroupHandle>, RecordingHostError> {
            Ok(self
                .groups
                .iter()
                .find(|g| g.as_str() == name)
                .map(|g| GroupHandle { name: g.clone() }))
        }

        fn current_group(&self) -> Result<Option<String>, RecordingHostError> {
            Ok(self.current_group.clone())
        }

        fn current_screen(&self) -> Result<Option<usize>, RecordingHostError> {
            Ok(self.current_screen)
        }

        fn layout_call(&self, group: &GroupHandle, op: LayoutOp) -> Result<(), RecordingHostError> {
            if self.fail_layout {
                return Err(RecordingHostError);
            }
            self.layout_calls.borrow_mut().push((group.name.clone(), op));
            Ok(())
        }

        fn group_to_screen(&self, group: &str, screen: Option<usize>) -> Result<(), RecordingHostError> {
            self.screen_moves.borrow_mut().push((group.into(), screen));
            Ok(())
        }
    }

    #[test]
    fn builtin_names_in_order() {
        let reg = builtin_registry::<RecordingHost>("web");
        assert_eq!(
            reg.names().collect::<Vec<_>>(),
            vec![
                "add", "del", "col", "exp", "hide", "show", "bind", "unbind", "unbindall",
                "bindlist", "help"
            ]
        );
    }

    #[test]
    fn builtin_help_texts() {
        let reg = builtin_registry::<RecordingHost>("web");
        assert_eq!(reg.help_text("add"), Some("add sections to web layout"));
        assert_eq!(reg.help_text("unbindall"), Some("removes bindings on all workspaces"));
        assert_eq!(reg.help_text("help"), Some("prints documentation of a command"));
    }
}
