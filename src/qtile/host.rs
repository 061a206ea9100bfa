//! [`HostRuntime`] implementation backed by Qtile's command client.
//!
//! Every call runs one short-lived `qtile cmd-obj` process:
//!
//! ```text
//! qtile cmd-obj -o group web layout -f add_section -a news
//! qtile cmd-obj -o screen -f info
//! qtile cmd-obj -f groups
//! ```
//!
//! Queries print a Python `repr` of a dict; only the scalar fields the
//! trait needs are picked out of it.

use crate::traits::{GroupHandle, HostRuntime, LayoutOp};
use log::debug;
use std::process::Command;

/// Qtile-backed host.
pub struct QtileHost {
    program: String,
}

/// Errors that can occur when talking to Qtile.
#[derive(Debug, thiserror::Error)]
#[error("qtile error: {0}")]
pub struct QtileHostError(String);

impl Default for QtileHost {
    fn default() -> Self {
        Self::new()
    }
}

impl QtileHost {
    /// Use the `qtile` executable found on `PATH`.
    pub fn new() -> Self {
        Self::with_program("qtile")
    }

    /// Use a specific `qtile` executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run `qtile cmd-obj` and return `(success, stdout, stderr)`.
    fn cmd_obj(
        &self,
        object: &[&str],
        function: &str,
        args: &[&str],
    ) -> Result<(bool, String, String), QtileHostError> {
        let argv = cmd_obj_args(object, function, args);
        debug!("{} {}", self.program, argv.join(" "));
        let output = Command::new(&self.program)
            .args(&argv)
            .output()
            .map_err(|e| QtileHostError(format!("spawn {}: {}", self.program, e)))?;
        Ok((
            output.status.success(),
            String::from_utf8_lossy(&output.stdout).into_owned(),
            String::from_utf8_lossy(&output.stderr).into_owned(),
        ))
    }

    /// Like [`cmd_obj`](Self::cmd_obj) but a non-zero exit is an error.
    fn call(&self, object: &[&str], function: &str, args: &[&str]) -> Result<String, QtileHostError> {
        let (ok, stdout, stderr) = self.cmd_obj(object, function, args)?;
        if ok {
            Ok(stdout)
        } else {
            let target = object.iter().chain([&function]).copied().collect::<Vec<_>>();
            Err(QtileHostError(format!(
                "{}: {}",
                target.join(" "),
                stderr.trim()
            )))
        }
    }
}

/// Command-line arguments for one `qtile cmd-obj` call.
fn cmd_obj_args(object: &[&str], function: &str, args: &[&str]) -> Vec<String> {
    let mut argv = vec!["cmd-obj".to_string()];
    // No object path means the root object.
    if !object.is_empty() {
        argv.push("-o".into());
        argv.extend(object.iter().map(|s| s.to_string()));
    }
    argv.push("-f".into());
    argv.push(function.into());
    if !args.is_empty() {
        argv.push("-a".into());
        argv.extend(args.iter().map(|s| s.to_string()));
    }
    argv
}

/// Layout command and arguments for a [`LayoutOp`] on Qtile's tree-tab
/// layout.
fn layout_command(op: &LayoutOp) -> (&'static str, Vec<&str>) {
    match op {
        LayoutOp::AddSection(name) => ("add_section", vec![name.as_str()]),
        LayoutOp::DelSection(name) => ("del_section", vec![name.as_str()]),
        LayoutOp::CollapseBranch => ("collapse_branch", vec![]),
        LayoutOp::ExpandBranch => ("expand_branch", vec![]),
        // The tab panel has no command of its own.
        LayoutOp::HideTabs => ("eval", vec!["self.hide()"]),
        LayoutOp::ShowTabs => ("eval", vec!["self._panel.unhide()"]),
    }
}

/// Pick the value of `key` out of a Python dict `repr`.
///
/// Handles quoted strings and bare scalars (`'index': 0`, `'name': 'web'`).
/// Nested values are not supported.
fn repr_field<'a>(repr: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("'{}': ", key);
    let start = repr.find(&needle)? + needle.len();
    let rest = &repr[start..];
    let quote = rest.chars().next()?;
    if quote == '\'' || quote == '"' {
        let body = &rest[1..];
        let end = body.find(quote)?;
        Some(&body[..end])
    } else {
        let end = rest.find([',', '}']).unwrap_or(rest.len());
        Some(rest[..end].trim())
    }
}

/// Keys of the outermost dict in a Python `repr`, in order.
///
/// `{'web': {'name': 'web'}, 'code': {...}}` yields `["web", "code"]`.
fn top_level_keys(repr: &str) -> Vec<&str> {
    let mut keys = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<(char, usize)> = None;
    let mut last_string: Option<&str> = None;
    for (i, c) in repr.char_indices() {
        if let Some((q, start)) = quote {
            if c == q {
                last_string = Some(&repr[start..i]);
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some((c, i + 1)),
            '{' | '[' | '(' => {
                depth += 1;
                last_string = None;
            }
            '}' | ']' | ')' => {
                depth = depth.saturating_sub(1);
                last_string = None;
            }
            ':' if depth == 1 => {
                if let Some(key) = last_string.take() {
                    keys.push(key);
                }
            }
            c if c.is_whitespace() => {}
            _ => last_string = None,
        }
    }
    keys
}

//  HostRuntime implementation

impl HostRuntime for QtileHost {
    type Error = QtileHostError;

    fn find_group_by_name(&self, name: &str) -> Result<Option<GroupHandle>, Self::Error> {
        // An unreachable Qtile fails the call instead of looking like a
        // missing group.
        let groups = self.call(&[], "groups", &[])?;
        Ok(top_level_keys(&groups)
            .contains(&name)
            .then(|| GroupHandle {
                name: name.to_string(),
            }))
    }

    fn current_group(&self) -> Result<Option<String>, Self::Error> {
        let info = self.call(&["group"], "info", &[])?;
        Ok(repr_field(&info, "name").map(str::to_string))
    }

    fn current_screen(&self) -> Result<Option<usize>, Self::Error> {
        let info = self.call(&["screen"], "info", &[])?;
        match repr_field(&info, "index") {
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|e| QtileHostError(format!("screen index {:?}: {}", raw, e))),
            None => Ok(None),
        }
    }

    fn layout_call(&self, group: &GroupHandle, op: LayoutOp) -> Result<(), Self::Error> {
        let (function, args) = layout_command(&op);
        self.call(&["group", &group.name, "layout"], function, &args)?;
        Ok(())
    }

    fn group_to_screen(&self, group: &str, screen: Option<usize>) -> Result<(), Self::Error> {
        let index = screen.map(|s| s.to_string());
        let args: Vec<&str> = index.iter().map(|s| s.as_str()).collect();
        self.call(&["group", group], "toscreen", &args)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_without_function_arguments() {
        assert_eq!(
            cmd_obj_args(&["screen"], "info", &[]),
            vec!["cmd-obj", "-o", "screen", "-f", "info"]
        );
    }

    #[test]
    fn args_for_root_object() {
        assert_eq!(
            cmd_obj_args(&[], "groups", &[]),
            vec!["cmd-obj", "-f", "groups"]
        );
    }

    #[test]
    fn args_with_function_arguments() {
        assert_eq!(
            cmd_obj_args(&["group", "web", "layout"], "add_section", &["news"]),
            vec!["cmd-obj", "-o", "group", "web", "layout", "-f", "add_section", "-a", "news"]
        );
    }

    #[test]
    fn layout_ops_map_to_tree_tab_commands() {
        assert_eq!(
            layout_command(&LayoutOp::AddSection("a".into())),
            ("add_section", vec!["a"])
        );
        assert_eq!(
            layout_command(&LayoutOp::DelSection("a".into())),
            ("del_section", vec!["a"])
        );
        assert_eq!(layout_command(&LayoutOp::CollapseBranch), ("collapse_branch", vec![]));
        assert_eq!(layout_command(&LayoutOp::ExpandBranch), ("expand_branch", vec![]));
        assert_eq!(layout_command(&LayoutOp::HideTabs).0, "eval");
        assert_eq!(layout_command(&LayoutOp::ShowTabs).0, "eval");
    }

    #[test]
    fn repr_field_reads_strings_and_numbers() {
        let screen = "{'height': 1080, 'index': 1, 'width': 1920, 'x': 1920, 'y': 0}";
        assert_eq!(repr_field(screen, "index"), Some("1"));
        assert_eq!(repr_field(screen, "y"), Some("0"));

        let group = "{'focus': 'kitty', 'layout': 'treetab', 'name': 'web', 'screen': 0}";
        assert_eq!(repr_field(group, "name"), Some("web"));
        assert_eq!(repr_field(group, "screen"), Some("0"));
        assert_eq!(repr_field(group, "missing"), None);
    }

    #[test]
    fn repr_field_double_quoted_and_none() {
        let repr = r#"{'name': "it's", 'screen': None}"#;
        assert_eq!(repr_field(repr, "name"), Some("it's"));
        assert_eq!(repr_field(repr, "screen"), Some("None"));
    }

    #[test]
    fn top_level_keys_skip_nested_dicts() {
        let groups = "{'code': {'name': 'code', 'screen': 0, 'windows': ['a: b']}, \
                      'web': {'name': 'web', 'layouts': ['treetab'], 'screen': None}}";
        assert_eq!(top_level_keys(groups), vec!["code", "web"]);
        assert!(!top_level_keys(groups).contains(&"name"));
        assert!(top_level_keys("{}").is_empty());
    }

    #[test]
    fn unreachable_host_is_not_a_missing_group() {
        let host = QtileHost::with_program("/nonexistent/qtile-for-tests");
        assert!(host.find_group_by_name("web").is_err());
    }

    #[test]
    fn missing_program_is_an_error() {
        let host = QtileHost::with_program("/nonexistent/qtile-for-tests");
        let err = host.current_screen().unwrap_err();
        assert!(err.to_string().starts_with("qtile error: spawn"));
        assert!(host.find_group_by_name("web").is_err());
    }
}
