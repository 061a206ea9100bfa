//! Group → screen pinning.
//!
//! A group that is bound to a screen is always shown on that screen when
//! switched to.  Unbound groups follow the focused screen.

use indexmap::IndexMap;

/// Pinned screen index per group name, in the order the pins were made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenBindings {
    inner: IndexMap<String, usize>,
}

impl ScreenBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `group` to `screen`, replacing any earlier pin.
    pub fn bind(&mut self, group: impl Into<String>, screen: usize) {
        self.inner.insert(group.into(), screen);
    }

    /// Remove the pin of `group`.  Returns the screen it was pinned to.
    pub fn unbind(&mut self, group: &str) -> Option<usize> {
        self.inner.shift_remove(group)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Screen `group` is pinned to, if any.
    pub fn screen_for(&self, group: &str) -> Option<usize> {
        self.inner.get(group).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// One-line summary, e.g. `"web: 1, code: 0"`.
    pub fn summary(&self) -> String {
        self.iter()
            .map(|(group, screen)| format!("{}: {}", group, screen))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_and_lookup() {
        let mut b = ScreenBindings::new();
        b.bind("web", 1);
        assert_eq!(b.screen_for("web"), Some(1));
        assert_eq!(b.screen_for("code"), None);
    }

    #[test]
    fn rebinding_replaces_screen_and_keeps_position() {
        let mut b = ScreenBindings::new();
        b.bind("web", 1);
        b.bind("code", 0);
        b.bind("web", 2);
        assert_eq!(b.summary(), "web: 2, code: 0");
    }

    #[test]
    fn unbind_and_clear() {
        let mut b = ScreenBindings::new();
        b.bind("web", 1);
        b.bind("chat", 0);
        assert_eq!(b.unbind("web"), Some(1));
        assert_eq!(b.unbind("web"), None);
        assert_eq!(b.len(), 1);
        b.clear();
        assert!(b.is_empty());
        assert_eq!(b.summary(), "");
    }
}
