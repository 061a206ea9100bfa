//! Tab completion for the command prompt.
//!
//! A [`Completer`] lives for one prompt session.  The first
//! [`complete`](Completer::complete) call builds the candidate list from the
//! registered command names; every call (including the first) advances to
//! the next candidate and wraps around at the end.  The typed text,
//! lowercased, is always the last candidate, so cycling past the matches
//! restores the user's input.
//!
//! ```text
//! registry: add, bind, bindlist, help      input: "b"
//!
//! tab → "bind"   tab → "bindlist"   tab → "b"   tab → "bind"   …
//! ```
//!
//! The list is cached until [`reset`](Completer::reset), which the prompt
//! must call whenever the input text changes other than by accepting a
//! completion.

use log::debug;

/// One completion candidate: what to display and what it stands for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    display: String,
    value: String,
}

/// Cycling completion state for one prompt session.
#[derive(Debug, Clone, Default)]
pub struct Completer {
    /// `None` until the first `complete` after construction or `reset`.
    candidates: Option<Vec<Candidate>>,
    /// Position of the candidate last returned; `None` before the first.
    cursor: Option<usize>,
    last_emitted: Option<String>,
}

impl Completer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next candidate for `prefix`.
    ///
    /// Matching is case-insensitive.  `names` is only consulted when the
    /// candidate list has to be (re)built.
    pub fn complete<'a, I>(&mut self, prefix: &str, names: I) -> &str
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.candidates.is_none() {
            let needle = prefix.to_lowercase();
            let mut candidates: Vec<Candidate> = names
                .into_iter()
                .filter(|name| name.to_lowercase().starts_with(&needle))
                .map(|name| Candidate {
                    display: name.to_string(),
                    value: name.to_string(),
                })
                .collect();
            candidates.sort();
            candidates.push(Candidate {
                display: needle.clone(),
                value: needle,
            });
            debug!(
                "{} completion candidate(s) for {:?}",
                candidates.len(),
                prefix
            );
            self.candidates = Some(candidates);
            self.cursor = None;
        }

        let candidates = self.candidates.get_or_insert_with(Vec::new);
        let next = match self.cursor {
            Some(i) if i + 1 < candidates.len() => i + 1,
            _ => 0,
        };
        self.cursor = Some(next);
        let candidate = &candidates[next];
        self.last_emitted = Some(candidate.value.clone());
        &candidate.display
    }

    /// Value behind the candidate most recently returned by
    /// [`complete`](Self::complete), if any.
    pub fn last_completion(&self) -> Option<&str> {
        self.last_emitted.as_deref()
    }

    /// Forget the candidate list so the next `complete` rebuilds it.
    pub fn reset(&mut self) {
        self.candidates = None;
        self.cursor = None;
    }

    /// Number of cached candidates, including the typed-text fallback.
    pub fn candidate_count(&self) -> Option<usize> {
        self.candidates.as_ref().map(|c| c.len())
    }
}
