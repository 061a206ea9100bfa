//! The object that ties registry, completion, notifications and the host
//! together.
//!
//! [`Session`] is built once at startup and lives until the daemon exits.
//! It owns every piece of mutable state; nothing is kept in globals.  The
//! event loop feeds it [`PromptEvent`]s and timer expiries.

use crate::bindings::ScreenBindings;
use crate::command::{CommandContext, Registry};
use crate::completion::Completer;
use crate::dispatcher;
use crate::event::{PromptEvent, PromptReply};
use crate::notification::{Notification, NotificationQueue, Severity};
use crate::traits::HostRuntime;
use log::{debug, error, info};
use std::time::Duration;

/// Orchestrates prompt sessions, command dispatch and notifications.
///
/// The session is generic over any [`HostRuntime`], so the same logic runs
/// against Qtile or a test double.
pub struct Session<H: HostRuntime> {
    host: H,
    registry: Registry<H>,
    notifications: NotificationQueue,
    bindings: ScreenBindings,
    /// Completion state of the open prompt, if one is open.
    completer: Option<Completer>,
    marker: String,
}

impl<H: HostRuntime> Session<H> {
    pub fn new(
        host: H,
        registry: Registry<H>,
        notifications: NotificationQueue,
        marker: impl Into<String>,
    ) -> Self {
        Self {
            host,
            registry,
            notifications,
            bindings: ScreenBindings::new(),
            completer: None,
            marker: marker.into(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn registry(&self) -> &Registry<H> {
        &self.registry
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn bindings(&self) -> &ScreenBindings {
        &self.bindings
    }

    /// Whether a prompt is open.
    pub fn prompt_open(&self) -> bool {
        self.completer.is_some()
    }

    //  Prompt lifecycle

    /// Open a prompt, discarding any completion state of a previous one.
    /// Returns the marker to display.
    pub fn start_prompt(&mut self) -> &str {
        debug!("prompt opened");
        self.completer = Some(Completer::new());
        &self.marker
    }

    /// Next completion candidate for `prefix`.  Opens a prompt implicitly
    /// if none is open.
    pub fn complete(&mut self, prefix: &str) -> String {
        let completer = self.completer.get_or_insert_with(Completer::new);
        completer.complete(prefix, self.registry.names()).to_string()
    }

    /// The input text changed; the next completion starts over.
    pub fn reset_completion(&mut self) {
        if let Some(c) = &mut self.completer {
            c.reset();
        }
    }

    /// Value behind the last completion shown in the open prompt.
    pub fn last_completion(&self) -> Option<&str> {
        self.completer.as_ref().and_then(|c| c.last_completion())
    }

    /// Close the prompt and run `line`.
    pub fn submit(&mut self, line: &str) {
        self.completer = None;
        self.dispatch(line);
    }

    /// Close the prompt without running anything.
    pub fn cancel(&mut self) {
        debug!("prompt cancelled");
        self.completer = None;
    }

    //  Commands

    /// Run a command line.  See [`dispatcher::dispatch`].
    pub fn dispatch(&mut self, line: &str) {
        let mut ctx = CommandContext {
            host: &self.host,
            registry: &self.registry,
            notifications: &mut self.notifications,
            bindings: &mut self.bindings,
        };
        dispatcher::dispatch(line, &mut ctx);
    }

    /// Show `group` on the screen it is pinned to, or on the focused screen.
    pub fn show_group(&mut self, group: &str) {
        let screen = self.bindings.screen_for(group);
        info!("show group {} on {:?}", group, screen);
        if let Err(e) = self.host.group_to_screen(group, screen) {
            error!("show group {} failed: {}", group, e);
            self.notifications
                .notify(format!("{}: {}", group, e), Severity::Error);
        }
    }

    //  Notifications

    /// Queue a notification.  `duration` falls back to the configured
    /// default.
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity, duration: Option<Duration>) {
        let duration = duration.unwrap_or_else(|| self.notifications.default_duration());
        self.notifications
            .enqueue(Notification::new(message, severity, duration));
    }

    /// The scheduled drain deadline passed.
    pub fn fire_timer(&mut self) {
        if self.notifications.is_draining() {
            self.notifications.drain_step();
        }
    }

    //  Events

    /// Process one prompt event and produce its reply.
    pub fn handle(&mut self, event: PromptEvent) -> PromptReply {
        match event {
            PromptEvent::Start => PromptReply::Prompt(self.start_prompt().to_string()),
            PromptEvent::Complete(prefix) => PromptReply::Completion(self.complete(&prefix)),
            PromptEvent::Reset => {
                self.reset_completion();
                PromptReply::Ok
            }
            PromptEvent::Accept => {
                PromptReply::LastCompletion(self.last_completion().map(str::to_string))
            }
            PromptEvent::Submit(line) => {
                self.submit(&line);
                PromptReply::Ok
            }
            PromptEvent::Cancel => {
                self.cancel();
                PromptReply::Ok
            }
            PromptEvent::ShowGroup(group) => {
                self.show_group(&group);
                PromptReply::Ok
            }
            PromptEvent::Notify {
                message,
                severity,
                duration_ms,
            } => {
                self.notify(
                    message,
                    severity.unwrap_or(Severity::Info),
                    duration_ms.map(Duration::from_millis),
                );
                PromptReply::Ok
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::commands::builtin_registry;
    use crate::commands::tests::RecordingHost;
    use crate::notification::tests::{RecordingSink, RecordingTimer, SinkOp};
    use crate::notification::SeverityStyles;
    use std::cell::RefCell;
    use std::rc::Rc;

    pub(crate) struct Fixture {
        pub session: Session<RecordingHost>,
        pub log: Rc<RefCell<Vec<SinkOp>>>,
        pub delays: Rc<RefCell<Vec<Duration>>>,
    }

    pub(crate) fn fixture() -> Fixture {
        let log: Rc<RefCell<Vec<SinkOp>>> = Rc::default();
        let delays: Rc<RefCell<Vec<Duration>>> = Rc::default();
        let queue = NotificationQueue::new(
            vec![Box::new(RecordingSink(log.clone()))],
            Box::new(RecordingTimer(delays.clone())),
            SeverityStyles::default(),
            Duration::from_millis(2000),
        );
        let session = Session::new(
            RecordingHost::default(),
            builtin_registry("web"),
            queue,
            ">",
        );
        Fixture {
            session,
            log,
            delays,
        }
    }

    impl Fixture {
        fn drain(&mut self) -> Vec<String> {
            while self.session.notifications().is_draining() {
                self.session.fire_timer();
            }
            self.log
                .borrow()
                .iter()
                .filter_map(|op| match op {
                    SinkOp::Show(text, _) => Some(text.clone()),
                    SinkOp::Clear => None,
                })
                .collect()
        }
    }

    fn completion(reply: PromptReply) -> String {
        match reply {
            PromptReply::Completion(s) => s,
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[test]
    fn start_replies_with_marker() {
        let mut f = fixture();
        assert_eq!(f.session.handle(PromptEvent::Start), PromptReply::Prompt(">".into()));
        assert!(f.session.prompt_open());
    }

    #[test]
    fn tab_cycle_through_events() {
        let mut f = fixture();
        f.session.handle(PromptEvent::Start);
        let got: Vec<String> = (0..4)
            .map(|_| completion(f.session.handle(PromptEvent::Complete("b".into()))))
            .collect();
        assert_eq!(got, vec!["bind", "bindlist", "b", "bind"]);
        assert_eq!(
            f.session.handle(PromptEvent::Accept),
            PromptReply::LastCompletion(Some("bind".into()))
        );
    }

    #[test]
    fn reset_event_recomputes_candidates() {
        let mut f = fixture();
        f.session.handle(PromptEvent::Start);
        assert_eq!(completion(f.session.handle(PromptEvent::Complete("h".into()))), "help");
        f.session.handle(PromptEvent::Reset);
        assert_eq!(completion(f.session.handle(PromptEvent::Complete("s".into()))), "show");
    }

    #[test]
    fn new_prompt_forgets_previous_completion() {
        let mut f = fixture();
        f.session.handle(PromptEvent::Start);
        f.session.handle(PromptEvent::Complete("h".into()));
        f.session.handle(PromptEvent::Start);
        assert_eq!(
            f.session.handle(PromptEvent::Accept),
            PromptReply::LastCompletion(None)
        );
        assert_eq!(completion(f.session.handle(PromptEvent::Complete("h".into()))), "help");
    }

    #[test]
    fn complete_without_start_opens_prompt() {
        let mut f = fixture();
        assert!(!f.session.prompt_open());
        assert_eq!(f.session.complete("ex"), "exp");
        assert!(f.session.prompt_open());
    }

    #[test]
    fn submit_dispatches_and_closes_prompt() {
        let mut f = fixture();
        f.session.handle(PromptEvent::Start);
        assert_eq!(
            f.session.handle(PromptEvent::Submit("help add".into())),
            PromptReply::Ok
        );
        assert!(!f.session.prompt_open());
        assert_eq!(f.drain(), vec!["add sections to web layout"]);
    }

    #[test]
    fn cancel_closes_prompt_without_dispatch() {
        let mut f = fixture();
        f.session.handle(PromptEvent::Start);
        f.session.handle(PromptEvent::Cancel);
        assert!(!f.session.prompt_open());
        assert!(f.drain().is_empty());
    }

    #[test]
    fn show_group_honours_bindings() {
        let mut f = fixture();
        f.session.dispatch("bind");
        f.session.handle(PromptEvent::ShowGroup("code".into()));
        f.session.handle(PromptEvent::ShowGroup("web".into()));
        assert_eq!(
            *f.session.host().screen_moves.borrow(),
            vec![("code".to_string(), Some(1)), ("web".to_string(), None)]
        );
    }

    #[test]
    fn notify_event_uses_given_or_default_duration() {
        let mut f = fixture();
        f.session.handle(PromptEvent::Notify {
            message: "a".into(),
            severity: Some(Severity::Warn),
            duration_ms: Some(50),
        });
        f.session.handle(PromptEvent::Notify {
            message: "b".into(),
            severity: None,
            duration_ms: None,
        });
        assert_eq!(f.drain(), vec!["a", "b"]);
        assert_eq!(
            *f.delays.borrow(),
            vec![Duration::from_millis(50), Duration::from_millis(2000)]
        );
    }

    #[test]
    fn fire_timer_when_idle_is_harmless() {
        let mut f = fixture();
        f.session.fire_timer();
        assert!(f.log.borrow().is_empty());
    }
}
