//! Single-threaded event loop for builds without the GTK overlay.
//!
//! Requests arrive over an [`mpsc`] channel from the listener thread(s);
//! notification drain steps are fired from the same thread when the
//! [`DeadlineTimer`] expires.  The loop never blocks past a pending
//! deadline.

use crate::event::PromptRequest;
use crate::session::Session;
use crate::traits::{HostRuntime, Timer};
use log::{debug, info};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

/// [`Timer`] that stores a single pending deadline for the event loop to
/// poll.
///
/// Clones share the deadline: hand one clone to the
/// [`NotificationQueue`](crate::notification::NotificationQueue) and keep
/// another in the loop.
#[derive(Debug, Clone, Default)]
pub struct DeadlineTimer {
    deadline: Rc<Cell<Option<Instant>>>,
}

impl DeadlineTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pending deadline, if a drain step is scheduled.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline.get()
    }

    /// Clear the deadline and return `true` if it is due at `now`.
    pub fn take_due(&self, now: Instant) -> bool {
        match self.deadline.get() {
            Some(d) if d <= now => {
                self.deadline.set(None);
                true
            }
            _ => false,
        }
    }
}

impl Timer for DeadlineTimer {
    fn schedule(&mut self, after: Duration) {
        self.deadline.set(Some(Instant::now() + after));
    }
}

/// Process one request and send its reply.
pub fn handle_request<H: HostRuntime>(session: &mut Session<H>, request: PromptRequest) {
    debug!("request: {:?}", request.event);
    let reply = session.handle(request.event.clone());
    request.respond(reply);
}

/// Run until every request source has hung up and the notification queue
/// is idle.
pub fn run<H: HostRuntime>(
    session: &mut Session<H>,
    timer: &DeadlineTimer,
    requests: mpsc::Receiver<PromptRequest>,
) {
    info!("wmprompt running");
    let mut connected = true;
    loop {
        if timer.take_due(Instant::now()) {
            session.fire_timer();
            continue;
        }

        match (connected, timer.deadline()) {
            (true, Some(deadline)) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match requests.recv_timeout(wait) {
                    Ok(request) => handle_request(session, request),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => connected = false,
                }
            }
            (true, None) => match requests.recv() {
                Ok(request) => handle_request(session, request),
                Err(_) => connected = false,
            },
            (false, Some(deadline)) => {
                std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
            }
            (false, None) => break,
        }
    }
    info!("all request sources closed, exiting");
}
