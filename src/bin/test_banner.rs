//! Banner demo: queues one notification of each severity every few
//! seconds and lets the real [`NotificationQueue`] drain them onto a
//! layer-shell banner.
//!
//! Run with:
//!     cargo run --bin wmprompt-test-banner
//!
//! Press Ctrl-C to quit.

use gtk4::glib;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use wmprompt::notification::{Notification, NotificationQueue, Severity, SeverityStyles};
use wmprompt::overlay::gtk::{self as banner, GtkBannerSink};
use wmprompt::runtime::DeadlineTimer;
use wmprompt::traits::DisplaySink;

/// Milliseconds between bursts.
const BURST_MS: u64 = 4000;
/// How long each notification stays up.
const SHOW_MS: u64 = 900;

fn main() {
    env_logger::init();
    if let Err(e) = banner::init(None) {
        eprintln!("failed to initialise GTK4: {}", e);
        std::process::exit(1);
    }

    let timer = DeadlineTimer::new();
    let sinks: Vec<Box<dyn DisplaySink>> = GtkBannerSink::for_monitors(1)
        .into_iter()
        .map(|s| Box::new(s) as Box<dyn DisplaySink>)
        .collect();
    let queue = Rc::new(RefCell::new(NotificationQueue::new(
        sinks,
        Box::new(timer.clone()),
        SeverityStyles::default(),
        Duration::from_millis(SHOW_MS),
    )));

    //  Burst timer: three notifications at once
    {
        let queue = queue.clone();
        let mut round = 0u32;
        let mut burst = move || {
            round += 1;
            let mut q = queue.borrow_mut();
            for (severity, text) in [
                (Severity::Info, "info: layout updated"),
                (Severity::Warn, "warn: group not on screen"),
                (Severity::Error, "error: Unknown command 'bogus'"),
            ] {
                q.enqueue(Notification::new(
                    format!("{} (round {})", text, round),
                    severity,
                    Duration::from_millis(SHOW_MS),
                ));
            }
        };
        burst();
        glib::timeout_add_local(Duration::from_millis(BURST_MS), move || {
            burst();
            glib::ControlFlow::Continue
        });
    }

    //  Drain tick
    glib::timeout_add_local(Duration::from_millis(16), move || {
        if timer.take_due(Instant::now()) {
            let mut q = queue.borrow_mut();
            if q.is_draining() {
                q.drain_step();
            }
        }
        glib::ControlFlow::Continue
    });

    eprintln!("Banner demo running, a burst every {}ms.", BURST_MS);
    eprintln!("Press Ctrl-C to quit.");

    let main_loop = glib::MainLoop::new(None, false);
    main_loop.run();
}
