//! GTK4 + layer-shell notification banner that runs on the **main thread**.
//!
//! # Widget tree
//!
//! ```text
//! window                         (layer-shell, transparent, top edge)
//! └ .wmprompt-banner             (rounded box)
//!     └ .wmprompt-text           (GtkLabel, Pango markup carries colours)
//! ```
//!
//! # CSS selectors
//!
//! | Selector            | Targets                                  |
//! |---------------------|------------------------------------------|
//! | `window`            | The banner window (keep transparent)     |
//! | `.wmprompt-banner`  | Container around the text                |
//! | `.wmprompt-text`    | The message label                        |
//!
//! Foreground and background colours come from the notification severity
//! and are applied through markup, so CSS only controls shape and font.

use crate::event::PromptRequest;
use crate::notification::ColorPair;
use crate::runtime::{self, DeadlineTimer};
use crate::session::Session;
use crate::traits::{DisplaySink, HostRuntime, SinkError};
use gtk4::prelude::*;
use gtk4::{gdk, glib};
use gtk4_layer_shell::{Edge, LayerShell};
use log::{debug, info, warn};
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

//  Default CSS

const DEFAULT_CSS: &str = r#"
window,
window.background {
    background-color: transparent;
    background: none;
}

.wmprompt-banner {
    border-radius: 6px;
    margin-top: 8px;
}

.wmprompt-text {
    font-weight: bold;
    padding: 2px 4px;
}
"#;

/// Initialise GTK on the current thread and register the stylesheet.
///
/// `css_path` is used when it exists and is readable; otherwise the
/// built-in stylesheet is loaded.
pub fn init(css_path: Option<&Path>) -> Result<(), glib::BoolError> {
    gtk4::init()?;
    info!("GTK4 initialised on main thread");
    load_css(css_path);
    Ok(())
}

/// Pango markup for `text` drawn in `colors`.
fn markup(text: &str, colors: &ColorPair) -> String {
    format!(
        "<span foreground=\"{}\" background=\"{}\"> {} </span>",
        glib::markup_escape_text(&colors.fg),
        glib::markup_escape_text(&colors.bg),
        glib::markup_escape_text(text)
    )
}

//  Banner sink

/// [`DisplaySink`] backed by a layer-shell window on one monitor.
///
/// The window stays mapped-but-hidden while no notification is showing.
pub struct GtkBannerSink {
    window: gtk4::Window,
    label: gtk4::Label,
}

impl GtkBannerSink {
    /// Create a banner on `monitor`, or on the compositor's choice of
    /// output when `None`.
    pub fn new(monitor: Option<&gdk::Monitor>) -> Self {
        let window = gtk4::Window::new();
        window.init_layer_shell();
        window.set_layer(gtk4_layer_shell::Layer::Overlay);
        window.set_namespace("wmprompt");
        window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::None);
        window.set_anchor(Edge::Top, true);
        window.set_monitor(monitor);
        window.set_decorated(false);
        window.remove_css_class("background");

        let container = gtk4::Box::new(gtk4::Orientation::Horizontal, 0);
        container.add_css_class("wmprompt-banner");
        container.set_halign(gtk4::Align::Center);
        window.set_child(Some(&container));

        let label = gtk4::Label::new(None);
        label.add_css_class("wmprompt-text");
        label.set_use_markup(true);
        container.append(&label);

        // Map the surface once so later shows do not re-negotiate it.
        window.present();
        window.set_visible(false);

        Self { window, label }
    }

    /// One banner per monitor, up to `count`.
    ///
    /// Falls back to a single unpinned banner when no display or monitor
    /// list is available.
    pub fn for_monitors(count: usize) -> Vec<Self> {
        let monitors: Vec<gdk::Monitor> = match gdk::Display::default() {
            Some(display) => {
                let list = display.monitors();
                (0..list.n_items())
                    .filter_map(|i| list.item(i).and_downcast::<gdk::Monitor>())
                    .take(count)
                    .collect()
            }
            None => Vec::new(),
        };
        if monitors.is_empty() {
            warn!("no monitors reported, using a single banner");
            return vec![Self::new(None)];
        }
        info!("creating {} banner(s)", monitors.len());
        monitors.iter().map(|m| Self::new(Some(m))).collect()
    }
}

impl DisplaySink for GtkBannerSink {
    fn show(&mut self, text: &str, colors: &ColorPair) -> Result<(), SinkError> {
        self.label.set_markup(&markup(text, colors));
        self.window.set_visible(true);
        self.window.present();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SinkError> {
        self.label.set_markup("");
        self.window.set_visible(false);
        Ok(())
    }
}

//  Main loop

/// Run the GLib main loop on the **current** (main) thread.
///
/// Requests are polled every 16 ms; a due notification deadline fires the
/// next drain step.  The loop exits once every request source has hung up
/// and no notification is pending.
pub fn run_main_loop<H: HostRuntime + 'static>(
    mut session: Session<H>,
    timer: DeadlineTimer,
    requests: mpsc::Receiver<PromptRequest>,
) {
    let main_loop = glib::MainLoop::new(None, false);
    let quit = main_loop.clone();
    let mut disconnected = false;

    glib::timeout_add_local(Duration::from_millis(16), move || {
        // 1. Drain requests.
        while !disconnected {
            match requests.try_recv() {
                Ok(request) => runtime::handle_request(&mut session, request),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    debug!("request channel closed");
                    disconnected = true;
                }
            }
        }

        // 2. Fire a due drain step.
        if timer.take_due(Instant::now()) {
            session.fire_timer();
        }

        if disconnected && timer.deadline().is_none() {
            info!("all request sources closed, exiting");
            quit.quit();
            return glib::ControlFlow::Break;
        }
        glib::ControlFlow::Continue
    });

    info!("entering GLib main loop");
    main_loop.run();
    info!("GLib main loop exited");
}

//  CSS loading

fn load_css(css_path: Option<&Path>) {
    let provider = gtk4::CssProvider::new();

    let css_content = match css_path.filter(|p| p.exists()) {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(content) => {
                info!("user CSS: {} ({} bytes)", p.display(), content.len());
                content
            }
            Err(e) => {
                warn!("CSS read failed ({}): {}, using built-in", p.display(), e);
                DEFAULT_CSS.to_string()
            }
        },
        None => {
            info!("no user CSS, using built-in default");
            DEFAULT_CSS.to_string()
        }
    };

    #[allow(deprecated)]
    provider.load_from_data(&css_content);

    if let Some(display) = gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
        info!("CSS registered on display");
    } else {
        warn!("no GDK display, CSS will not be applied");
    }
}
