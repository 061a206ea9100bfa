//! Entry point for the **wmprompt** daemon.
//!
//! Spawns the Unix-socket [`PromptSource`](wmprompt::traits::PromptSource)
//! on a background thread and processes prompt events on the main thread.
//!
//! When the `overlay-gtk` feature is enabled (and not switched off in the
//! config) the main thread runs the GLib main loop and notifications are
//! also shown as on-screen banners.  Otherwise a plain blocking loop is
//! used.

use log::{error, info};
use std::path::PathBuf;
use std::sync::mpsc;
use wmprompt::commands::builtin_registry;
use wmprompt::config::Config;
use wmprompt::event::PromptRequest;
use wmprompt::ipc::listener::UnixSocketListener;
use wmprompt::notification::NotificationQueue;
use wmprompt::qtile::host::QtileHost;
use wmprompt::runtime::{self, DeadlineTimer};
use wmprompt::session::Session;
use wmprompt::sink::{FileSink, LogSink};
use wmprompt::traits::{DisplaySink, PromptSource};

/// Default socket path for the prompt listener.
fn default_socket_path() -> PathBuf {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(runtime).join("wmprompt.sock")
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/wmprompt`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("wmprompt")
}

/// Try to load the config from `$XDG_CONFIG_HOME/wmprompt/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

/// Sinks that need no GUI toolkit.
fn plain_sinks(config: &Config) -> Vec<Box<dyn DisplaySink>> {
    let mut sinks: Vec<Box<dyn DisplaySink>> = Vec::new();
    if config.sinks.log {
        sinks.push(Box::new(LogSink));
    }
    for path in &config.sinks.files {
        info!("file sink: {}", path.display());
        sinks.push(Box::new(FileSink::new(path)));
    }
    sinks
}

fn build_session(config: &Config, sinks: Vec<Box<dyn DisplaySink>>, timer: &DeadlineTimer) -> Session<QtileHost> {
    let queue = NotificationQueue::new(
        sinks,
        Box::new(timer.clone()),
        config.notifications.styles.clone(),
        config.notifications.default_duration(),
    );
    let registry = builtin_registry(&config.layout.web_group);
    info!("{} command(s) registered", registry.len());
    Session::new(QtileHost::new(), registry, queue, config.prompt.marker.clone())
}

//  Main

fn main() {
    env_logger::init();

    let config = load_config();

    let (tx, rx) = mpsc::channel::<PromptRequest>();
    spawn_prompt_sources(&config, tx);

    start_event_loop(config, rx);
}

//  Event loops

#[cfg(feature = "overlay-gtk")]
fn start_event_loop(config: Config, rx: mpsc::Receiver<PromptRequest>) {
    use wmprompt::overlay::gtk::{self as banner, GtkBannerSink};

    if !config.overlay.enabled {
        return start_plain_loop(config, rx);
    }

    let css = config_dir().join("style.css");
    if let Err(e) = banner::init(Some(css.as_path())) {
        error!("failed to initialise GTK4: {}", e);
        std::process::exit(1);
    }

    let mut sinks = plain_sinks(&config);
    for sink in GtkBannerSink::for_monitors(config.overlay.monitors) {
        sinks.push(Box::new(sink));
    }
    let timer = DeadlineTimer::new();
    let session = build_session(&config, sinks, &timer);
    banner::run_main_loop(session, timer, rx);
}

#[cfg(not(feature = "overlay-gtk"))]
fn start_event_loop(config: Config, rx: mpsc::Receiver<PromptRequest>) {
    start_plain_loop(config, rx);
}

fn start_plain_loop(config: Config, rx: mpsc::Receiver<PromptRequest>) {
    let timer = DeadlineTimer::new();
    let mut session = build_session(&config, plain_sinks(&config), &timer);
    runtime::run(&mut session, &timer, rx);
}

//  Helpers

fn spawn_prompt_sources(config: &Config, tx: mpsc::Sender<PromptRequest>) {
    let path = config
        .socket_path
        .clone()
        .unwrap_or_else(default_socket_path);
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
