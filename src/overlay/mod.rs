//! On-screen notification banners.
//!
//! When the `overlay-gtk` feature is enabled, [`gtk::GtkBannerSink`]
//! displays notifications in a layer-shell window and
//! [`gtk::run_main_loop`] takes over the main thread, driving request
//! handling and notification timing through the GLib main loop.

#[cfg(feature = "overlay-gtk")]
pub mod gtk;
