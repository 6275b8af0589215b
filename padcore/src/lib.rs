//! padcore: shared library for the Launchpad shell

pub mod dither;
pub mod drag;
pub mod logging;
pub mod repaint;
pub mod safety;
pub mod settings;
pub mod storage;
pub mod theme;
pub mod widgets;

pub use repaint::RepaintController;
pub use settings::Settings;
pub use theme::PadTheme;

/// Application name used for config, cache and log directories.
pub const APP_NAME: &str = "launchpad";
