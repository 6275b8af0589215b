//! Files - the Launchpad file explorer
//!
//! `padfiles [DIR]` opens in DIR, falling back to the configured start
//! directory and then home.

use std::path::PathBuf;
use std::sync::Arc;

use eframe::NativeOptions;
use padcore::settings::Settings;
use padfiles::app::{start_location, PadFilesApp};
use padfiles::LocalGateway;

fn main() -> eframe::Result<()> {
    padcore::logging::init();

    let settings = Settings::load();
    let start = start_location(std::env::args().nth(1).map(PathBuf::from), &settings);
    tracing::info!(start = %start, "files starting");

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 480.0])
            .with_min_inner_size([420.0, 260.0])
            .with_decorations(false)
            .with_title("files"),
        ..Default::default()
    };

    eframe::run_native(
        "files",
        options,
        Box::new(move |cc| {
            padcore::PadTheme::default().apply(&cc.egui_ctx);
            Box::new(PadFilesApp::new(cc, Arc::new(LocalGateway::new()), settings, start))
        }),
    )
}
