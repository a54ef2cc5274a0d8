mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::Path;

use app::LaunchBoardApp;
use eframe::egui;

/// Source table read once at startup; a missing or malformed file is fatal.
const DATA_FILE: &str = "spacex_launch_dash.csv";

fn main() -> eframe::Result {
    env_logger::init();

    let dataset = match data::loader::load_file(Path::new(DATA_FILE)) {
        Ok(ds) => {
            log::info!(
                "Loaded {} launch records from {DATA_FILE} ({} sites)",
                ds.len(),
                ds.sites.len()
            );
            ds
        }
        Err(e) => {
            log::error!("Failed to load {DATA_FILE}: {e:#}");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Launch Records Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(LaunchBoardApp::new(dataset)))),
    )
}
