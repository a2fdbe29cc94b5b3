//! FitLens - Fit Satisfaction Insights Dashboard
//!
//! Loads a shoe-fit survey CSV and renders filterable descriptive statistics,
//! distributions, a correlation heatmap, and a style/channel pivot table.

mod charts;
mod data;
mod gui;
mod stats;

use eframe::egui;
use gui::FitLensApp;
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Optional CSV path as the first argument; otherwise use the Browse button.
    let initial_csv = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("FitLens"),
        ..Default::default()
    };

    eframe::run_native(
        "FitLens",
        options,
        Box::new(move |cc| Ok(Box::new(FitLensApp::new(cc, initial_csv)))),
    )
}
