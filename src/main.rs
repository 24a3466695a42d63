//! UniDash - University Enrollment Analytics & Interactive Dashboard
//!
//! A Rust application for exploring university enrollment statistics:
//! load a CSV, filter by year and term, and view KPIs and charts.

mod charts;
mod data;
mod gui;
mod stats;

use eframe::egui;
use gui::UniDashApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("UniDash"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "UniDash",
        options,
        Box::new(|cc| Ok(Box::new(UniDashApp::new(cc)))),
    )
}
