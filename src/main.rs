#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use rust_timeline_app::app;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Rust Timeline"),
        ..Default::default()
    };

    eframe::run_native(
        "Rust Timeline",
        options,
        Box::new(|cc| Ok(Box::new(app::TimelineApp::new(cc)))),
    )
}
