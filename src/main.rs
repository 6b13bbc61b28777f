mod app;
mod color;
mod controller;
mod data;
mod export;
mod present;
mod state;
mod ui;

use std::path::PathBuf;

use app::PecesExplorerApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let data_path: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/fish.parquet"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([700.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data explorer: Biomasa en peces",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render png/jpg/etc.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(PecesExplorerApp::new(&data_path)))
        }),
    )
}
