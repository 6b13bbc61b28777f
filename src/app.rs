use std::path::Path;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PecesExplorerApp {
    pub state: AppState,
}

impl PecesExplorerApp {
    /// Start the app, loading the dataset from `path` if it exists.
    pub fn new(path: &Path) -> Self {
        let mut state = AppState::default();
        if path.exists() {
            state.load_dataset(path);
        } else {
            log::warn!("Dataset {} not found, start with Archivo → Abrir…", path.display());
        }
        Self { state }
    }
}

impl eframe::App for PecesExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar, summary counts, export ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters and metric controls ----
        egui::SidePanel::left("control_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // One synchronous pipeline pass per frame, only when a control
        // changed; chart and table are published together.
        self.state.recompute_if_dirty();

        // ---- Central panel: chart and result table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::dashboard(ui, &self.state);
        });
    }
}
