use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::{Dimension, SurveyDataset};
use crate::export;
use crate::state::{AppState, ControlState};

// ---------------------------------------------------------------------------
// Left side panel – filter and chart controls
// ---------------------------------------------------------------------------

/// Render the left control panel: the filter accordions and the metric
/// selectors. Control mutations mark the state dirty; the app runs one
/// recomputation after the panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtros y controles");
    ui.separator();

    let (Some(dataset), Some(controls)) = (&state.dataset, &mut state.controls) else {
        ui.label("No hay datos cargados.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Temporal filters ----
            egui::CollapsingHeader::new(RichText::new("Filtros temporales").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.label("Época");
                    let seasons = dataset.domain(Dimension::Season).clone();
                    for season in &seasons {
                        let mut checked =
                            controls.filter.selection(Dimension::Season).contains(season);
                        if ui.checkbox(&mut checked, season).changed() {
                            controls.toggle_filter_value(Dimension::Season, season);
                        }
                    }

                    ui.add_space(4.0);
                    ui.label("Años");
                    if let Some((lo, hi)) = dataset.year_span() {
                        let (mut start, mut end) = controls.filter.year_range();
                        let mut changed = false;
                        changed |= ui
                            .add(egui::Slider::new(&mut start, lo..=hi).text("desde"))
                            .changed();
                        changed |= ui
                            .add(egui::Slider::new(&mut end, lo..=hi).text("hasta"))
                            .changed();
                        if changed {
                            controls.set_year_range(start, end);
                        }
                    }
                });

            // ---- Geographic filters ----
            egui::CollapsingHeader::new(RichText::new("Filtros geográficos").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    for dim in [Dimension::Bioregion, Dimension::Subzone, Dimension::Island] {
                        checklist(ui, dataset, controls, dim);
                    }
                });

            // ---- Taxonomic filters ----
            egui::CollapsingHeader::new(RichText::new("Filtros taxonómicos").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    for dim in [Dimension::Order, Dimension::Family] {
                        checklist(ui, dataset, controls, dim);
                    }
                });

            ui.separator();

            // ---- Chart metric controls ----
            ui.strong("Métrica");
            egui::ComboBox::from_id_salt("primary_metric")
                .selected_text(controls.primary.title_label())
                .show_ui(ui, |ui: &mut Ui| {
                    for dim in Dimension::ALL {
                        if ui
                            .selectable_label(controls.primary == dim, dim.title_label())
                            .clicked()
                        {
                            controls.set_primary(dim);
                        }
                    }
                });

            let mut second = controls.second_metric;
            if ui
                .checkbox(&mut second, "Añadir otra métrica al gráfico")
                .changed()
            {
                controls.set_second_metric(second);
            }

            ui.add_enabled_ui(controls.second_metric, |ui: &mut Ui| {
                let selected_text = controls
                    .secondary
                    .map(|d| d.title_label())
                    .unwrap_or_else(|| "Seleccione una variable".to_string());
                egui::ComboBox::from_id_salt("secondary_metric")
                    .selected_text(selected_text)
                    .show_ui(ui, |ui: &mut Ui| {
                        for dim in Dimension::ALL {
                            if ui
                                .selectable_label(
                                    controls.secondary == Some(dim),
                                    dim.title_label(),
                                )
                                .clicked()
                            {
                                controls.set_secondary(Some(dim));
                            }
                        }
                    });
            });
        });
}

/// One per-dimension checklist with its "Seleccionar todo" checkbox,
/// collapsed behind the dimension's label.
fn checklist(ui: &mut Ui, dataset: &SurveyDataset, controls: &mut ControlState, dim: Dimension) {
    let options = dataset.domain(dim).clone();
    let n_selected = controls.filter.selection(dim).len();
    let header = format!("{}  ({n_selected}/{})", dim.title_label(), options.len());

    egui::CollapsingHeader::new(header)
        .id_salt(dim.column())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let mut all_checked = controls.select_all_checked(dim);
            if ui.checkbox(&mut all_checked, "Seleccionar todo").changed() {
                controls.set_select_all(dim, all_checked, &options);
            }

            for value in &options {
                let mut checked = controls.filter.selection(dim).contains(value);
                if ui.checkbox(&mut checked, value).changed() {
                    controls.toggle_filter_value(dim, value);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar: file open, summary line, image export.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    let mut status_update: Option<String> = None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Archivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.strong("Data explorer: Biomasa en peces");
        ui.separator();

        if let Some(ds) = &state.dataset {
            let s = ds.summary();
            ui.label(format!(
                "{} registros · {} sitios · {} islas · {} especies · {} grupos funcionales",
                s.records, s.sites, s.islands, s.species, s.functional_groups
            ));
        }

        ui.separator();

        if let Some(output) = &state.output {
            if ui.button("Descargar imagen").clicked() {
                match export::save_chart_png(&output.chart) {
                    Ok(Some(path)) => {
                        log::info!("Chart exported to {}", path.display());
                        status_update = Some(format!("Imagen guardada: {}", path.display()));
                    }
                    Ok(None) => {}
                    Err(e) => {
                        log::error!("Chart export failed: {e:#}");
                        status_update = Some(format!("Error: {e:#}"));
                    }
                }
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    if let Some(msg) = status_update {
        state.status_message = Some(msg);
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir datos de biomasa")
        .add_filter("Supported files", &["parquet", "pq", "csv", "json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load_dataset(&path);
    }
}
