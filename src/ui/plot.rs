use eframe::egui::{self, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};
use egui_extras::{Column, TableBuilder};

use crate::color::SeriesColors;
use crate::present::{ChartSpec, TableSpec};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel: chart + result table
// ---------------------------------------------------------------------------

/// Render the published chart and table in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Abra un archivo de datos  (Archivo → Abrir…)");
        });
        return;
    }

    let Some(output) = &state.output else {
        ui.label("Sin resultados todavía.");
        return;
    };

    ui.add_space(4.0);
    ui.heading(&output.chart.title);
    ui.label(RichText::new(&output.chart.subtitle).italics());
    ui.add_space(4.0);

    let chart_height = ui.available_height() * 0.6;
    bar_chart(ui, &output.chart, chart_height);

    ui.separator();
    result_table(ui, &output.table);
}

/// Stacked bar chart: one `BarChart` per series, bars positioned by the
/// spec's category order so all series share one axis.
fn bar_chart(ui: &mut Ui, chart: &ChartSpec, height: f32) {
    let colors = SeriesColors::new(chart.series.iter().map(|s| s.name.as_str()));
    let categories = chart.categories.clone();

    // Stack offsets: each series sits on top of the ones drawn before it.
    let mut bottoms: Vec<f64> = vec![0.0; categories.len()];
    let mut charts: Vec<BarChart> = Vec::new();

    for series in &chart.series {
        let mut bars: Vec<Bar> = Vec::new();
        for (category, value) in &series.points {
            let Some(i) = categories.iter().position(|c| c == category) else {
                continue;
            };
            bars.push(
                Bar::new(i as f64, *value)
                    .base_offset(bottoms[i])
                    .name(format!("{category}: {value:.2}"))
                    .width(0.8),
            );
            bottoms[i] += value;
        }
        charts.push(
            BarChart::new(bars)
                .name(&series.name)
                .color(colors.color_for(&series.name)),
        );
    }

    let axis_categories = categories.clone();
    Plot::new("biomass_chart")
        .legend(Legend::default())
        .height(height)
        .y_axis_label(chart.value_label.clone())
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            axis_categories
                .get(i as usize)
                .cloned()
                .unwrap_or_default()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for c in charts {
                plot_ui.bar_chart(c);
            }
        });
}

/// The aggregation result as a scrollable table.
fn result_table(ui: &mut Ui, table: &TableSpec) {
    if table.rows.is_empty() {
        ui.label("Sin datos para los filtros seleccionados.");
        return;
    }

    egui::ScrollArea::horizontal()
        .id_salt("result_table_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .column(Column::auto().at_least(120.0))
                .columns(
                    Column::remainder().at_least(80.0),
                    table.columns.len().saturating_sub(1),
                )
                .header(20.0, |mut header| {
                    for col in &table.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(col);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, table.rows.len(), |mut row| {
                        let cells = &table.rows[row.index()];
                        for cell in cells {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                });
        });
}
