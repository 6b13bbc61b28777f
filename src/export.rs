use std::path::PathBuf;

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};

use crate::color::generate_palette;
use crate::present::ChartSpec;

// ---------------------------------------------------------------------------
// Chart image export
// ---------------------------------------------------------------------------

const IMAGE_WIDTH: u32 = 1000;
const IMAGE_HEIGHT: u32 = 600;
const MARGIN: u32 = 40;

/// File name for an exported chart: the title text plus `.png`, with path
/// separators replaced so the title can't escape the chosen directory.
pub fn file_name_for(chart: &ChartSpec) -> String {
    let stem: String = chart
        .title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '-',
            other => other,
        })
        .collect();
    format!("{stem}.png")
}

/// Ask for a destination and write the chart as a PNG. Returns the chosen
/// path, or `None` when the dialog was cancelled.
pub fn save_chart_png(chart: &ChartSpec) -> Result<Option<PathBuf>> {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Descargar imagen")
        .set_file_name(file_name_for(chart))
        .add_filter("PNG", &["png"])
        .save_file()
    else {
        return Ok(None);
    };

    let img = render_chart_image(chart);
    img.save(&path)
        .with_context(|| format!("writing chart image to {}", path.display()))?;
    Ok(Some(path))
}

/// Rasterize the chart as stacked vertical bars on a white background.
/// Intentionally spartan: the export exists so results can be dropped into
/// a report, not to replace the interactive view.
pub fn render_chart_image(chart: &ChartSpec) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(IMAGE_WIDTH, IMAGE_HEIGHT, Rgba([255, 255, 255, 255]));
    if chart.categories.is_empty() {
        return img;
    }

    // Stacked height per category determines the value scale.
    let mut stacked: Vec<f64> = vec![0.0; chart.categories.len()];
    for series in &chart.series {
        for (category, value) in &series.points {
            if let Some(i) = chart.categories.iter().position(|c| c == category) {
                stacked[i] += value.max(0.0);
            }
        }
    }
    let max_total = stacked.iter().cloned().fold(0.0_f64, f64::max);
    if max_total <= 0.0 {
        return img;
    }

    let plot_width = IMAGE_WIDTH - 2 * MARGIN;
    let plot_height = IMAGE_HEIGHT - 2 * MARGIN;
    let slot = plot_width as f64 / chart.categories.len() as f64;
    let bar_width = (slot * 0.8).max(1.0) as u32;

    let palette = generate_palette(chart.series.len());
    let mut bottoms: Vec<f64> = vec![0.0; chart.categories.len()];

    for (series_idx, series) in chart.series.iter().enumerate() {
        let c = palette[series_idx];
        let color = Rgba([c.r(), c.g(), c.b(), 255]);

        for (category, value) in &series.points {
            let Some(i) = chart.categories.iter().position(|cat| cat == category) else {
                continue;
            };
            let value = value.max(0.0);
            let x0 = MARGIN + (i as f64 * slot + slot * 0.1) as u32;
            let y_base = bottoms[i] / max_total * plot_height as f64;
            let y_top = (bottoms[i] + value) / max_total * plot_height as f64;
            bottoms[i] += value;

            let y0 = IMAGE_HEIGHT - MARGIN - y_top as u32;
            let y1 = IMAGE_HEIGHT - MARGIN - y_base as u32;
            fill_rect(&mut img, x0, y0, bar_width, y1.saturating_sub(y0), color);
        }
    }

    // Axis lines.
    let axis = Rgba([60, 63, 84, 255]);
    fill_rect(&mut img, MARGIN, IMAGE_HEIGHT - MARGIN, plot_width, 2, axis);
    fill_rect(&mut img, MARGIN - 2, MARGIN, 2, plot_height, axis);

    img
}

fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    for px in x..(x + w).min(IMAGE_WIDTH) {
        for py in y..(y + h).min(IMAGE_HEIGHT) {
            img.put_pixel(px, py, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::{ChartSeries, CHART_SUBTITLE};

    fn chart() -> ChartSpec {
        ChartSpec {
            title: "Biomasa por bioregión".to_string(),
            subtitle: CHART_SUBTITLE.to_string(),
            value_label: "Biomasa por 250 m²".to_string(),
            categories: vec!["Norte".to_string(), "Sur".to_string()],
            series: vec![ChartSeries {
                name: "Biomasa por 250 m²".to_string(),
                points: vec![("Norte".to_string(), 1.5), ("Sur".to_string(), 3.0)],
            }],
        }
    }

    #[test]
    fn file_name_comes_from_the_title() {
        assert_eq!(file_name_for(&chart()), "Biomasa por bioregión.png");
    }

    #[test]
    fn separators_in_the_title_are_replaced() {
        let mut c = chart();
        c.title = "Biomasa a/b".to_string();
        assert_eq!(file_name_for(&c), "Biomasa a-b.png");
    }

    #[test]
    fn rendered_image_contains_bar_pixels() {
        let img = render_chart_image(&chart());
        assert_eq!(img.dimensions(), (IMAGE_WIDTH, IMAGE_HEIGHT));
        let white = Rgba([255, 255, 255, 255]);
        let painted = img.pixels().filter(|&&p| p != white).count();
        assert!(painted > 0);
    }

    #[test]
    fn empty_chart_renders_blank() {
        let mut c = chart();
        c.categories.clear();
        c.series.clear();
        let img = render_chart_image(&c);
        let white = Rgba([255, 255, 255, 255]);
        assert!(img.pixels().all(|&p| p == white));
    }
}
