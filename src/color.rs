use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.5);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Series colors: series name → Color32
// ---------------------------------------------------------------------------

/// Maps chart series names to distinct colours, stable for a given set of
/// names so the legend doesn't reshuffle between recomputations.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl SeriesColors {
    /// Build a colour mapping for the given series names.
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let names: Vec<&str> = names.into_iter().collect();
        let palette = generate_palette(names.len());
        let mapping = names
            .into_iter()
            .zip(palette)
            .map(|(name, color)| (name.to_string(), color))
            .collect();

        SeriesColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a series name.
    pub fn color_for(&self, name: &str) -> Color32 {
        self.mapping
            .get(name)
            .copied()
            .unwrap_or(self.default_color)
    }
}
