use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

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
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Categorical mapping: label → Color32
// ---------------------------------------------------------------------------

/// Maps category labels to distinct colours.
///
/// Built from the full dataset rather than the filtered subset, so a
/// category keeps its colour while filters change.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let palette = generate_palette(labels.len());
        ColorMap {
            mapping: labels.into_iter().zip(palette).collect(),
        }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Continuous red → yellow → green scale
// ---------------------------------------------------------------------------

/// Diverging scale for salary values: low is red, mid is yellow, high is green.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryScale {
    pub min: f64,
    pub max: f64,
}

impl SalaryScale {
    /// Span the given values; `None` when there are none.
    pub fn spanning(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(SalaryScale { min: v, max: v }),
            Some(s) => Some(SalaryScale {
                min: s.min.min(v),
                max: s.max.max(v),
            }),
        })
    }

    /// Position of `value` on the scale in `[0, 1]`. A flat scale maps to the middle.
    pub fn normalize(&self, value: f64) -> f32 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.min) / range).clamp(0.0, 1.0) as f32
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        red_yellow_green(self.normalize(value))
    }
}

/// Interpolate the red-yellow-green ramp in linear RGB.
pub fn red_yellow_green(t: f32) -> Color32 {
    let red: LinSrgb = Srgb::new(0.84f32, 0.19, 0.15).into_linear();
    let yellow: LinSrgb = Srgb::new(1.0f32, 1.0, 0.75).into_linear();
    let green: LinSrgb = Srgb::new(0.10f32, 0.60, 0.31).into_linear();

    let t = t.clamp(0.0, 1.0);
    let mixed = if t < 0.5 {
        red.mix(yellow, t * 2.0)
    } else {
        yellow.mix(green, (t - 0.5) * 2.0)
    };
    to_color32(Srgb::from_linear(mixed))
}
