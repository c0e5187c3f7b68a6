use std::f64::consts::TAU;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, Polygon, Text};

use crate::color::{ColorMap, SalaryScale};
use crate::data::views::{CountrySalary, HistogramBin, PositionSalary, RemoteShare};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 300.0;
const BAR_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

// ---------------------------------------------------------------------------
// Chart row (central panel)
// ---------------------------------------------------------------------------

/// Render the four charts side by side.
pub fn charts_row(ui: &mut Ui, state: &AppState) {
    let view = &state.view;
    let map_title = format!("Average Salary for {} by Country", state.config.map_job_title);

    ui.columns(4, |cols| {
        top_positions_chart(&mut cols[0], view.top_positions.as_deref());
        salary_histogram_chart(&mut cols[1], view.salary_histogram.as_deref());
        remote_ratio_chart(&mut cols[2], view.remote_ratio.as_deref(), &state.remote_colors);
        country_salary_chart(&mut cols[3], &map_title, view.country_salaries.as_deref());
    });
}

fn no_data(ui: &mut Ui) {
    ui.label(RichText::new("⚠ No Data Available").color(Color32::from_rgb(230, 160, 0)));
}

/// Category label for an integer axis position, empty between categories.
fn label_at(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Best-paid positions: horizontal bars, largest on top
// ---------------------------------------------------------------------------

fn top_positions_chart(ui: &mut Ui, positions: Option<&[PositionSalary]>) {
    ui.strong("Top best paid positions");
    let Some(positions) = positions else {
        no_data(ui);
        return;
    };

    let labels: Vec<String> = positions.iter().map(|p| p.job_title.clone()).collect();
    let bars: Vec<Bar> = positions
        .iter()
        .enumerate()
        .map(|(i, p)| Bar::new(i as f64, p.avg_salary).name(&p.job_title).width(0.7))
        .collect();
    let chart = BarChart::new(bars)
        .horizontal()
        .color(BAR_COLOR)
        .name("Average annual salary in USD");

    Plot::new("top_positions")
        .height(CHART_HEIGHT)
        .x_axis_label("Average annual salary in USD")
        .y_axis_formatter(move |mark, _range| label_at(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Salary distribution histogram
// ---------------------------------------------------------------------------

fn salary_histogram_chart(ui: &mut Ui, bins: Option<&[HistogramBin]>) {
    ui.strong("Yearly Salaries Distribution");
    let Some(bins) = bins else {
        no_data(ui);
        return;
    };

    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            let width = if b.width() > 0.0 { b.width() } else { 1.0 };
            Bar::new(b.center(), b.count as f64)
                .width(width)
                .name(format!("{:.0} – {:.0}", b.start, b.end))
        })
        .collect();
    let chart = BarChart::new(bars).color(BAR_COLOR).name("count");

    Plot::new("salary_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Salary Range (US$)")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Remote ratio donut
// ---------------------------------------------------------------------------

const DONUT_OUTER: f64 = 1.0;
const DONUT_INNER: f64 = 0.5;
/// Max angle per polygon segment; each segment stays convex for the tessellator.
const DONUT_STEP: f64 = 0.05;

fn remote_ratio_chart(ui: &mut Ui, shares: Option<&[RemoteShare]>, colors: &ColorMap) {
    ui.strong("Remote Ratio");
    let Some(shares) = shares else {
        no_data(ui);
        return;
    };

    let total: usize = shares.iter().map(|s| s.quantity).sum();

    Plot::new("remote_ratio")
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .legend(Legend::default())
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for share in shares {
                let label = share.remote_ratio.label();
                let color = colors.color_for(&label);
                let fraction = share.quantity as f64 / total.max(1) as f64;
                let span = fraction * TAU;

                for (a0, a1) in arc_segments(start, span) {
                    let points = vec![
                        polar(DONUT_OUTER, a0),
                        polar(DONUT_OUTER, a1),
                        polar(DONUT_INNER, a1),
                        polar(DONUT_INNER, a0),
                    ];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(points))
                            .fill_color(color)
                            .stroke(Stroke::new(0.5, color))
                            .name(&label),
                    );
                }

                let mid = polar((DONUT_OUTER + DONUT_INNER) / 2.0, start + span / 2.0);
                plot_ui.text(Text::new(
                    PlotPoint::new(mid[0], mid[1]),
                    RichText::new(format!("{:.1}%", fraction * 100.0)).color(Color32::BLACK),
                ));

                start += span;
            }
        });
}

/// Split `[start, start + span]` into pieces no wider than `DONUT_STEP`.
fn arc_segments(start: f64, span: f64) -> Vec<(f64, f64)> {
    let steps = (span / DONUT_STEP).ceil().max(1.0) as usize;
    let step = span / steps as f64;
    (0..steps)
        .map(|i| (start + step * i as f64, start + step * (i + 1) as f64))
        .collect()
}

/// Point on a circle, angle measured clockwise from 12 o'clock.
fn polar(radius: f64, angle: f64) -> [f64; 2] {
    [radius * angle.sin(), radius * angle.cos()]
}

// ---------------------------------------------------------------------------
// Average salary per country
// ---------------------------------------------------------------------------

fn country_salary_chart(ui: &mut Ui, title: &str, countries: Option<&[CountrySalary]>) {
    ui.strong(title);
    let Some(countries) = countries else {
        no_data(ui);
        return;
    };
    let Some(scale) = SalaryScale::spanning(countries.iter().map(|c| c.avg_salary)) else {
        ui.label("No matching records in the current selection.");
        return;
    };

    let labels: Vec<String> = countries
        .iter()
        .map(|c| c.employee_residence_iso3.clone())
        .collect();
    let bars: Vec<Bar> = countries
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new(i as f64, c.avg_salary)
                .name(&c.employee_residence_iso3)
                .fill(scale.color_for(c.avg_salary))
                .width(0.8)
        })
        .collect();
    let chart = BarChart::new(bars).horizontal().name("Avg Salary");

    Plot::new("country_salaries")
        .height(CHART_HEIGHT)
        .x_axis_label("Avg Salary")
        .y_axis_formatter(move |mark, _range| label_at(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_only_on_integer_positions() {
        let labels = vec!["A".to_string(), "B".to_string()];
        assert_eq!(label_at(&labels, 1.0), "B");
        assert_eq!(label_at(&labels, 0.5), "");
        assert_eq!(label_at(&labels, -1.0), "");
        assert_eq!(label_at(&labels, 2.0), "");
    }

    #[test]
    fn arc_segments_cover_span_exactly() {
        let segments = arc_segments(0.5, 1.0);
        assert!(segments.len() >= 20);
        assert_eq!(segments.first().unwrap().0, 0.5);
        assert!((segments.last().unwrap().1 - 1.5).abs() < 1e-9);
        assert!(segments.iter().all(|(a, b)| b - a <= DONUT_STEP + 1e-9));
    }
}
