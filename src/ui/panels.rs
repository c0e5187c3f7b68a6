use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::loader::DataSource;
use crate::data::metrics::SummaryMetrics;
use crate::data::model::{Dimension, FilterValue};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// A filter change requested by a widget, applied after the panel is drawn.
enum FilterAction {
    Toggle(Dimension, FilterValue),
    SelectAll(Dimension),
    SelectNone(Dimension),
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut actions = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in Dimension::ALL {
                let all_values = dataset.distinct_values(dim);
                let selected = state.selection.selected(dim);

                let header_text = format!("{}  ({}/{})", dim.label(), selected.len(), all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.label())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                actions.push(FilterAction::SelectAll(dim));
                            }
                            if ui.small_button("None").clicked() {
                                actions.push(FilterAction::SelectNone(dim));
                            }
                        });

                        for val in all_values {
                            let mut checked = selected.contains(val);
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                actions.push(FilterAction::Toggle(dim, val.clone()));
                            }
                        }
                    });
            }
        });

    // Each change triggers its own full recompute.
    for action in actions {
        match action {
            FilterAction::Toggle(dim, value) => state.toggle_filter_value(dim, &value),
            FilterAction::SelectAll(dim) => state.select_all(dim),
            FilterAction::SelectNone(dim) => state.select_none(dim),
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                let source = state
                    .source
                    .clone()
                    .unwrap_or_else(|| DataSource::Remote(state.config.dataset_url.clone()));
                state.load(source);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} shown",
                format_count(ds.len()),
                format_count(state.view.row_indices.len())
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

/// Four side-by-side metric cards.
pub fn metric_cards(ui: &mut Ui, metrics: &SummaryMetrics) {
    let cards = [
        ("Average Salary", format!("{} /y", format_usd(metrics.avg_salary))),
        ("Max Salary", format!("{} /y", format_usd(metrics.max_salary))),
        ("Total Records", format_count(metrics.total_records)),
        ("Most Common Position", metrics.most_common_position.clone()),
    ];

    ui.columns(cards.len(), |columns| {
        for (col, (label, value)) in columns.iter_mut().zip(cards) {
            col.group(|ui: &mut Ui| {
                ui.label(RichText::new(label).weak());
                ui.label(RichText::new(value).size(22.0).strong());
            });
        }
    });
}

/// Shown in place of the dashboard when no dataset could be loaded.
pub fn load_failure(ui: &mut Ui, state: &AppState) {
    ui.centered_and_justified(|ui: &mut Ui| {
        let msg = state
            .status_message
            .as_deref()
            .unwrap_or("No dataset loaded  (File → Open…)");
        ui.heading(RichText::new(msg).color(Color32::RED));
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open salary data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(DataSource::File(path));
    }
}

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// `US$116,667` – rounded to whole dollars with thousands separators.
pub fn format_usd(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}US${}", group_thousands(rounded.abs() as u64))
}

pub fn format_count(n: usize) -> String {
    group_thousands(n as u64)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usd_rounds_and_groups() {
        assert_eq!(format_usd(116_666.666), "US$116,667");
        assert_eq!(format_usd(0.0), "US$0");
        assert_eq!(format_usd(1_234_567.4), "US$1,234,567");
        assert_eq!(format_usd(-999.6), "-US$1,000");
    }

    #[test]
    fn counts_group_thousands() {
        assert_eq!(format_count(3), "3");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(123_456), "123,456");
    }
}
