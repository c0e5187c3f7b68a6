use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalaryDashboardApp {
    pub state: AppState,
}

impl SalaryDashboardApp {
    /// Build the app and fetch the configured dataset before the first frame.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        // A failure is kept in `status_message` and rendered in place of the dashboard.
        state.load_default();
        Self { state }
    }
}

impl eframe::App for SalaryDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, raw table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                panels::load_failure(ui, &self.state);
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.heading("Data Positions Salaries Dashboard");
                    ui.label(
                        "Explore salary information for data positions in recent years. \
                         Use the filters on the sidebar to refine your research.",
                    );

                    ui.add_space(8.0);
                    ui.strong("General Metrics");
                    panels::metric_cards(ui, &self.state.view.metrics);
                    ui.separator();

                    ui.strong("Charts");
                    plot::charts_row(ui, &self.state);
                    ui.separator();

                    ui.strong("Detailed Data");
                    table::records_table(ui, &self.state);
                });
        });
    }
}
