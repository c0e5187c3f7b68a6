use eframe::egui;

use salary_dashboard::app::SalaryDashboardApp;
use salary_dashboard::config::DashboardConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Salary Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SalaryDashboardApp::new(config)))),
    )
}
