use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::Record;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

const HEADERS: [&str; 9] = [
    "work_year",
    "year",
    "seniority",
    "employment_type",
    "company_size",
    "job_title",
    "remote_ratio",
    "employee_residence_iso3",
    "salary_in_usd",
];

fn cells(record: &Record) -> [String; 9] {
    [
        record.work_year.to_string(),
        record.year.map(|y| y.to_string()).unwrap_or_default(),
        record.seniority.clone(),
        record.employment_type.clone(),
        record.company_size.clone(),
        record.job_title.clone(),
        record.remote_ratio.label(),
        record.employee_residence_iso3.clone(),
        format!("{:.0}", record.salary_in_usd),
    ]
}

/// Raw rows of the filtered subset, in dataset order.
pub fn records_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let rows = &state.view.row_indices;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .columns(Column::auto().at_least(60.0), HEADERS.len())
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for name in HEADERS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let record = &dataset.records()[rows[row.index()]];
                for cell in cells(record) {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RemoteRatio;
    use crate::data::model::tests::record;

    #[test]
    fn cells_follow_header_order() {
        let r = record(2021, "Junior", "FT", "S", "Data Analyst", RemoteRatio::NotRemote, "BRA", 40_000.4);
        let row = cells(&r);
        assert_eq!(row.len(), HEADERS.len());
        assert_eq!(row[0], "2021");
        assert_eq!(row[6], "Not Remote");
        assert_eq!(row[7], "BRA");
        assert_eq!(row[8], "40000");
    }
}
