use crate::config::DashboardConfig;

use super::filter::{FilterSelection, filtered_indices};
use super::metrics::{SummaryMetrics, compute_metrics};
use super::model::{Dataset, Record};
use super::views::{
    CountrySalary, HistogramBin, PositionSalary, RemoteShare, country_salaries,
    remote_ratio_breakdown, salary_histogram, top_positions,
};

// ---------------------------------------------------------------------------
// One full recompute pass
// ---------------------------------------------------------------------------

/// Everything the shell renders for one filter selection.
///
/// Always rebuilt from scratch; nothing is carried over between selections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    /// Dataset indices of the filtered subset, in dataset order.
    pub row_indices: Vec<usize>,
    pub metrics: SummaryMetrics,
    pub top_positions: Option<Vec<PositionSalary>>,
    pub salary_histogram: Option<Vec<HistogramBin>>,
    pub remote_ratio: Option<Vec<RemoteShare>>,
    pub country_salaries: Option<Vec<CountrySalary>>,
}

impl DashboardView {
    /// Filter the dataset, then derive the metrics and every view from the
    /// filtered subset.
    pub fn compute(dataset: &Dataset, selection: &FilterSelection, config: &DashboardConfig) -> Self {
        let row_indices = filtered_indices(dataset, selection);
        let subset: Vec<&Record> = row_indices
            .iter()
            .map(|&i| &dataset.records()[i])
            .collect();

        log::debug!("Recomputed dashboard: {} of {} rows visible", subset.len(), dataset.len());

        DashboardView {
            metrics: compute_metrics(&subset),
            top_positions: top_positions(&subset, config.top_positions),
            salary_histogram: salary_histogram(&subset, config.histogram_bins),
            remote_ratio: remote_ratio_breakdown(&subset),
            country_salaries: country_salaries(&subset, &config.map_job_title),
            row_indices,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;
    use crate::data::model::{Dimension, FilterValue};

    #[test]
    fn default_selection_view_covers_whole_dataset() {
        let ds = sample_dataset();
        let view = DashboardView::compute(&ds, &FilterSelection::all(&ds), &DashboardConfig::default());

        assert_eq!(view.row_indices, vec![0, 1, 2]);
        assert_eq!(view.metrics.total_records, 3);
        assert_eq!(view.salary_histogram.as_ref().map(|b| b.len()), Some(30));
        assert_eq!(view.country_salaries.as_ref().map(|c| c.len()), Some(2));
    }

    #[test]
    fn empty_selection_propagates_no_data_everywhere() {
        let ds = sample_dataset();
        let mut selection = FilterSelection::all(&ds);
        selection.select_none(Dimension::CompanySize);
        let view = DashboardView::compute(&ds, &selection, &DashboardConfig::default());

        assert!(view.is_empty());
        assert_eq!(view.metrics, SummaryMetrics::default());
        assert!(view.top_positions.is_none());
        assert!(view.salary_histogram.is_none());
        assert!(view.remote_ratio.is_none());
        assert!(view.country_salaries.is_none());
    }

    #[test]
    fn junior_only_selection() {
        let ds = sample_dataset();
        let mut selection = FilterSelection::all(&ds);
        selection.set(Dimension::Seniority, [FilterValue::from("Junior")]);
        let view = DashboardView::compute(&ds, &selection, &DashboardConfig::default());

        assert_eq!(view.metrics.total_records, 1);
        assert_eq!(view.metrics.most_common_position, "Data Analyst");
        assert_eq!(view.country_salaries, Some(Vec::new()));
    }

    #[test]
    fn map_job_title_is_configurable() {
        let ds = sample_dataset();
        let config = DashboardConfig {
            map_job_title: "Data Analyst".into(),
            ..DashboardConfig::default()
        };
        let view = DashboardView::compute(&ds, &FilterSelection::all(&ds), &config);
        let map = view.country_salaries.unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[0].employee_residence_iso3, "BRA");
    }
}
