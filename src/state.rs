use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::dashboard::DashboardView;
use crate::data::filter::FilterSelection;
use crate::data::loader::{self, DataSource};
use crate::data::model::{Dataset, Dimension, FilterValue};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Dataset>,

    /// Source of the current dataset, reused by "Reload".
    pub source: Option<DataSource>,

    /// Accepted values per filter dimension.
    pub selection: FilterSelection,

    /// Metrics and chart data for the current selection.
    pub view: DashboardView,

    /// Remote-ratio colours, fixed per dataset.
    pub remote_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            source: None,
            selection: FilterSelection::default(),
            view: DashboardView::default(),
            remote_colors: ColorMap::default(),
            status_message: None,
        }
    }

    /// Load from `source`, replacing the current dataset on success.
    ///
    /// On failure the previous dataset (if any) stays and the error is
    /// reported through `status_message`.
    pub fn load(&mut self, source: DataSource) {
        match loader::load(&source) {
            Ok(dataset) => {
                log::info!("Loaded {} salary records from {source}", dataset.len());
                self.source = Some(source);
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {source}: {e:#}");
                self.status_message = Some(format!("Error loading {source}: {e}"));
            }
        }
    }

    /// Load the configured remote dataset.
    pub fn load_default(&mut self) {
        self.load(DataSource::Remote(self.config.dataset_url.clone()))
    }

    /// Ingest a newly loaded dataset, select everything and recompute.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.selection = FilterSelection::all(&dataset);

        let mut labels: Vec<String> = dataset
            .records()
            .iter()
            .map(|r| r.remote_ratio.label())
            .collect();
        labels.sort();
        labels.dedup();
        self.remote_colors = ColorMap::new(labels);

        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Full recompute of the view from the dataset and current selection.
    pub fn refilter(&mut self) {
        self.view = match &self.dataset {
            Some(ds) => DashboardView::compute(ds, &self.selection, &self.config),
            None => DashboardView::default(),
        };
    }

    /// Toggle a single value in a dimension's filter.
    pub fn toggle_filter_value(&mut self, dim: Dimension, value: &FilterValue) {
        self.selection.toggle(dim, value);
        self.refilter();
    }

    /// Select every value of a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        if let Some(ds) = &self.dataset {
            self.selection.select_all(dim, ds);
            self.refilter();
        }
    }

    /// Deselect every value of a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        self.selection.select_none(dim);
        self.refilter();
    }
}
