/// Source of the salary dataset fetched at startup.
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/vqrca/dashboard_salarios_dados/refs/heads/main/dados-imersao-final.csv";

/// Dashboard-wide settings. There is no config file; `Default` is the
/// configuration every session starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Remote CSV loaded when the session starts.
    pub dataset_url: String,
    /// Number of equal-width bins in the salary distribution.
    pub histogram_bins: usize,
    /// How many positions the best-paid chart shows.
    pub top_positions: usize,
    /// Job title the country salary map is restricted to (exact match).
    pub map_job_title: String,
    /// Initial window size in logical points.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_url: DEFAULT_DATASET_URL.to_string(),
            histogram_bins: 30,
            top_positions: 10,
            map_job_title: "Data Scientist".to_string(),
            window_size: [1400.0, 900.0],
        }
    }
}
