/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  remote .csv / local .csv .json .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse source → Vec<RawRecord>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  remote_ratio code → category, build Dataset
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → filtered subset (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌───────────────────┐
///   │ metrics + views    │  summary figures and chart-ready aggregations
///   └───────────────────┘
/// ```

pub mod dashboard;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod views;
