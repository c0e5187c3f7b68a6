//! Data-job salary dashboard: load the salary table once, filter it along
//! four categorical dimensions and derive summary metrics and chart data.
//!
//! The `data` module is UI-free; `app`, `ui` and `color` are the egui shell.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
