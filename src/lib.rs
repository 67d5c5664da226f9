//! # volpipe-rs
//!
//! A data pipeline for implied-volatility curve files: filters raw CSV rows
//! by curve, year, month and date range, then derives a volatility surface
//! per period, a rolling-mean time series, and its daily-shock series.
//!
//! ## Features
//!
//! - Schema-validated CSV ingestion with per-file date extraction
//! - Curve/year/month/date-range filtering against a known curve list
//! - Surface pivot onto an expiry x moneyness grid
//! - Rolling-window smoothing and day-over-day shock series
//! - CSV/JSON export and PNG chart rendering for the derived tables
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use volpipe_rs::pipeline::{self, FilterCriteria};
//! use volpipe_rs::utils::save_tables_json;
//!
//! fn main() -> volpipe_rs::Result<()> {
//!     // Parse every CSV under the input tree
//!     let loaded = pipeline::load_dir(Path::new("data/curves"))?;
//!
//!     // Filter NYMEX 2024 and derive surfaces, smoothed series and shocks
//!     let criteria = FilterCriteria::new("NYMEX", 2024, None, None)?;
//!     let tables = pipeline::run(&loaded.files, &criteria, 21)?;
//!
//!     // Hand the bundle to the chart collaborator
//!     save_tables_json(&tables, Path::new("out/tables.json"))?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{PipelineError, Result};
