//! Data models for curve observations and derived views
//!
//! This module contains data structures for validated curve rows, the
//! volatility surface grid, and the smoothed/shock time series.

mod observation;
mod series;
mod surface;

pub use observation::*;
pub use series::*;
pub use surface::*;
