//! The data-transformation pipeline
//!
//! Validated rows flow through the curve filter and fan out into the three
//! derived views: per-period volatility surfaces, a rolling-mean time
//! series, and its daily-shock series. Everything here is a pure function
//! over already-loaded data; a run never mutates its inputs.

mod filter;
mod ingest;
mod moneyness;
mod smooth;

pub use filter::{filter_observations, FilterCriteria};
pub use ingest::{file_date, load_dir, load_file, parse_csv, CurveFile, LoadOutcome};
pub use moneyness::moneyness;
pub use smooth::{
    daily_shocks, ewma_series, is_ewma, rolling_mean, MAX_WINDOW, MIN_WINDOW,
};

use crate::error::Result;
use crate::models::{Observation, ShockSeries, SurfaceGrid, TimeSeries};
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Everything one pipeline run hands to the export and plotting
/// collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedTables {
    pub criteria: FilterCriteria,
    pub window: usize,
    pub monthly_surfaces: Vec<SurfaceGrid>,
    pub yearly_surface: Option<SurfaceGrid>,
    /// Daily series the smoother ran on: the EWMA stream when the filtered
    /// rows carry one, the per-date mean of the quote mids otherwise.
    pub series: TimeSeries,
    pub smoothed: TimeSeries,
    /// `None` when the smoothed series is too short to difference.
    pub shocks: Option<ShockSeries>,
    pub dropped_rows: usize,
}

/// Run the full pipeline over already-parsed files.
///
/// Surfaces are built per calendar month plus once for the whole year; a
/// period whose rows cannot form a surface is logged and skipped without
/// aborting the others. An empty filter result produces empty tables, not
/// an error.
pub fn run(files: &[CurveFile], criteria: &FilterCriteria, window: usize) -> Result<DerivedTables> {
    let dropped_rows: usize = files.iter().map(|f| f.dropped_rows).sum();
    let observations: Vec<Observation> = files
        .iter()
        .flat_map(|f| f.observations.iter().cloned())
        .collect();

    let filtered = filter_observations(&observations, criteria);
    info!(
        "{} of {} rows match {} {}",
        filtered.len(),
        observations.len(),
        criteria.curve,
        criteria.year
    );

    let (ewma_rows, quote_rows): (Vec<Observation>, Vec<Observation>) =
        filtered.into_iter().partition(is_ewma);

    let mut monthly_surfaces = Vec::new();
    for (period, rows) in group_by_month(&quote_rows) {
        match surface_for(criteria, &period, &rows) {
            Ok(grid) => monthly_surfaces.push(grid),
            Err(err) => warn!("skipping surface for {} {}: {}", criteria.curve, period, err),
        }
    }
    let yearly_surface = match surface_for(criteria, &criteria.year.to_string(), &quote_rows) {
        Ok(grid) => Some(grid),
        Err(err) => {
            warn!(
                "no yearly surface for {} {}: {}",
                criteria.curve, criteria.year, err
            );
            None
        }
    };

    let series = if ewma_rows.is_empty() {
        TimeSeries::daily_mean(format!("{} mid", criteria.curve), &quote_rows)
    } else {
        TimeSeries::daily_mean(format!("{} ewma", criteria.curve), &ewma_rows)
    };
    let smoothed = rolling_mean(&series, window)?;
    let shocks = match daily_shocks(&smoothed) {
        Ok(shocks) => Some(shocks),
        Err(err) => {
            debug!("no shock series: {}", err);
            None
        }
    };

    Ok(DerivedTables {
        criteria: criteria.clone(),
        window,
        monthly_surfaces,
        yearly_surface,
        series,
        smoothed,
        shocks,
        dropped_rows,
    })
}

/// Bucket rows by `YYYY-MM`, keeping input order within each bucket.
fn group_by_month(observations: &[Observation]) -> BTreeMap<String, Vec<Observation>> {
    let mut groups: BTreeMap<String, Vec<Observation>> = BTreeMap::new();
    for obs in observations {
        let key = format!("{}-{:02}", obs.date.year(), obs.date.month());
        groups.entry(key).or_default().push(obs.clone());
    }
    groups
}

/// Map rows onto the moneyness axis and pivot them into a grid.
fn surface_for(
    criteria: &FilterCriteria,
    period: &str,
    rows: &[Observation],
) -> Result<SurfaceGrid> {
    let mut mapped = Vec::with_capacity(rows.len());
    for obs in rows {
        mapped.push((obs.date, moneyness(obs)?, obs.mid));
    }
    SurfaceGrid::from_observations(criteria.curve.as_str(), period, &mapped)
}
