//! Pipeline runner for volpipe-rs
//!
//! Reads its parameters from the environment, then:
//! 1. Walks the input tree and validates every CSV
//! 2. Filters rows by curve, year, month and date range
//! 3. Derives per-period surfaces, the rolling-mean series and daily shocks
//! 4. Writes CSV/JSON tables and PNG charts to the output directory

use std::fs;
use tracing::{info, warn};
use volpipe_rs::config::Config;
use volpipe_rs::pipeline::{self, load_dir};
use volpipe_rs::utils::{
    plot_surface, plot_time_series, save_surface_csv, save_tables_json, save_time_series_csv,
};
use volpipe_rs::Result;

fn main() -> Result<()> {
    let config = Config::from_env()?;
    config.init_logging()?;
    let criteria = config.criteria()?;

    info!("loading curve files from {}", config.input_dir.display());
    let loaded = load_dir(&config.input_dir)?;
    info!(
        "parsed {} files ({} skipped, {} unreadable)",
        loaded.files.len(),
        loaded.skipped,
        loaded.failures.len()
    );

    let tables = pipeline::run(&loaded.files, &criteria, config.window)?;
    if tables.dropped_rows > 0 {
        warn!("{} rows dropped during validation", tables.dropped_rows);
    }

    fs::create_dir_all(&config.output_dir)?;
    let slug = criteria.curve.replace(' ', "_");

    for grid in &tables.monthly_surfaces {
        let base = config
            .output_dir
            .join(format!("{}_{}_surface", slug, grid.period));
        save_surface_csv(grid, &base.with_extension("csv"))?;
        if let Err(err) = plot_surface(grid, base.with_extension("png")) {
            warn!("surface plot failed for {}: {}", grid.period, err);
        }
    }
    if let Some(grid) = &tables.yearly_surface {
        let base = config
            .output_dir
            .join(format!("{}_{}_YEARLY_surface", slug, grid.period));
        save_surface_csv(grid, &base.with_extension("csv"))?;
        if let Err(err) = plot_surface(grid, base.with_extension("png")) {
            warn!("yearly surface plot failed: {}", err);
        }
    }

    let series_base = config
        .output_dir
        .join(format!("{}_{}_time_series", slug, config.year));
    save_time_series_csv(
        &tables.series,
        &tables.smoothed,
        tables.shocks.as_ref(),
        &series_base.with_extension("csv"),
    )?;
    if tables.series.is_empty() {
        info!("no rows matched the filter; skipping time series chart");
    } else if let Err(err) = plot_time_series(
        &tables.series,
        &tables.smoothed,
        tables.shocks.as_ref(),
        config.window,
        series_base.with_extension("png"),
    ) {
        warn!("time series plot failed: {}", err);
    }

    save_tables_json(
        &tables,
        &config
            .output_dir
            .join(format!("{}_{}_tables.json", slug, config.year)),
    )?;

    info!("pipeline outputs written to {}", config.output_dir.display());
    Ok(())
}
