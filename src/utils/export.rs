use crate::error::Result;
use crate::models::{ShockSeries, SurfaceGrid, TimeSeries};
use crate::pipeline::DerivedTables;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Wide-format surface table: one row per expiry, one column per moneyness
/// offset. Unpopulated cells stay blank so downstream tooling cannot
/// mistake them for zeros.
pub fn write_surface_csv<W: Write>(grid: &SurfaceGrid, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["date".to_string()];
    header.extend(grid.moneyness.iter().map(|m| format!("{:.2}", m)));
    writer.write_record(&header)?;

    for (i, expiry) in grid.expiries.iter().enumerate() {
        let mut row = vec![expiry.to_string()];
        for j in 0..grid.moneyness.len() {
            let value = grid.values[[i, j]];
            row.push(if value.is_nan() {
                String::new()
            } else {
                value.to_string()
            });
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_surface_csv(grid: &SurfaceGrid, path: &Path) -> Result<()> {
    write_surface_csv(grid, File::create(path)?)
}

/// Combined time-series table: date, raw value, rolling mean, daily shock.
/// The smoothed series shares the raw series' date domain, and the shock
/// series starts one point later, so the first shock cell is blank.
pub fn write_time_series_csv<W: Write>(
    series: &TimeSeries,
    smoothed: &TimeSeries,
    shocks: Option<&ShockSeries>,
    out: W,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["date", "mid", "rolling", "daily_change"])?;

    for (i, &(date, value)) in series.points.iter().enumerate() {
        let rolling = smoothed
            .points
            .get(i)
            .map(|&(_, v)| v.to_string())
            .unwrap_or_default();
        let shock = shocks
            .and_then(|s| i.checked_sub(1).and_then(|k| s.points.get(k)))
            .map(|&(_, v)| v.to_string())
            .unwrap_or_default();
        writer.write_record([date.to_string(), value.to_string(), rolling, shock])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_time_series_csv(
    series: &TimeSeries,
    smoothed: &TimeSeries,
    shocks: Option<&ShockSeries>,
    path: &Path,
) -> Result<()> {
    write_time_series_csv(series, smoothed, shocks, File::create(path)?)
}

/// Serialize the full bundle for the interactive chart collaborator.
pub fn save_tables_json(tables: &DerivedTables, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, tables)?;
    Ok(())
}
