use crate::error::{PipelineError, Result};
use crate::models::{ShockSeries, SurfaceGrid, TimeSeries};
use chrono::Duration;
use plotters::prelude::*;
use std::path::Path;

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 900;

fn padded(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    if span > 0.0 {
        (min - 0.1 * span, max + 0.1 * span)
    } else {
        (min - 0.5, max + 0.5)
    }
}

/// Heatmap of a surface grid: moneyness on x, curve date (days from the
/// first expiry) on y, cell color by implied volatility.
pub fn plot_surface<P: AsRef<Path>>(grid: &SurfaceGrid, output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    if grid.expiries.is_empty() || grid.moneyness.is_empty() {
        return Err(PipelineError::Plot(
            "no valid data points for surface plot".to_string(),
        ));
    }

    let day0 = grid.expiries[0];
    let days: Vec<f64> = grid
        .expiries
        .iter()
        .map(|&d| (d - day0).num_days() as f64)
        .collect();

    let mut x_min = grid.moneyness[0];
    let mut x_max = grid.moneyness[grid.moneyness.len() - 1];
    if x_max <= x_min {
        x_min -= 0.5;
        x_max += 0.5;
    }
    let mut y_min = days[0];
    let mut y_max = days[days.len() - 1];
    if y_max <= y_min {
        y_min -= 0.5;
        y_max += 0.5;
    }

    let mut vol_min = f64::INFINITY;
    let mut vol_max = f64::NEG_INFINITY;
    for &vol in grid.values.iter() {
        if !vol.is_nan() {
            vol_min = vol_min.min(vol);
            vol_max = vol_max.max(vol);
        }
    }
    if !vol_min.is_finite() {
        return Err(PipelineError::Plot(
            "no populated cells in surface grid".to_string(),
        ));
    }
    let vol_span = (vol_max - vol_min).max(f64::EPSILON);

    let cell_w = (x_max - x_min) / grid.moneyness.len() as f64;
    let cell_h = (y_max - y_min) / grid.expiries.len() as f64;

    let root = BitMapBackend::new(output_path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PipelineError::Plot(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} Volatility Surface - {}", grid.curve, grid.period),
            ("sans-serif", 30).into_font(),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (x_min - 0.05 * (x_max - x_min))..(x_max + 0.05 * (x_max - x_min)),
            (y_min - 0.05 * (y_max - y_min))..(y_max + 0.05 * (y_max - y_min)),
        )
        .map_err(|e| PipelineError::Plot(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Moneyness")
        .y_desc(format!("Curve Date (days from {})", day0))
        .axis_desc_style(("sans-serif", 15))
        .draw()
        .map_err(|e| PipelineError::Plot(e.to_string()))?;

    let color_gradient = colorous::VIRIDIS;

    let mut cells = Vec::new();
    for (i, &day) in days.iter().enumerate() {
        for (j, &money) in grid.moneyness.iter().enumerate() {
            let vol = grid.values[[i, j]];
            if vol.is_nan() {
                continue;
            }
            let normalized = (vol - vol_min) / vol_span;
            let color = color_gradient.eval_continuous(normalized);
            let rgb = RGBColor(color.r, color.g, color.b);
            cells.push(Rectangle::new(
                [
                    (money - 0.5 * cell_w, day - 0.5 * cell_h),
                    (money + 0.5 * cell_w, day + 0.5 * cell_h),
                ],
                rgb.filled(),
            ));
        }
    }
    chart
        .draw_series(cells)
        .map_err(|e| PipelineError::Plot(e.to_string()))?;

    // color bar on the right margin
    let bar_width = 20;
    let bar_height = 400;
    let bar_x = WIDTH as i32 - 120;
    let bar_y = 100;
    for i in 0..bar_height {
        let normalized = 1.0 - (i as f64 / bar_height as f64);
        let color = color_gradient.eval_continuous(normalized);
        let rgb = RGBColor(color.r, color.g, color.b);
        root.draw(&Rectangle::new(
            [(bar_x, bar_y + i), (bar_x + bar_width, bar_y + i + 1)],
            rgb.filled(),
        ))
        .map_err(|e| PipelineError::Plot(e.to_string()))?;
    }
    root.draw_text(
        &format!("{:.2}", vol_max),
        &TextStyle::from(("sans-serif", 12)).color(&BLACK),
        (bar_x + bar_width + 5, bar_y),
    )
    .map_err(|e| PipelineError::Plot(e.to_string()))?;
    root.draw_text(
        &format!("{:.2}", vol_min),
        &TextStyle::from(("sans-serif", 12)).color(&BLACK),
        (bar_x + bar_width + 5, bar_y + bar_height),
    )
    .map_err(|e| PipelineError::Plot(e.to_string()))?;
    root.draw_text(
        "IV",
        &TextStyle::from(("sans-serif", 12)).color(&BLACK),
        (bar_x + bar_width + 5, bar_y + bar_height / 2),
    )
    .map_err(|e| PipelineError::Plot(e.to_string()))?;

    root.present()
        .map_err(|e| PipelineError::Plot(e.to_string()))?;
    Ok(())
}

/// Two-panel chart: raw series with its rolling mean on top, daily shocks
/// below.
pub fn plot_time_series<P: AsRef<Path>>(
    series: &TimeSeries,
    smoothed: &TimeSeries,
    shocks: Option<&ShockSeries>,
    window: usize,
    output_path: P,
) -> Result<()> {
    let output_path = output_path.as_ref();
    if series.is_empty() {
        return Err(PipelineError::Plot(
            "no valid data points for time series plot".to_string(),
        ));
    }

    let first = series.points[0].0;
    let last = series.points[series.points.len() - 1].0;
    let x_range = if last > first {
        first..last
    } else {
        first..first + Duration::days(1)
    };

    let root = BitMapBackend::new(output_path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PipelineError::Plot(e.to_string()))?;
    let (upper, lower) = root.split_vertically(HEIGHT / 2);

    let raw_values = series.points.iter().map(|&(_, v)| v);
    let smooth_values = smoothed.points.iter().map(|&(_, v)| v);
    let value_min = raw_values
        .clone()
        .chain(smooth_values.clone())
        .fold(f64::INFINITY, f64::min);
    let value_max = raw_values
        .chain(smooth_values)
        .fold(f64::NEG_INFINITY, f64::max);
    let (y_min, y_max) = padded(value_min, value_max);

    let mut chart = ChartBuilder::on(&upper)
        .caption(
            format!("{} ({}-day rolling)", series.label, window),
            ("sans-serif", 30).into_font(),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), y_min..y_max)
        .map_err(|e| PipelineError::Plot(e.to_string()))?;
    chart
        .configure_mesh()
        .y_desc("Volatility")
        .axis_desc_style(("sans-serif", 15))
        .draw()
        .map_err(|e| PipelineError::Plot(e.to_string()))?;
    chart
        .draw_series(LineSeries::new(
            series.points.iter().map(|&(d, v)| (d, v)),
            &RGBColor(158, 158, 158),
        ))
        .map_err(|e| PipelineError::Plot(e.to_string()))?;
    chart
        .draw_series(LineSeries::new(
            smoothed.points.iter().map(|&(d, v)| (d, v)),
            BLUE.stroke_width(2),
        ))
        .map_err(|e| PipelineError::Plot(e.to_string()))?;

    if let Some(shocks) = shocks.filter(|s| !s.is_empty()) {
        let shock_min = shocks
            .points
            .iter()
            .map(|&(_, v)| v)
            .fold(f64::INFINITY, f64::min);
        let shock_max = shocks
            .points
            .iter()
            .map(|&(_, v)| v)
            .fold(f64::NEG_INFINITY, f64::max);
        let (y_min, y_max) = padded(shock_min, shock_max);

        let mut chart = ChartBuilder::on(&lower)
            .caption("Daily Volatility Shocks", ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_min..y_max)
            .map_err(|e| PipelineError::Plot(e.to_string()))?;
        chart
            .configure_mesh()
            .y_desc("Delta Volatility")
            .axis_desc_style(("sans-serif", 15))
            .draw()
            .map_err(|e| PipelineError::Plot(e.to_string()))?;
        chart
            .draw_series(LineSeries::new(
                shocks.points.iter().map(|&(d, v)| (d, v)),
                &RED,
            ))
            .map_err(|e| PipelineError::Plot(e.to_string()))?;
    }

    root.present()
        .map_err(|e| PipelineError::Plot(e.to_string()))?;
    Ok(())
}
