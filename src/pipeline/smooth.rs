use crate::error::{PipelineError, Result};
use crate::models::{Observation, OptionSide, ShockSeries, TimeSeries};
use statrs::statistics::Statistics;

/// Supported rolling-window bounds, inclusive.
pub const MIN_WINDOW: usize = 5;
pub const MAX_WINDOW: usize = 60;

/// Simple moving average over `window` consecutive points.
///
/// The first `window - 1` points carry a partial-window average, so the
/// output always has the same length and dates as the input. An empty input
/// yields an empty output. Deterministic: identical input and window always
/// produce identical output.
pub fn rolling_mean(series: &TimeSeries, window: usize) -> Result<TimeSeries> {
    if !(MIN_WINDOW..=MAX_WINDOW).contains(&window) {
        return Err(PipelineError::InvalidWindow(window));
    }
    let values: Vec<f64> = series.points.iter().map(|&(_, value)| value).collect();
    let points = series
        .points
        .iter()
        .enumerate()
        .map(|(i, &(date, _))| {
            let start = (i + 1).saturating_sub(window);
            (date, values[start..=i].iter().mean())
        })
        .collect();
    Ok(TimeSeries::new(series.label.clone(), points))
}

/// Day-over-day change of a smoothed series, dated at the later point.
/// Output length is input length - 1.
pub fn daily_shocks(smoothed: &TimeSeries) -> Result<ShockSeries> {
    if smoothed.len() < 2 {
        return Err(PipelineError::InsufficientData {
            needed: 2,
            got: smoothed.len(),
        });
    }
    let points = smoothed
        .points
        .windows(2)
        .map(|pair| (pair[1].0, pair[1].1 - pair[0].1))
        .collect();
    Ok(ShockSeries {
        label: smoothed.label.clone(),
        points,
    })
}

/// Whether a row belongs to the pre-computed EWMA stream some source files
/// carry alongside the quote rows (basis label `HIST`, a non-call/put marker
/// in the side column).
pub fn is_ewma(obs: &Observation) -> bool {
    obs.basis.eq_ignore_ascii_case("HIST") && obs.side == OptionSide::None
}

/// Build a TimeSeries from the EWMA stream only. Empty when the
/// observations carry no such rows.
pub fn ewma_series(observations: &[Observation], label: impl Into<String>) -> TimeSeries {
    let rows: Vec<Observation> = observations
        .iter()
        .filter(|obs| is_ewma(obs))
        .cloned()
        .collect();
    TimeSeries::daily_mean(label, &rows)
}
