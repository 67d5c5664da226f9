use crate::error::{PipelineError, Result};
use chrono::NaiveDate;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Implied-volatility surface for one curve over one period (a calendar
/// month or a full year). The expiry axis is the curve dates observed in the
/// period; the moneyness axis is the distinct strike offsets. Cells with no
/// observation stay `NaN` and are never reported as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceGrid {
    pub curve: String,
    /// `YYYY-MM` for monthly grids, `YYYY` for yearly ones.
    pub period: String,
    pub expiries: Vec<NaiveDate>,
    pub moneyness: Vec<f64>,
    /// Implied volatility values (2D array: expiries x moneyness).
    pub values: Array2<f64>,
}

impl SurfaceGrid {
    /// Pivot rows of `(expiry, moneyness, mid)` into a grid. Duplicate
    /// (expiry, moneyness) keys keep the last value seen, in input order.
    pub fn from_observations(
        curve: impl Into<String>,
        period: impl Into<String>,
        rows: &[(NaiveDate, f64, f64)],
    ) -> Result<Self> {
        let curve = curve.into();
        let period = period.into();
        if rows.is_empty() {
            return Err(PipelineError::EmptySurface { curve, period });
        }

        let mut expiries: Vec<NaiveDate> = rows.iter().map(|&(date, _, _)| date).collect();
        expiries.sort();
        expiries.dedup();

        let mut moneyness: Vec<f64> = rows.iter().map(|&(_, m, _)| m).collect();
        moneyness.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        moneyness.dedup();

        let mut values = Array2::from_elem((expiries.len(), moneyness.len()), f64::NAN);
        for &(date, m, mid) in rows {
            let expiry_idx = expiries.iter().position(|&e| e == date);
            let money_idx = moneyness.iter().position(|&x| x == m);
            if let (Some(i), Some(j)) = (expiry_idx, money_idx) {
                values[[i, j]] = mid;
            }
        }

        Ok(Self {
            curve,
            period,
            expiries,
            moneyness,
            values,
        })
    }

    /// Value at an exact (expiry, moneyness) key, if that cell is populated.
    pub fn cell(&self, expiry: NaiveDate, moneyness: f64) -> Option<f64> {
        let i = self.expiries.iter().position(|&e| e == expiry)?;
        let j = self.moneyness.iter().position(|&m| m == moneyness)?;
        let value = self.values[[i, j]];
        if value.is_nan() {
            None
        } else {
            Some(value)
        }
    }

    pub fn populated_cells(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }
}
