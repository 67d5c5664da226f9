use crate::error::{PipelineError, Result};
use crate::models::{is_known_curve, Observation};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Row-selection parameters for one filtering pass. Construction validates
/// everything so the filter itself cannot fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub curve: String,
    pub year: i32,
    pub month: Option<u32>,
    /// Inclusive date range.
    pub range: Option<(NaiveDate, NaiveDate)>,
}

impl FilterCriteria {
    pub fn new(
        curve: impl Into<String>,
        year: i32,
        month: Option<u32>,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Self> {
        let curve = curve.into();
        if !is_known_curve(&curve) {
            return Err(PipelineError::UnknownCurve(curve));
        }
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(PipelineError::InvalidMonth(m));
            }
        }
        if let Some((start, end)) = range {
            if start > end {
                return Err(PipelineError::InvalidDateRange { start, end });
            }
        }
        Ok(Self {
            curve,
            year,
            month,
            range,
        })
    }

    /// Curve name matches exactly (case-sensitive), the date's year matches,
    /// the month matches when one is set, and the date falls inside the
    /// inclusive range when one is set.
    pub fn matches(&self, obs: &Observation) -> bool {
        obs.curve == self.curve
            && obs.date.year() == self.year
            && self.month.map_or(true, |m| obs.date.month() == m)
            && self
                .range
                .map_or(true, |(start, end)| obs.date >= start && obs.date <= end)
    }
}

/// Order-preserving subset of `observations` matching `criteria`. No match
/// yields an empty vector, not an error.
pub fn filter_observations(
    observations: &[Observation],
    criteria: &FilterCriteria,
) -> Vec<Observation> {
    observations
        .iter()
        .filter(|obs| criteria.matches(obs))
        .cloned()
        .collect()
}
