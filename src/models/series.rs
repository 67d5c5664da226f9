use crate::models::Observation;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Date-ordered series of values for one label. Dates are strictly
/// increasing with no duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub label: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl TimeSeries {
    pub fn new(label: impl Into<String>, points: Vec<(NaiveDate, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    /// Collapse observations to one point per date by averaging all mids
    /// sharing that date. Output is sorted by date.
    pub fn daily_mean(label: impl Into<String>, observations: &[Observation]) -> Self {
        let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for obs in observations {
            let entry = buckets.entry(obs.date).or_insert((0.0, 0));
            entry.0 += obs.mid;
            entry.1 += 1;
        }
        let points = buckets
            .into_iter()
            .map(|(date, (sum, count))| (date, sum / count as f64))
            .collect();
        Self::new(label, points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Day-over-day differences of a smoothed series, dated at the later point.
/// Always one element shorter than the series it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShockSeries {
    pub label: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl ShockSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
