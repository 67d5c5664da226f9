use chrono::NaiveDate;
use thiserror::Error;

/// Custom error types for the volpipe-rs library
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No 8-digit YYYYMMDD date in file name: {0}")]
    MalformedFilename(String),

    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    #[error("Cannot map row to moneyness: basis '{basis}', side {side}")]
    UnmappableRow { basis: String, side: String },

    #[error("Rolling window {0} outside supported range 5..=60")]
    InvalidWindow(usize),

    #[error("Insufficient data: {needed} points required, {got} available")]
    InsufficientData { needed: usize, got: usize },

    #[error("Unknown curve name: {0}")]
    UnknownCurve(String),

    #[error("Month {0} outside 1..=12")]
    InvalidMonth(u32),

    #[error("Date range start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Surface for {curve} {period} has no populated cells")]
    EmptySurface { curve: String, period: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Plot error: {0}")]
    Plot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serde error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
