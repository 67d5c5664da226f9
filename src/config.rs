use crate::error::{PipelineError, Result};
use crate::pipeline::FilterCriteria;
use chrono::NaiveDate;
use dotenv::dotenv;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Rolling window applied when `VOLPIPE_WINDOW` is not set.
pub const DEFAULT_WINDOW: usize = 21;

/// Configuration for one pipeline run, read from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory tree holding the source CSV files
    pub input_dir: PathBuf,
    /// Directory the derived tables and charts are written to
    pub output_dir: PathBuf,
    /// Curve name, one of the known curves
    pub curve: String,
    /// Year to filter on
    pub year: i32,
    /// Optional month (1-12)
    pub month: Option<u32>,
    /// Optional inclusive date range, both ends or neither
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Rolling window in days
    pub window: usize,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let require = |name: &str| {
            env::var(name).map_err(|_| {
                PipelineError::Config(format!("{} environment variable not set", name))
            })
        };

        let input_dir = PathBuf::from(require("VOLPIPE_INPUT_DIR")?);
        let output_dir = env::var("VOLPIPE_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("volpipe_out"));
        let curve = require("VOLPIPE_CURVE")?;
        let year = require("VOLPIPE_YEAR")?
            .parse::<i32>()
            .map_err(|_| PipelineError::Config("VOLPIPE_YEAR must be an integer".to_string()))?;

        let month = match env::var("VOLPIPE_MONTH") {
            Ok(raw) => Some(raw.parse::<u32>().map_err(|_| {
                PipelineError::Config("VOLPIPE_MONTH must be an integer".to_string())
            })?),
            Err(_) => None,
        };

        let parse_date = |name: &str| -> Result<Option<NaiveDate>> {
            match env::var(name) {
                Ok(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map(Some)
                    .map_err(|_| PipelineError::Config(format!("{} must be YYYY-MM-DD", name))),
                Err(_) => Ok(None),
            }
        };
        let start_date = parse_date("VOLPIPE_START_DATE")?;
        let end_date = parse_date("VOLPIPE_END_DATE")?;

        let window = match env::var("VOLPIPE_WINDOW") {
            Ok(raw) => raw.parse::<usize>().map_err(|_| {
                PipelineError::Config("VOLPIPE_WINDOW must be an integer".to_string())
            })?,
            Err(_) => DEFAULT_WINDOW,
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            input_dir,
            output_dir,
            curve,
            year,
            month,
            start_date,
            end_date,
            window,
            log_level,
        })
    }

    /// Build the validated filter criteria for this run.
    pub fn criteria(&self) -> Result<FilterCriteria> {
        let range = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            (None, None) => None,
            _ => {
                return Err(PipelineError::Config(
                    "VOLPIPE_START_DATE and VOLPIPE_END_DATE must be set together".to_string(),
                ))
            }
        };
        FilterCriteria::new(self.curve.clone(), self.year, self.month, range)
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        fmt().with_env_filter(filter).with_target(true).init();

        Ok(())
    }
}
