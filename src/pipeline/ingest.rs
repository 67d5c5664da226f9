use crate::error::{PipelineError, Result};
use crate::models::{Observation, OptionSide};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Column names accepted for the per-row date, in precedence order.
const DATE_COLUMNS: [&str; 2] = ["date", "Curve_Date"];

/// Date formats accepted in the date column.
const ROW_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y%m%d", "%m/%d/%Y"];

/// Files smaller than this are treated as empty and skipped when scanning.
const MIN_FILE_BYTES: u64 = 10;

/// One parsed source file: the date embedded in its name, the rows that
/// survived validation, and how many were dropped.
#[derive(Debug, Clone)]
pub struct CurveFile {
    pub source: String,
    pub file_date: NaiveDate,
    pub observations: Vec<Observation>,
    /// Rows dropped because `Mid` or the date cell failed coercion.
    pub dropped_rows: usize,
}

/// Result of scanning a directory tree for curve CSVs. Unreadable files are
/// reported, not fatal, so one bad upload cannot sink a whole batch.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub files: Vec<CurveFile>,
    pub failures: Vec<(PathBuf, PipelineError)>,
    /// Near-empty files skipped without parsing.
    pub skipped: usize,
}

/// Extract the 8-digit YYYYMMDD date embedded in a file name,
/// e.g. `20230115.csv` or `curves_20230115_final.csv`.
pub fn file_date(name: &str) -> Result<NaiveDate> {
    let bytes = name.as_bytes();
    for start in 0..bytes.len().saturating_sub(7) {
        if !bytes[start..start + 8].iter().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if let Ok(date) = NaiveDate::parse_from_str(&name[start..start + 8], "%Y%m%d") {
            return Ok(date);
        }
    }
    Err(PipelineError::MalformedFilename(name.to_string()))
}

fn clean_header(raw: &str) -> String {
    raw.trim().replace('\u{200b}', "")
}

fn parse_row_date(raw: &str) -> Option<NaiveDate> {
    // Timestamp cells like "2024-02-01 00:00:00" carry their date up front.
    let head = raw.split_whitespace().next()?;
    ROW_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(head, fmt).ok())
}

/// Parse raw CSV content from one source file.
///
/// The file name must embed a YYYYMMDD date and the header must carry
/// `Basis`, `Type`, `Call/Put`, `Mid` and a `date` or `Curve_Date` column;
/// either failure is fatal for the file. Individual rows whose `Mid` is not
/// a finite number or whose date cell does not parse are dropped and
/// counted, never fatal.
pub fn parse_csv<R: Read>(reader: R, source: &str) -> Result<CurveFile> {
    let file_date = file_date(source)?;

    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(clean_header).collect();

    let require = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PipelineError::MissingColumn {
                file: source.to_string(),
                column: name.to_string(),
            })
    };
    let curve_col = require("Basis")?;
    let basis_col = require("Type")?;
    let side_col = require("Call/Put")?;
    let mid_col = require("Mid")?;
    let date_col = DATE_COLUMNS
        .iter()
        .find_map(|name| headers.iter().position(|h| h == name))
        .ok_or_else(|| PipelineError::MissingColumn {
            file: source.to_string(),
            column: "date or Curve_Date".to_string(),
        })?;

    let mut observations = Vec::new();
    let mut dropped_rows = 0usize;
    for record in rdr.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let mid = match field(mid_col).parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                dropped_rows += 1;
                continue;
            }
        };
        let date = match parse_row_date(field(date_col)) {
            Some(date) => date,
            None => {
                dropped_rows += 1;
                continue;
            }
        };

        observations.push(Observation {
            date,
            curve: field(curve_col).to_string(),
            basis: field(basis_col).to_string(),
            side: OptionSide::parse(field(side_col)),
            mid,
        });
    }

    if dropped_rows > 0 {
        debug!(
            "{}: dropped {} rows failing Mid or date coercion",
            source, dropped_rows
        );
    }

    Ok(CurveFile {
        source: source.to_string(),
        file_date,
        observations,
        dropped_rows,
    })
}

/// Open and parse a single CSV file.
pub fn load_file(path: &Path) -> Result<CurveFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PipelineError::MalformedFilename(path.display().to_string()))?;
    let file = File::open(path)?;
    parse_csv(file, name)
}

/// Walk a directory tree and parse every `*.csv` found. Hidden files and
/// near-empty files are skipped; files that fail validation are collected as
/// failures so the caller can report them and continue.
pub fn load_dir(dir: &Path) -> Result<LoadOutcome> {
    let mut outcome = LoadOutcome::default();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            PipelineError::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "directory walk failed")
            }))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let name = entry.file_name().to_string_lossy();
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv || name.starts_with('.') {
            continue;
        }
        if entry.metadata().map(|m| m.len()).unwrap_or(0) < MIN_FILE_BYTES {
            warn!("skipping near-empty file: {}", path.display());
            outcome.skipped += 1;
            continue;
        }
        match load_file(path) {
            Ok(file) => outcome.files.push(file),
            Err(err) => {
                warn!("failed to read {}: {}", path.display(), err);
                outcome.failures.push((path.to_path_buf(), err));
            }
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_date_finds_embedded_date() {
        assert_eq!(
            file_date("20230115.csv").unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 15).unwrap()
        );
        assert_eq!(
            file_date("NYMEX_curves_20240229_v2.csv").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn file_date_rejects_missing_or_impossible_dates() {
        assert!(matches!(
            file_date("curves.csv"),
            Err(PipelineError::MalformedFilename(_))
        ));
        // 13th month: the digits are there but never form a date
        assert!(file_date("20231345.csv").is_err());
    }
}
