use chrono::NaiveDate;
use std::io::Cursor;
use volpipe_rs::models::{Observation, OptionSide};
use volpipe_rs::pipeline::{self, parse_csv, CurveFile, FilterCriteria};
use volpipe_rs::utils::{write_surface_csv, write_time_series_csv};
use volpipe_rs::PipelineError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn parse(content: &str, name: &str) -> volpipe_rs::Result<CurveFile> {
    parse_csv(Cursor::new(content.as_bytes().to_vec()), name)
}

#[test]
fn filename_without_a_date_is_fatal() {
    let err = parse("Basis,Type,Call/Put,Mid,Curve_Date\n", "curves.csv").unwrap_err();
    assert!(matches!(err, PipelineError::MalformedFilename(_)));
}

#[test]
fn missing_columns_name_the_file_and_column() {
    let err = parse("Basis,Type,Mid,Curve_Date\nNYMEX,ATM,1.0,2023-01-15\n", "20230115.csv")
        .unwrap_err();
    match err {
        PipelineError::MissingColumn { file, column } => {
            assert_eq!(file, "20230115.csv");
            assert_eq!(column, "Call/Put");
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }

    let err = parse("Basis,Type,Call/Put,Mid\nNYMEX,ATM,Call,1.0\n", "20230115.csv").unwrap_err();
    assert!(matches!(err, PipelineError::MissingColumn { .. }));
}

#[test]
fn bad_rows_are_dropped_and_counted() {
    let content = "\
Basis,Type,Call/Put,Mid,Curve_Date
NYMEX,ATM,Call,12.5,2023-01-15
NYMEX,ATM,Call,not-a-number,2023-01-15
NYMEX,ATM,Call,NaN,2023-01-15
NYMEX,ATM,Call,13.5,not-a-date
NYMEX,ATM + $0.50,Call,14.5,2023-01-16
";
    let file = parse(content, "20230115.csv").unwrap();
    assert_eq!(file.observations.len(), 2);
    assert_eq!(file.dropped_rows, 3);
    assert_eq!(file.file_date, date(2023, 1, 15));
}

#[test]
fn headers_are_cleaned_and_date_column_takes_precedence() {
    // zero-width space and padding in the header, plus both date columns
    let content =
        "Basis , \u{200b}Type,Call/Put,Mid,date,Curve_Date\nNYMEX,ATM,Call,12.5,2023-02-01,2023-01-15\n";
    let file = parse(content, "20230115.csv").unwrap();
    assert_eq!(file.observations.len(), 1);
    assert_eq!(file.observations[0].date, date(2023, 2, 1));
}

#[test]
fn example_scenario_single_row_roundtrip() {
    let content = "Basis,Type,Call/Put,Mid,Curve_Date\nNYMEX,Monthly,Call,12.5,2023-01-15\n";
    let file = parse(content, "20230115.csv").unwrap();
    assert_eq!(file.observations.len(), 1);

    let criteria = FilterCriteria::new("NYMEX", 2023, None, None).unwrap();
    let tables = pipeline::run(&[file.clone()], &criteria, 5).unwrap();

    // the single row survives the filter and reaches the series
    assert_eq!(tables.series.len(), 1);
    assert!((tables.series.points[0].1 - 12.5).abs() < 1e-12);
    assert!(tables.shocks.is_none(), "one point cannot be differenced");

    // the mapper sends the call to a positive moneyness offset
    let offset = pipeline::moneyness(&file.observations[0]).unwrap();
    assert!(offset > 0.0);

    // and the surface places it at the cell for its derived expiry
    assert_eq!(tables.monthly_surfaces.len(), 1);
    let grid = &tables.monthly_surfaces[0];
    assert_eq!(grid.period, "2023-01");
    assert_eq!(grid.cell(date(2023, 1, 15), offset), Some(12.5));
}

#[test]
fn empty_filter_result_flows_through_without_errors() {
    let content = "Basis,Type,Call/Put,Mid,Curve_Date\nNYMEX,ATM,Call,12.5,2023-01-15\n";
    let file = parse(content, "20230115.csv").unwrap();

    // AECO never appears in the data
    let criteria = FilterCriteria::new("AECO", 2023, None, None).unwrap();
    let tables = pipeline::run(&[file], &criteria, 21).unwrap();

    assert!(tables.monthly_surfaces.is_empty());
    assert!(tables.yearly_surface.is_none());
    assert!(tables.series.is_empty());
    assert!(tables.smoothed.is_empty());
    assert!(tables.shocks.is_none());
}

#[test]
fn one_bad_month_does_not_abort_the_others() {
    let obs = |d: NaiveDate, basis: &str, side: OptionSide, mid: f64| Observation {
        date: d,
        curve: "NYMEX".to_string(),
        basis: basis.to_string(),
        side,
        mid,
    };
    let file = CurveFile {
        source: "20240110.csv".to_string(),
        file_date: date(2024, 1, 10),
        observations: vec![
            obs(date(2024, 1, 10), "ATM", OptionSide::Call, 10.0),
            obs(date(2024, 1, 11), "ATM + $0.50", OptionSide::Call, 11.0),
            // February's only row has no side and no parseable offset
            obs(date(2024, 2, 10), "Weird", OptionSide::None, 12.0),
        ],
        dropped_rows: 0,
    };
    let criteria = FilterCriteria::new("NYMEX", 2024, None, None).unwrap();

    let tables = pipeline::run(&[file], &criteria, 5).unwrap();

    let periods: Vec<&str> = tables
        .monthly_surfaces
        .iter()
        .map(|g| g.period.as_str())
        .collect();
    assert_eq!(periods, vec!["2024-01"], "February is skipped, not fatal");
    assert!(
        tables.yearly_surface.is_none(),
        "the yearly grid sees the bad row and is skipped too"
    );
    assert_eq!(tables.series.len(), 3, "the series still covers all dates");
}

#[test]
fn ewma_stream_takes_over_the_series_when_present() {
    let obs = |d: NaiveDate, basis: &str, side: OptionSide, mid: f64| Observation {
        date: d,
        curve: "NYMEX".to_string(),
        basis: basis.to_string(),
        side,
        mid,
    };
    let file = CurveFile {
        source: "20240110.csv".to_string(),
        file_date: date(2024, 1, 10),
        observations: vec![
            obs(date(2024, 1, 10), "ATM", OptionSide::Call, 10.0),
            obs(date(2024, 1, 10), "HIST", OptionSide::None, 0.40),
            obs(date(2024, 1, 11), "HIST", OptionSide::None, 0.42),
        ],
        dropped_rows: 0,
    };
    let criteria = FilterCriteria::new("NYMEX", 2024, None, None).unwrap();

    let tables = pipeline::run(&[file], &criteria, 5).unwrap();

    assert_eq!(tables.series.len(), 2);
    assert!((tables.series.points[0].1 - 0.40).abs() < 1e-12);
    // the quote row still builds the surface
    assert_eq!(tables.monthly_surfaces.len(), 1);
    assert_eq!(tables.monthly_surfaces[0].populated_cells(), 1);
}

#[test]
fn load_dir_isolates_bad_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("20240110.csv"),
        "Basis,Type,Call/Put,Mid,Curve_Date\nNYMEX,ATM,Call,12.5,2024-01-10\n",
    )
    .unwrap();
    // too small to be worth parsing
    std::fs::write(dir.path().join("20240111.csv"), "x\n").unwrap();
    // readable but schema-invalid
    std::fs::write(
        dir.path().join("20240112.csv"),
        "Foo,Bar\n1,2\n3,4\n5,6\n7,8\n",
    )
    .unwrap();
    // not a csv at all
    std::fs::write(dir.path().join("notes.txt"), "hello hello hello\n").unwrap();

    let outcome = pipeline::load_dir(dir.path()).unwrap();

    assert_eq!(outcome.files.len(), 1);
    assert_eq!(outcome.files[0].observations.len(), 1);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.failures.len(), 1);
    assert!(matches!(
        outcome.failures[0].1,
        PipelineError::MissingColumn { .. }
    ));
}

#[test]
fn surface_export_leaves_missing_cells_blank() {
    let rows = vec![
        (date(2024, 1, 10), 0.0, 12.0),
        (date(2024, 1, 11), 0.5, 14.0),
    ];
    let grid =
        volpipe_rs::models::SurfaceGrid::from_observations("NYMEX", "2024-01", &rows).unwrap();

    let mut buf = Vec::new();
    write_surface_csv(&grid, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "date,0.00,0.50");
    assert_eq!(lines[1], "2024-01-10,12,");
    assert_eq!(lines[2], "2024-01-11,,14");
}

#[test]
fn time_series_export_aligns_shocks_one_row_late() {
    let obs = |d: NaiveDate, mid: f64| Observation {
        date: d,
        curve: "NYMEX".to_string(),
        basis: "ATM".to_string(),
        side: OptionSide::Call,
        mid,
    };
    let rows: Vec<Observation> = (1..=6)
        .map(|day| obs(date(2024, 1, day), day as f64))
        .collect();
    let series = volpipe_rs::models::TimeSeries::daily_mean("NYMEX mid", &rows);
    let smoothed = pipeline::rolling_mean(&series, 5).unwrap();
    let shocks = pipeline::daily_shocks(&smoothed).unwrap();

    let mut buf = Vec::new();
    write_time_series_csv(&series, &smoothed, Some(&shocks), &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "date,mid,rolling,daily_change");
    assert!(
        lines[1].ends_with(','),
        "first row has no shock: {}",
        lines[1]
    );
    assert_eq!(lines.len(), 1 + series.len());
}
