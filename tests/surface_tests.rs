use chrono::NaiveDate;
use volpipe_rs::models::SurfaceGrid;
use volpipe_rs::PipelineError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn one_cell_per_distinct_key() {
    let rows = vec![
        (date(2024, 1, 10), -0.5, 11.0),
        (date(2024, 1, 10), 0.0, 12.0),
        (date(2024, 1, 11), 0.0, 13.0),
        (date(2024, 1, 11), 0.5, 14.0),
    ];

    let grid = SurfaceGrid::from_observations("NYMEX", "2024-01", &rows).unwrap();

    assert_eq!(grid.expiries, vec![date(2024, 1, 10), date(2024, 1, 11)]);
    assert_eq!(grid.moneyness, vec![-0.5, 0.0, 0.5]);
    assert_eq!(
        grid.populated_cells(),
        4,
        "exactly one cell per distinct key"
    );
    assert_eq!(grid.cell(date(2024, 1, 10), -0.5), Some(11.0));
    assert_eq!(grid.cell(date(2024, 1, 10), 0.0), Some(12.0));
    assert_eq!(grid.cell(date(2024, 1, 11), 0.0), Some(13.0));
    assert_eq!(grid.cell(date(2024, 1, 11), 0.5), Some(14.0));
}

#[test]
fn unpopulated_cells_are_absent_not_zero() {
    let rows = vec![
        (date(2024, 1, 10), 0.0, 12.0),
        (date(2024, 1, 11), 0.5, 14.0),
    ];

    let grid = SurfaceGrid::from_observations("NYMEX", "2024-01", &rows).unwrap();

    // the grid is rectangular, but the off-diagonal keys were never observed
    assert_eq!(grid.cell(date(2024, 1, 10), 0.5), None);
    assert_eq!(grid.cell(date(2024, 1, 11), 0.0), None);
    assert_eq!(grid.populated_cells(), 2);
}

#[test]
fn duplicate_keys_keep_the_last_value() {
    let rows = vec![
        (date(2024, 1, 10), 0.0, 12.0),
        (date(2024, 1, 10), 0.0, 99.0),
    ];

    let grid = SurfaceGrid::from_observations("NYMEX", "2024-01", &rows).unwrap();

    assert_eq!(grid.populated_cells(), 1);
    assert_eq!(grid.cell(date(2024, 1, 10), 0.0), Some(99.0));
}

#[test]
fn empty_input_is_reported_not_returned() {
    let err = SurfaceGrid::from_observations("NYMEX", "2024-01", &[]).unwrap_err();
    match err {
        PipelineError::EmptySurface { curve, period } => {
            assert_eq!(curve, "NYMEX");
            assert_eq!(period, "2024-01");
        }
        other => panic!("expected EmptySurface, got {other:?}"),
    }
}
