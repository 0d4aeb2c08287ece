mod common;

use approx::assert_abs_diff_eq;

use cardiogate_core::error::GatingError;
use cardiogate_core::gating::GatingInput;
use cardiogate_core::range::{format_frame_ranges, FrameRange};
use cardiogate_core::report::{suggest_intramural_range, ContourReport, ReportRow};

use common::{full_report, pulsing_frames, report_row, write_temp};

const HEADER: &str = "frame,elliptic_ratio,shortest_distance,vector_angle,vector_length,lumen_area";

fn with_elliptic_ratio(count: usize, f: impl Fn(usize) -> f64) -> ContourReport {
    ContourReport::from_rows((1..=count).map(|n| ReportRow {
        elliptic_ratio: f(n),
        ..report_row(n)
    }))
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

#[test]
fn test_load_csv_report() {
    let csv = format!(
        "{HEADER}\n1,0.5,1.2,3.0,0.4,7.5\n2,0.6,1.1,-2.0,0.5,7.1\n3,0.7,1.3,1.5,0.45,6.9\n"
    );
    let file = write_temp(&csv, ".csv");
    let report = ContourReport::load_csv(file.path()).unwrap();

    assert_eq!(report.len(), 3);
    let row = report.row(2).unwrap();
    assert_abs_diff_eq!(row.vector_angle, -2.0);
    assert_abs_diff_eq!(row.lumen_area, 7.1);
}

#[test]
fn test_load_csv_rejects_malformed_row() {
    let csv = format!("{HEADER}\n1,0.5,1.2,abc,0.4,7.5\n");
    let file = write_temp(&csv, ".csv");
    let err = ContourReport::load_csv(file.path()).unwrap_err();
    assert!(matches!(err, GatingError::Csv(_)));
}

#[test]
fn test_load_csv_missing_file() {
    let err = ContourReport::load_csv(std::path::Path::new("/nonexistent/report.csv"));
    assert!(err.is_err());
}

// ---------------------------------------------------------------------------
// Range selection
// ---------------------------------------------------------------------------

#[test]
fn test_select_reports_missing_frames() {
    let report =
        ContourReport::from_rows((1..=20).filter(|n| ![13, 14, 16].contains(n)).map(report_row));
    let err = report.select(&FrameRange::full(20)).unwrap_err();

    match &err {
        GatingError::MissingContourData { missing } => assert_eq!(missing, &vec![13, 14, 16]),
        other => panic!("unexpected error {other}"),
    }
    assert_eq!(err.to_string(), "Please add contours to frames 13-14, 16");
}

#[test]
fn test_select_inside_complete_part_succeeds() {
    let report =
        ContourReport::from_rows((1..=20).filter(|n| ![13, 14, 16].contains(n)).map(report_row));
    let selected = report.select(&FrameRange::new(2, 12, 20).unwrap()).unwrap();
    assert_eq!(selected.len(), 10);
    assert_eq!(selected.frame_numbers(), (3..=12).collect::<Vec<_>>());
    assert_abs_diff_eq!(
        selected.lumen_area_at(0).unwrap(),
        report_row(3).lumen_area
    );
    assert_eq!(selected.lumen_area_at(10), None);
}

#[test]
fn test_select_empty_report_is_no_input() {
    let err = ContourReport::default()
        .select(&FrameRange::full(5))
        .unwrap_err();
    assert!(matches!(err, GatingError::NoInputLoaded));
    assert_eq!(
        err.to_string(),
        "Please ensure that an input file was read and contours were drawn"
    );
}

#[test]
fn test_gating_input_requires_frames() {
    let err = GatingInput::select(&[], &full_report(10), FrameRange::full(10), 0.6).unwrap_err();
    assert!(matches!(err, GatingError::NoInputLoaded));
}

#[test]
fn test_gating_input_validates_range() {
    let frames = pulsing_frames(10, 8);
    let err = GatingInput::select(
        &frames,
        &full_report(10),
        FrameRange { lower: 5, upper: 12 },
        0.6,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        GatingError::InvalidFrameRange {
            lower: 5,
            upper: 12,
            total: 10
        }
    ));
}

#[test]
fn test_gating_input_aligns_frames_and_rows() {
    let frames = pulsing_frames(10, 8);
    let input = GatingInput::select(
        &frames,
        &full_report(10),
        FrameRange::new(4, 9, 10).unwrap(),
        0.6,
    )
    .unwrap();
    assert_eq!(input.frames.len(), 5);
    assert_eq!(input.frames.numbers(), &[5, 6, 7, 8, 9]);
    assert_eq!(input.report.frame_numbers(), vec![5, 6, 7, 8, 9]);
}

// ---------------------------------------------------------------------------
// Range notation
// ---------------------------------------------------------------------------

#[test]
fn test_format_frame_ranges() {
    assert_eq!(format_frame_ranges(&[13, 14, 16]), "13-14, 16");
    assert_eq!(format_frame_ranges(&[9, 3, 5, 4]), "3-5, 9");
    assert_eq!(format_frame_ranges(&[7]), "7");
    assert_eq!(format_frame_ranges(&[]), "");
}

#[test]
fn test_frame_range_numbers_are_one_based() {
    let range = FrameRange::new(0, 3, 10).unwrap();
    assert_eq!(range.numbers().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(range.contains_index(2));
    assert!(!range.contains_index(3));
    assert!(FrameRange::new(3, 3, 10).is_err());
}

// ---------------------------------------------------------------------------
// Intramural suggestion
// ---------------------------------------------------------------------------

#[test]
fn test_intramural_suggestion_finds_plateau() {
    let report = with_elliptic_ratio(30, |n| if (11..=25).contains(&n) { 0.9 } else { 0.1 });
    let range = suggest_intramural_range(&report, 0.55).unwrap();
    // The trailing window needs four plateau rows before its mean crosses
    // the threshold and keeps it for four rows past the plateau.
    assert_eq!(range, FrameRange { lower: 13, upper: 27 });
}

#[test]
fn test_intramural_suggestion_starts_at_first_full_window() {
    // Five rows already make a mean; it covers five rows, later ones six.
    let report = with_elliptic_ratio(8, |_| 0.9);
    let range = suggest_intramural_range(&report, 0.55).unwrap();
    assert_eq!(range, FrameRange { lower: 4, upper: 8 });
}

#[test]
fn test_intramural_suggestion_picks_longest_run() {
    let report = with_elliptic_ratio(60, |n| {
        if (5..=14).contains(&n) || (30..=55).contains(&n) {
            0.9
        } else {
            0.1
        }
    });
    let range = suggest_intramural_range(&report, 0.55).unwrap();
    assert!(range.lower >= 29 && range.upper <= 60, "{range:?}");
}

#[test]
fn test_intramural_suggestion_none_below_threshold() {
    let report = with_elliptic_ratio(30, |_| 0.2);
    assert_eq!(suggest_intramural_range(&report, 0.6), None);
}

#[test]
fn test_intramural_suggestion_short_report() {
    let report = with_elliptic_ratio(4, |_| 0.9);
    assert_eq!(suggest_intramural_range(&report, 0.6), None);
}
