#![allow(dead_code)]

use std::f64::consts::PI;
use std::io::Write;

use ndarray::Array2;

use cardiogate_core::frame::Frame;
use cardiogate_core::report::{ContourReport, ReportRow};

/// Synthetic pullback frame rate.
pub const FRAME_RATE: f64 = 30.0;

/// Heart rate of the synthetic acquisition (Hz).
pub const HEART_RATE: f64 = 1.0;

/// Cyclic phase of frame `i` in radians.
pub fn cardiac_phase(i: usize) -> f64 {
    2.0 * PI * HEART_RATE * i as f64 / FRAME_RATE
}

/// Textured frame whose pattern shifts and fades with the cardiac cycle.
pub fn pulsing_frame(i: usize, size: usize) -> Frame {
    let shift = 0.8 * cardiac_phase(i).sin();
    let amplitude = 0.35 * (1.0 + 0.3 * cardiac_phase(i).cos());
    let mut data = Array2::<f32>::zeros((size, size));
    for row in 0..size {
        for col in 0..size {
            let v = 0.5 + amplitude * (0.7 * row as f64 + 0.5 * col as f64 + shift).sin();
            data[[row, col]] = v as f32;
        }
    }
    Frame::new(data, 8)
}

pub fn pulsing_frames(count: usize, size: usize) -> Vec<Frame> {
    (0..count).map(|i| pulsing_frame(i, size)).collect()
}

/// Report row for frame number `frame` (1-based) following the cardiac cycle.
pub fn report_row(frame: usize) -> ReportRow {
    let phase = cardiac_phase(frame - 1);
    ReportRow {
        frame,
        elliptic_ratio: 0.3,
        shortest_distance: 1.5 + 0.2 * phase.cos(),
        vector_angle: 10.0 * phase.sin(),
        vector_length: 0.4 + 0.1 * (phase + 0.5).cos(),
        lumen_area: 7.0 + 1.5 * phase.cos(),
    }
}

/// Report with one row per frame number `1..=count`.
pub fn full_report(count: usize) -> ContourReport {
    ContourReport::from_rows((1..=count).map(report_row))
}

/// Write text to a temporary file, kept alive by the returned handle.
pub fn write_temp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    f.write_all(contents.as_bytes()).expect("write temp file");
    f.flush().expect("flush");
    f
}
