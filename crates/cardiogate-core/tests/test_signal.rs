mod common;

use approx::assert_abs_diff_eq;
use ndarray::Array2;

use cardiogate_core::error::GatingError;
use cardiogate_core::frame::Frame;
use cardiogate_core::signal::butterworth::butter_bandpass;
use cardiogate_core::signal::condition::{condition, normalize, BandPass};
use cardiogate_core::signal::extract::{blur, blur_score, correlation, pearson};
use cardiogate_core::signal::peaks::{identify_extrema, PeakParams};
use cardiogate_core::signal::{RawSignal, SignalKind};

use common::{pulsing_frames, FRAME_RATE};

fn default_band() -> BandPass {
    BandPass {
        lowcut: 0.45,
        highcut: 1.8,
        order: 4,
        frame_rate: FRAME_RATE,
    }
}

fn default_peaks() -> PeakParams {
    PeakParams {
        min_height_percentile: 50.0,
        min_distance: 5,
    }
}

fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap()
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

#[test]
fn test_normalize_unit_sum_zero_minimum() {
    let n = normalize(&[3.0, 5.0, 7.0]);
    assert_abs_diff_eq!(n.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(n[0], 0.0);
    assert_abs_diff_eq!(n[1], 1.0 / 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(n[2], 2.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn test_normalize_constant_signal_is_zero() {
    assert_eq!(normalize(&[4.0; 6]), vec![0.0; 6]);
}

#[test]
fn test_normalize_empty_signal() {
    assert!(normalize(&[]).is_empty());
}

#[test]
fn test_normalize_replaces_nan_with_minimum() {
    let n = normalize(&[1.0, f64::NAN, 3.0]);
    assert_eq!(n, vec![0.0, 0.0, 1.0]);
}

#[test]
fn test_condition_rejects_empty_signal() {
    let raw = RawSignal {
        kind: SignalKind::Blur,
        values: Vec::new(),
    };
    let err = condition(&raw, &default_band()).unwrap_err();
    assert!(matches!(
        err,
        GatingError::DegenerateSignal {
            kind: SignalKind::Blur,
            ..
        }
    ));
}

// ---------------------------------------------------------------------------
// Band-pass filter
// ---------------------------------------------------------------------------

#[test]
fn test_bandpass_blocks_dc() {
    let coeffs = butter_bandpass(4, 0.03, 0.12).unwrap();
    assert_eq!(coeffs.b.len(), 9);
    assert_eq!(coeffs.a.len(), 9);
    assert_abs_diff_eq!(coeffs.a[0], 1.0, epsilon = 1e-12);
    let dc_gain = coeffs.b.iter().sum::<f64>() / coeffs.a.iter().sum::<f64>();
    assert!(dc_gain.abs() < 1e-6, "DC gain {dc_gain}");
}

#[test]
fn test_bandpass_rejects_invalid_cutoffs() {
    assert!(matches!(
        butter_bandpass(4, 0.2, 0.1),
        Err(GatingError::InvalidFilter(_))
    ));
    assert!(matches!(
        butter_bandpass(4, 0.1, 1.2),
        Err(GatingError::InvalidFilter(_))
    ));
    assert!(matches!(
        butter_bandpass(0, 0.1, 0.2),
        Err(GatingError::InvalidFilter(_))
    ));
}

#[test]
fn test_bandpass_keeps_length_and_peak_position() {
    let pulse: Vec<f64> = (0..120)
        .map(|i| (-((i as f64 - 60.0) / 4.0).powi(2) / 2.0).exp())
        .collect();
    let filtered = default_band().apply(&pulse).unwrap();
    assert_eq!(filtered.len(), pulse.len());
    let peak = argmax(&filtered);
    assert!((59..=61).contains(&peak), "peak moved to {peak}");
}

#[test]
fn test_bandpass_passes_heart_rate() {
    let wave: Vec<f64> = (0..300)
        .map(|i| (2.0 * std::f64::consts::PI * i as f64 / FRAME_RATE).sin())
        .collect();
    let filtered = default_band().apply(&wave).unwrap();
    let middle = &filtered[100..200];
    let amplitude = middle.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    assert!(
        (0.9..1.1).contains(&amplitude),
        "1 Hz amplitude after filtering: {amplitude}"
    );
}

#[test]
fn test_bandpass_short_signal_is_error() {
    let err = default_band().apply(&[0.0; 20]).unwrap_err();
    match err {
        GatingError::InsufficientSamples { len, required } => {
            assert_eq!(len, 20);
            assert_eq!(required, 27);
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_bandpass_rejects_zero_frame_rate() {
    let band = BandPass {
        frame_rate: 0.0,
        ..default_band()
    };
    assert!(matches!(band.design(), Err(GatingError::InvalidFilter(_))));
}

// ---------------------------------------------------------------------------
// Extrema
// ---------------------------------------------------------------------------

#[test]
fn test_extrema_of_cosine() {
    let signal: Vec<f64> = (0..120)
        .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 30.0).cos())
        .collect();
    let extrema = identify_extrema(&signal, &default_peaks());
    assert_eq!(extrema.maxima, vec![30, 60, 90]);
    assert_eq!(extrema.all, vec![15, 30, 45, 60, 75, 90, 105]);
}

#[test]
fn test_extrema_are_sorted_and_spaced() {
    let params = PeakParams {
        min_height_percentile: 40.0,
        min_distance: 7,
    };
    let signal: Vec<f64> = (0..200)
        .map(|i| {
            let t = i as f64;
            (t * 0.31).sin() + 0.6 * (t * 1.7).sin() + 0.3 * (t * 0.05).cos()
        })
        .collect();
    let extrema = identify_extrema(&signal, &params);
    assert!(!extrema.all.is_empty());
    for w in extrema.all.windows(2) {
        assert!(w[1] > w[0]);
        assert!(w[1] - w[0] >= params.min_distance, "{:?}", extrema.all);
    }
    for w in extrema.maxima.windows(2) {
        assert!(w[1] - w[0] >= params.min_distance);
    }
}

#[test]
fn test_extrema_of_short_signal_is_empty() {
    let extrema = identify_extrema(&[1.0, 2.0], &default_peaks());
    assert!(extrema.all.is_empty());
    assert!(extrema.maxima.is_empty());
}

// ---------------------------------------------------------------------------
// Image signals
// ---------------------------------------------------------------------------

#[test]
fn test_correlation_length_and_trailing_zero() {
    let frames = pulsing_frames(5, 12);
    let c = correlation(&frames);
    assert_eq!(c.len(), 5);
    assert_eq!(c[4], 0.0);
    for v in &c[..4] {
        assert!((-1.0..=1.0).contains(v));
    }
}

#[test]
fn test_correlation_of_identical_frames_is_one() {
    let frame = pulsing_frames(1, 12).remove(0);
    let frames = vec![frame.clone(), frame.clone(), frame];
    let c = correlation(&frames);
    assert_abs_diff_eq!(c[0], 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(c[1], 1.0, epsilon = 1e-9);
}

#[test]
fn test_correlation_empty() {
    assert!(correlation(&[]).is_empty());
}

#[test]
fn test_pearson_mismatched_shapes_is_nan() {
    let a = Array2::<f32>::zeros((4, 4));
    let b = Array2::<f32>::zeros((4, 5));
    assert!(pearson(&a, &b).is_nan());
}

fn textured(size: usize) -> Array2<f32> {
    Array2::from_shape_fn((size, size), |(r, c)| {
        ((r * 37 + c * 91 + r * c * 13) % 17) as f32 / 16.0
    })
}

/// 3x3 mean filter with wrap-around borders.
fn circular_box_blur(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    Array2::from_shape_fn((h, w), |(r, c)| {
        let mut sum = 0.0;
        for dr in [h - 1, 0, 1] {
            for dc in [w - 1, 0, 1] {
                sum += data[[(r + dr) % h, (c + dc) % w]];
            }
        }
        sum / 9.0
    })
}

#[test]
fn test_blur_score_prefers_sharp_frame() {
    let sharp = textured(32);
    let blurred = circular_box_blur(&sharp);
    let s = blur_score(&sharp);
    let b = blur_score(&blurred);
    assert!(s > b, "sharp {s} should exceed blurred {b}");
}

#[test]
fn test_blur_one_value_per_frame() {
    let frames: Vec<Frame> = pulsing_frames(6, 10);
    let values = blur(&frames);
    assert_eq!(values.len(), 6);
    assert!(values.iter().all(|v| v.is_finite() && *v > 0.0));
}

#[test]
fn test_blur_score_of_empty_frame() {
    assert_eq!(blur_score(&Array2::<f32>::zeros((0, 0))), 0.0);
}
