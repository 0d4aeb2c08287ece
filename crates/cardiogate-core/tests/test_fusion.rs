use approx::assert_abs_diff_eq;

use cardiogate_core::error::GatingError;
use cardiogate_core::signal::fuse::{
    combined_signal, smooth_curve, spacing_variability, variability_weights,
};
use cardiogate_core::signal::peaks::PeakParams;
use cardiogate_core::signal::{ConditionedSignal, SignalKind};

fn peaks() -> PeakParams {
    PeakParams {
        min_height_percentile: 50.0,
        min_distance: 5,
    }
}

fn member(kind: SignalKind, period: f64, len: usize) -> ConditionedSignal {
    let filtered: Vec<f64> = (0..len)
        .map(|i| (2.0 * std::f64::consts::PI * i as f64 / period).cos())
        .collect();
    let normalized = filtered.iter().map(|v| (v + 1.0) / len as f64).collect();
    ConditionedSignal {
        kind,
        normalized,
        filtered,
    }
}

// ---------------------------------------------------------------------------
// Spacing variability
// ---------------------------------------------------------------------------

#[test]
fn test_spacing_variability_regular() {
    assert_eq!(spacing_variability(&[0, 10, 20, 30]), Some(0.0));
}

#[test]
fn test_spacing_variability_population_std() {
    let v = spacing_variability(&[0, 10, 25]).unwrap();
    assert_abs_diff_eq!(v, 2.5, epsilon = 1e-12);
}

#[test]
fn test_spacing_variability_needs_two_gaps() {
    assert_eq!(spacing_variability(&[0, 5]), None);
    assert_eq!(spacing_variability(&[]), None);
}

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

#[test]
fn test_weights_inverse_relative_variability() {
    let w = variability_weights(&[Some(1.0), Some(3.0)]);
    assert_abs_diff_eq!(w[0], 4.0, epsilon = 1e-12);
    assert_abs_diff_eq!(w[1], 4.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn test_weights_regular_member_outweighs_the_group() {
    let w = variability_weights(&[Some(0.0), Some(2.0), Some(6.0)]);
    assert_abs_diff_eq!(w[1], 4.0, epsilon = 1e-12);
    assert_abs_diff_eq!(w[2], 4.0 / 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(w[0], 8.0, epsilon = 1e-12);
    assert!(w.iter().all(|v| v.is_finite()));
}

#[test]
fn test_weights_regular_member_beats_single_irregular_one() {
    let w = variability_weights(&[Some(2.0), Some(0.0)]);
    assert_eq!(w, vec![1.0, 2.0]);
    assert!(w[1] > w[0]);
}

#[test]
fn test_weights_undefined_member_is_ignored() {
    assert_eq!(variability_weights(&[Some(2.0), None]), vec![1.0, 0.0]);
}

#[test]
fn test_weights_all_regular() {
    assert_eq!(variability_weights(&[Some(0.0), Some(0.0)]), vec![1.0, 1.0]);
    assert_eq!(variability_weights(&[Some(0.0), None]), vec![1.0, 0.0]);
}

#[test]
fn test_weights_all_undefined() {
    assert_eq!(variability_weights(&[None, None, None]), vec![1.0; 3]);
}

// ---------------------------------------------------------------------------
// Smoothing
// ---------------------------------------------------------------------------

#[test]
fn test_smooth_curve_window_one_is_identity() {
    let x = [1.0, 5.0, 2.0];
    assert_eq!(smooth_curve(&x, 1), x.to_vec());
}

#[test]
fn test_smooth_curve_constant_interior() {
    let s = smooth_curve(&[2.0; 10], 5);
    assert_eq!(s.len(), 10);
    for v in &s[2..8] {
        assert_abs_diff_eq!(*v, 2.0, epsilon = 1e-12);
    }
    // zero padding pulls the edges down
    assert!(s[0] < 2.0);
    assert!(s[9] < 2.0);
}

// ---------------------------------------------------------------------------
// Composite
// ---------------------------------------------------------------------------

#[test]
fn test_combined_signal_is_weighted_sum() {
    let members = vec![
        member(SignalKind::Correlation, 30.0, 120),
        member(SignalKind::Blur, 24.0, 120),
    ];
    let composite = combined_signal(&members, true, 5, &peaks()).unwrap();
    assert_eq!(composite.weights.len(), 2);
    assert_eq!(composite.filtered.len(), 120);
    assert_eq!(composite.unfiltered.len(), 120);

    for i in [0, 17, 64, 119] {
        let expected: f64 = members
            .iter()
            .zip(&composite.weights)
            .map(|(m, w)| w * m.filtered[i])
            .sum();
        assert_abs_diff_eq!(composite.filtered[i], expected, epsilon = 1e-9);
        let expected: f64 = members
            .iter()
            .zip(&composite.weights)
            .map(|(m, w)| w * m.normalized[i])
            .sum();
        assert_abs_diff_eq!(composite.unfiltered[i], expected, epsilon = 1e-9);
    }
}

#[test]
fn test_combined_signal_identical_members_weigh_equally() {
    let members = vec![
        member(SignalKind::ShortestDistance, 30.0, 120),
        member(SignalKind::VectorAngle, 30.0, 120),
    ];
    let composite = combined_signal(&members, false, 5, &peaks()).unwrap();
    assert!(composite.weights[0] > 0.0);
    assert_abs_diff_eq!(composite.weights[0], composite.weights[1], epsilon = 1e-12);
}

#[test]
fn test_combined_signal_empty_group() {
    let err = combined_signal(&[], true, 5, &peaks()).unwrap_err();
    assert!(matches!(err, GatingError::EmptySequence));
}

#[test]
fn test_combined_signal_length_mismatch() {
    let members = vec![
        member(SignalKind::Correlation, 30.0, 120),
        member(SignalKind::Blur, 30.0, 100),
    ];
    let err = combined_signal(&members, true, 5, &peaks()).unwrap_err();
    assert!(matches!(
        err,
        GatingError::DimensionMismatch {
            expected: 120,
            actual: 100
        }
    ));
}
