use tracing::{debug, warn};

use crate::error::{GatingError, Result};
use crate::signal::peaks::{identify_extrema, PeakParams};
use crate::signal::ConditionedSignal;

/// Variability-weighted sum of a signal group.
#[derive(Clone, Debug, Default)]
pub struct CompositeSignal {
    /// Weighted sum of the band-passed members.
    pub filtered: Vec<f64>,
    /// Weighted sum of the normalized, unfiltered members.
    pub unfiltered: Vec<f64>,
    /// One weight per member, in input order.
    pub weights: Vec<f64>,
}

/// Centered moving average, zero-padded at both ends.
///
/// For an even window the extra sample is taken from the left, so output `i`
/// averages `x[i - w + 1 + (w - 1) / 2 ..= i + (w - 1) / 2]`.
pub fn smooth_curve(signal: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 {
        return signal.to_vec();
    }
    let n = signal.len() as isize;
    let ahead = ((window - 1) / 2) as isize;
    let behind = window as isize - 1 - ahead;

    (0..n)
        .map(|i| {
            let lo = (i - behind).max(0);
            let hi = (i + ahead).min(n - 1);
            let sum: f64 = (lo..=hi).map(|j| signal[j as usize]).sum();
            sum / window as f64
        })
        .collect()
}

/// Population standard deviation of the gaps between consecutive indices.
///
/// `None` with fewer than two gaps.
pub fn spacing_variability(indices: &[usize]) -> Option<f64> {
    if indices.len() < 3 {
        return None;
    }
    let gaps: Vec<f64> = indices.windows(2).map(|w| (w[1] - w[0]) as f64).collect();
    let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
    let var = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / gaps.len() as f64;
    Some(var.sqrt())
}

/// Inverse relative variability: `(v_i / sum(v))^-1`.
///
/// Zero variability takes twice the largest weight of the group, so a
/// perfectly regular member outweighs every irregular one; undefined
/// variability takes 0. Without any positive variability the zero-variability
/// members weigh 1 each, and a group of undefined members weighs 1 throughout.
pub fn variability_weights(variability: &[Option<f64>]) -> Vec<f64> {
    let total: f64 = variability.iter().flatten().sum();

    if total > 0.0 {
        let raw: Vec<Option<f64>> = variability
            .iter()
            .map(|v| v.filter(|&v| v > 0.0).map(|v| total / v))
            .collect();
        let regular_weight = 2.0 * raw.iter().flatten().copied().fold(0.0, f64::max);
        return variability
            .iter()
            .zip(raw)
            .map(|(v, w)| match (v, w) {
                (_, Some(w)) => w,
                (Some(_), None) => regular_weight,
                (None, _) => 0.0,
            })
            .collect();
    }

    if variability.iter().any(Option::is_some) {
        variability
            .iter()
            .map(|v| if v.is_some() { 1.0 } else { 0.0 })
            .collect()
    } else {
        vec![1.0; variability.len()]
    }
}

/// Combine a signal group into one composite.
///
/// Each member is smoothed, its extrema (maxima only when `maxima_only`)
/// located, and the spacing variability of those extrema turned into a
/// weight; regular members dominate the sum. The same weights combine the
/// normalized members into the unfiltered overlay.
pub fn combined_signal(
    members: &[ConditionedSignal],
    maxima_only: bool,
    window_size: usize,
    peaks: &PeakParams,
) -> Result<CompositeSignal> {
    let len = members.first().map(|m| m.len()).ok_or(GatingError::EmptySequence)?;
    if let Some(bad) = members.iter().find(|m| m.len() != len || m.normalized.len() != len) {
        return Err(GatingError::DimensionMismatch {
            expected: len,
            actual: bad.len().min(bad.normalized.len()),
        });
    }

    let variability: Vec<Option<f64>> = members
        .iter()
        .map(|m| {
            let smoothed = smooth_curve(&m.filtered, window_size);
            let extrema = identify_extrema(&smoothed, peaks);
            let indices = if maxima_only { extrema.maxima } else { extrema.all };
            let v = spacing_variability(&indices);
            if v.is_none() {
                warn!(signal = %m.kind, extrema = indices.len(), "too few extrema to measure spacing");
            } else if v == Some(0.0) {
                warn!(signal = %m.kind, "perfectly regular extrema, weight set to twice the group maximum");
            }
            v
        })
        .collect();

    let weights = variability_weights(&variability);
    debug!(?variability, ?weights, maxima_only, "composite weights");

    let mut filtered = vec![0.0; len];
    let mut unfiltered = vec![0.0; len];
    for (m, &w) in members.iter().zip(&weights) {
        for i in 0..len {
            filtered[i] += w * m.filtered[i];
            unfiltered[i] += w * m.normalized[i];
        }
    }

    Ok(CompositeSignal {
        filtered,
        unfiltered,
        weights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothing_matches_same_mode_convolution() {
        // convolve([1, 2, 3, 4], ones(3) / 3, "same")
        let s = smooth_curve(&[1.0, 2.0, 3.0, 4.0], 3);
        let expected = [1.0, 2.0, 3.0, 7.0 / 3.0];
        for (a, b) in s.iter().zip(expected) {
            assert!((a - b).abs() < 1e-12, "{a} vs {b}");
        }
        // even window: convolve([1, 2, 3, 4], ones(2) / 2, "same") = [0.5, 1.5, 2.5, 3.5]
        let s = smooth_curve(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(s, vec![0.5, 1.5, 2.5, 3.5]);
    }
}
