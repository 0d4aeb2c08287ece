use tracing::debug;

use crate::consts::EPSILON;
use crate::signal::fuse::CompositeSignal;
use crate::signal::{mean, min_max};

/// Bring the contour-based composite to the image-based composite's scale.
///
/// `factor_diff = mean(maxima) / mean(extrema)`; the extrema curve is
/// multiplied by it, which scales it up when its mean is the smaller one and
/// down otherwise. Returns the factor, or `None` when either mean is zero or
/// not finite (both curves are then left untouched).
pub fn align_amplitudes(maxima: &mut [f64], extrema: &mut [f64]) -> Option<f64> {
    let mean_max = mean(maxima);
    let mean_ext = mean(extrema);
    let factor_diff = mean_max / mean_ext;
    if !factor_diff.is_finite() || mean_ext.abs() < EPSILON || mean_max.abs() < EPSILON {
        debug!(mean_max, mean_ext, "composite means degenerate, no amplitude alignment");
        return None;
    }

    extrema.iter_mut().for_each(|v| *v *= factor_diff);
    debug!(factor_diff, "aligned composite amplitudes");
    Some(factor_diff)
}

/// Fit the two unfiltered overlays under the filtered curves.
///
/// Both overlays share one scale that maps their joint range onto the joint
/// range of the filtered curves; each is then shifted so its maximum sits on
/// the filtered minimum. Presentation only.
pub fn fit_overlays(
    maxima_filtered: &[f64],
    extrema_filtered: &[f64],
    maxima_unfiltered: &mut [f64],
    extrema_unfiltered: &mut [f64],
) {
    let (lo_a, hi_a) = min_max(maxima_filtered);
    let (lo_b, hi_b) = min_max(extrema_filtered);
    let (min_range, max_range) = (lo_a.min(lo_b), hi_a.max(hi_b));

    let (lo_c, hi_c) = min_max(maxima_unfiltered);
    let (lo_d, hi_d) = min_max(extrema_unfiltered);
    let (min_nor, max_nor) = (lo_c.min(lo_d), hi_c.max(hi_d));

    let span_nor = max_nor - min_nor;
    let scale = if span_nor.is_finite() && span_nor > EPSILON {
        (max_range - min_range) / span_nor
    } else {
        1.0
    };
    if !scale.is_finite() || !min_range.is_finite() {
        return;
    }

    for overlay in [maxima_unfiltered, extrema_unfiltered] {
        overlay.iter_mut().for_each(|v| *v = (*v - min_nor) * scale);
        let (_, top) = min_max(overlay);
        let shift = min_range - top;
        overlay.iter_mut().for_each(|v| *v += shift);
    }
}

/// Composite curves after amplitude alignment, ready for plotting and gating.
#[derive(Clone, Debug, Default)]
pub struct ScaledTraces {
    pub maxima: CompositeSignal,
    pub extrema: CompositeSignal,
    pub factor_diff: Option<f64>,
}

impl ScaledTraces {
    pub fn new(mut maxima: CompositeSignal, mut extrema: CompositeSignal) -> Self {
        let factor_diff = align_amplitudes(&mut maxima.filtered, &mut extrema.filtered);
        fit_overlays(
            &maxima.filtered,
            &extrema.filtered,
            &mut maxima.unfiltered,
            &mut extrema.unfiltered,
        );
        Self {
            maxima,
            extrema,
            factor_diff,
        }
    }
}
