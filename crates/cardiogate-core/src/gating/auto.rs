use tracing::{debug, info};

use crate::gating::config::PeakMode;
use crate::gating::session::GatingSession;
use crate::report::RangeReport;
use crate::signal::peaks::{identify_extrema, PeakParams};

/// Result of automatic gating, in absolute 0-based frame indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AutoGating {
    pub diastole: Vec<usize>,
    pub systole: Vec<usize>,
}

/// Pair image-based peaks with contour-based peaks.
///
/// Each maxima peak takes the first remaining extrema peak (in list order,
/// not the nearest) within `threshold` frames; the rounded mean of the two
/// positions is gated and the extrema peak is consumed.
pub fn match_peaks(maxima_peaks: &[usize], extrema_peaks: &[usize], threshold: usize) -> Vec<usize> {
    let mut remaining = extrema_peaks.to_vec();
    let mut gated = Vec::new();

    for &m in maxima_peaks {
        if let Some(pos) = remaining.iter().position(|&e| m.abs_diff(e) <= threshold) {
            let e = remaining.remove(pos);
            gated.push(((m + e) as f64 / 2.0).round_ties_even() as usize);
        }
    }
    gated
}

/// Split alternating gated positions into two halves and label the half with
/// the larger lumen area sum as diastole.
///
/// Returns `(diastole, systole)` positions.
pub fn classify_by_lumen_area(
    gated: &[usize],
    lumen_area_at: impl Fn(usize) -> f64,
) -> (Vec<usize>, Vec<usize>) {
    let first: Vec<usize> = gated.iter().step_by(2).copied().collect();
    let second: Vec<usize> = gated.iter().skip(1).step_by(2).copied().collect();

    let sum_first: f64 = first.iter().map(|&p| lumen_area_at(p)).sum();
    let sum_second: f64 = second.iter().map(|&p| lumen_area_at(p)).sum();
    debug!(sum_first, sum_second, "lumen area per half");

    if sum_first > sum_second {
        (first, second)
    } else {
        (second, first)
    }
}

/// Gate the active range from the two composite curves.
///
/// Positions are indices into the curves, which cover `report.range()`; the
/// result is shifted to absolute frame indices.
pub fn automatic_gating(
    maxima_signal: &[f64],
    extrema_signal: &[f64],
    report: &RangeReport,
    mode: PeakMode,
    peaks: &PeakParams,
    threshold: usize,
) -> AutoGating {
    info!("{mode} peak detection according to config");
    let maxima_extrema = identify_extrema(maxima_signal, peaks);
    let maxima_peaks = match mode {
        PeakMode::AllExtrema => maxima_extrema.all,
        PeakMode::MaximaOnly => maxima_extrema.maxima,
    };
    let extrema_peaks = identify_extrema(extrema_signal, peaks).all;

    let gated = match_peaks(&maxima_peaks, &extrema_peaks, threshold);
    debug!(
        maxima = maxima_peaks.len(),
        extrema = extrema_peaks.len(),
        gated = gated.len(),
        "matched peaks"
    );

    let (dia, sys) = classify_by_lumen_area(&gated, |p| report.lumen_area_at(p).unwrap_or(0.0));
    let offset = report.range().lower;
    AutoGating {
        diastole: dia.into_iter().map(|p| p + offset).collect(),
        systole: sys.into_iter().map(|p| p + offset).collect(),
    }
}

/// Store an automatic result unless the session already holds manual gating.
///
/// Returns whether the session was written.
pub fn apply_if_unset(session: &mut GatingSession, result: &AutoGating) -> bool {
    if !session.is_empty() {
        debug!("existing gating kept, automatic result discarded");
        return false;
    }
    session.assign(&result.diastole, &result.systole);
    info!(
        diastole = result.diastole.len(),
        systole = result.systole.len(),
        "automatic gating applied"
    );
    true
}
