use tracing::warn;

use crate::consts::EPSILON;
use crate::error::{GatingError, Result};
use crate::signal::butterworth::{butter_bandpass, filtfilt, FilterCoefficients};
use crate::signal::{ConditionedSignal, RawSignal};

/// Band-pass parameters in Hz, plus the acquisition frame rate.
#[derive(Clone, Debug, PartialEq)]
pub struct BandPass {
    pub lowcut: f64,
    pub highcut: f64,
    pub order: usize,
    pub frame_rate: f64,
}

impl BandPass {
    /// Design the filter with cutoffs relative to `0.5 * frame_rate`.
    pub fn design(&self) -> Result<FilterCoefficients> {
        if !(self.frame_rate > 0.0) {
            return Err(GatingError::InvalidFilter(format!(
                "frame rate must be positive (got {})",
                self.frame_rate
            )));
        }
        let nyquist = 0.5 * self.frame_rate;
        butter_bandpass(self.order, self.lowcut / nyquist, self.highcut / nyquist)
    }

    /// Zero-phase band-pass of one signal.
    pub fn apply(&self, signal: &[f64]) -> Result<Vec<f64>> {
        filtfilt(&self.design()?, signal)
    }
}

/// Shift a signal to a zero minimum and scale it to unit sum.
///
/// Non-finite samples take the finite minimum, so they end up at 0. A
/// constant or empty signal has nothing to scale by and comes back as all
/// zeros.
pub fn normalize(signal: &[f64]) -> Vec<f64> {
    let min = signal
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::INFINITY, f64::min);
    if !min.is_finite() {
        return vec![0.0; signal.len()];
    }

    let shifted: Vec<f64> = signal
        .iter()
        .map(|&v| if v.is_finite() { v - min } else { 0.0 })
        .collect();
    let total: f64 = shifted.iter().sum();

    if !total.is_finite() || total.abs() < EPSILON {
        return vec![0.0; signal.len()];
    }
    shifted.into_iter().map(|v| v / total).collect()
}

/// Normalize and band-pass one raw signal.
pub fn condition(raw: &RawSignal, band: &BandPass) -> Result<ConditionedSignal> {
    if raw.values.is_empty() {
        return Err(GatingError::DegenerateSignal {
            kind: raw.kind,
            reason: "no samples".into(),
        });
    }

    let normalized = normalize(&raw.values);
    if normalized.iter().all(|&v| v == 0.0) {
        warn!(signal = %raw.kind, "constant signal, normalized to zeros");
    }
    let filtered = band.apply(&normalized)?;

    Ok(ConditionedSignal {
        kind: raw.kind,
        normalized,
        filtered,
    })
}
