pub mod butterworth;
pub mod condition;
pub mod extract;
pub mod fuse;
pub mod peaks;

use std::fmt;

use serde::{Deserialize, Serialize};

/// The five per-frame measurements feeding the gating engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    Correlation,
    Blur,
    ShortestDistance,
    VectorAngle,
    VectorLength,
}

impl SignalKind {
    pub const ALL: &[Self] = &[
        Self::Correlation,
        Self::Blur,
        Self::ShortestDistance,
        Self::VectorAngle,
        Self::VectorLength,
    ];

    /// Image-based group, combined by maxima spacing.
    pub const MAXIMA_GROUP: &[Self] = &[Self::Correlation, Self::Blur];

    /// Contour-based group, combined by extrema spacing.
    pub const EXTREMA_GROUP: &[Self] = &[
        Self::ShortestDistance,
        Self::VectorAngle,
        Self::VectorLength,
    ];
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correlation => write!(f, "correlation"),
            Self::Blur => write!(f, "blur"),
            Self::ShortestDistance => write!(f, "shortest distance"),
            Self::VectorAngle => write!(f, "vector angle"),
            Self::VectorLength => write!(f, "vector length"),
        }
    }
}

/// One raw measurement series, one value per frame.
#[derive(Clone, Debug)]
pub struct RawSignal {
    pub kind: SignalKind,
    pub values: Vec<f64>,
}

/// A raw signal after normalization and band-pass filtering.
#[derive(Clone, Debug)]
pub struct ConditionedSignal {
    pub kind: SignalKind,
    /// Normalized, unfiltered values.
    pub normalized: Vec<f64>,
    /// Normalized and band-pass filtered values.
    pub filtered: Vec<f64>,
}

impl ConditionedSignal {
    pub fn len(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }
}

/// Mean of a slice; 0.0 for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
