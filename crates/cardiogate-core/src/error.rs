use thiserror::Error;

use crate::range::format_frame_ranges;
use crate::signal::SignalKind;

#[derive(Error, Debug)]
pub enum GatingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report table error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Please ensure that an input file was read and contours were drawn")]
    NoInputLoaded,

    #[error("Please add contours to frames {}", format_frame_ranges(.missing))]
    MissingContourData { missing: Vec<usize> },

    #[error("Degenerate {kind} signal: {reason}")]
    DegenerateSignal { kind: SignalKind, reason: String },

    #[error("Signal of length {len} is too short for the band-pass filter (needs more than {required} samples)")]
    InsufficientSamples { len: usize, required: usize },

    #[error("Invalid band-pass filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid frame range {lower}..{upper} (total: {total})")]
    InvalidFrameRange {
        lower: usize,
        upper: usize,
        total: usize,
    },

    #[error("Length mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty frame sequence")]
    EmptySequence,
}

pub type Result<T> = std::result::Result<T, GatingError>;
