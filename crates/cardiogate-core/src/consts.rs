/// Minimum frame count to use frame-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Fraction of the largest FFT magnitudes averaged into the blur score.
pub const BLUR_TOP_FRACTION: f64 = 0.1;

/// Default crop applied to every frame before signal extraction: rows and
/// columns `50..450`, which removes the catheter ring and the image border of
/// a standard 512x512 intravascular frame.
pub const DEFAULT_CROP_START: usize = 50;
pub const DEFAULT_CROP_END: usize = 450;

/// Marker selection sensitivity, as a fraction of the plotted frame count.
pub const MARKER_SELECT_FRACTION: f64 = 0.01;

/// Rolling window (frames) for the elliptic ratio used by the intramural
/// range suggestion.
pub const ELLIPTIC_RATIO_WINDOW: usize = 5;

/// Default acquisition frame rate (Hz) when the input carries no metadata.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Small epsilon to treat floating-point sums and ranges as zero.
pub const EPSILON: f64 = 1e-12;
