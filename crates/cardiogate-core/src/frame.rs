use ndarray::{s, Array2};

use crate::error::{GatingError, Result};

/// A single grayscale image frame.
/// Pixel values are f32 in [0.0, 1.0].
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
    /// Original bit depth before conversion (8 or 16)
    pub original_bit_depth: u8,
}

impl Frame {
    pub fn new(data: Array2<f32>, bit_depth: u8) -> Self {
        Self {
            data,
            original_bit_depth: bit_depth,
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Crop to `rows x cols`, clamping both ranges to the frame size.
    ///
    /// An empty intersection keeps the whole frame.
    pub fn cropped(&self, region: &CropRegion) -> Frame {
        let (h, w) = self.data.dim();
        let r0 = region.row_start.min(h);
        let r1 = region.row_end.min(h);
        let c0 = region.col_start.min(w);
        let c1 = region.col_end.min(w);
        if r0 >= r1 || c0 >= c1 {
            return self.clone();
        }
        Frame::new(
            self.data.slice(s![r0..r1, c0..c1]).to_owned(),
            self.original_bit_depth,
        )
    }
}

/// Rectangular pixel region, half-open on both axes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CropRegion {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl Default for CropRegion {
    fn default() -> Self {
        use crate::consts::{DEFAULT_CROP_END, DEFAULT_CROP_START};
        Self {
            row_start: DEFAULT_CROP_START,
            row_end: DEFAULT_CROP_END,
            col_start: DEFAULT_CROP_START,
            col_end: DEFAULT_CROP_END,
        }
    }
}

/// Frames of the active range together with their 1-based frame numbers.
#[derive(Clone, Debug)]
pub struct FrameSeries {
    frames: Vec<Frame>,
    numbers: Vec<usize>,
}

impl FrameSeries {
    /// Build a series whose first frame carries the 1-based number `first_number`.
    pub fn new(frames: Vec<Frame>, first_number: usize) -> Result<Self> {
        if frames.is_empty() {
            return Err(GatingError::EmptySequence);
        }
        let numbers = (first_number..first_number + frames.len()).collect();
        Ok(Self { frames, numbers })
    }

    /// Take frames `lower..upper` (0-based, half-open) from a full acquisition.
    pub fn from_range(all: &[Frame], lower: usize, upper: usize) -> Result<Self> {
        if lower >= upper || upper > all.len() {
            return Err(GatingError::InvalidFrameRange {
                lower,
                upper,
                total: all.len(),
            });
        }
        Self::new(all[lower..upper].to_vec(), index_to_number(lower))
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// 1-based frame numbers, one per frame.
    pub fn numbers(&self) -> &[usize] {
        &self.numbers
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn cropped(&self, region: &CropRegion) -> FrameSeries {
        FrameSeries {
            frames: self.frames.iter().map(|f| f.cropped(region)).collect(),
            numbers: self.numbers.clone(),
        }
    }
}

/// Convert a 1-based frame number (as shown to the user) to a 0-based index.
pub fn number_to_index(number: usize) -> usize {
    number.saturating_sub(1)
}

/// Convert a 0-based frame index to the 1-based number shown to the user.
pub fn index_to_number(index: usize) -> usize {
    index + 1
}

/// Convert a fractional plot x-coordinate (1-based frame axis) to the nearest
/// 0-based frame index (ties to even). Positions left of frame 1 clamp to
/// index 0.
pub fn plot_x_to_index(x: f64) -> usize {
    (x - 1.0).round_ties_even().max(0.0) as usize
}
