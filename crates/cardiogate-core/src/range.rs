use serde::{Deserialize, Serialize};

use crate::error::{GatingError, Result};

/// User-chosen frame range: 0-based, half-open (`lower..upper`).
///
/// The 1-based frame numbers covered are `lower + 1 ..= upper`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub lower: usize,
    pub upper: usize,
}

impl FrameRange {
    /// Validate `lower < upper <= total`.
    pub fn new(lower: usize, upper: usize, total: usize) -> Result<Self> {
        if lower >= upper || upper > total {
            return Err(GatingError::InvalidFrameRange {
                lower,
                upper,
                total,
            });
        }
        Ok(Self { lower, upper })
    }

    pub fn full(total: usize) -> Self {
        Self {
            lower: 0,
            upper: total,
        }
    }

    pub fn len(&self) -> usize {
        self.upper - self.lower
    }

    pub fn is_empty(&self) -> bool {
        self.upper <= self.lower
    }

    /// Whether this range spans the whole acquisition of `total` frames.
    pub fn is_full(&self, total: usize) -> bool {
        self.lower == 0 && self.upper == total
    }

    /// 1-based frame numbers covered by the range.
    pub fn numbers(&self) -> impl Iterator<Item = usize> {
        self.lower + 1..=self.upper
    }

    /// Whether the 0-based frame index lies inside the range.
    pub fn contains_index(&self, index: usize) -> bool {
        (self.lower..self.upper).contains(&index)
    }
}

/// Render frame numbers in compressed range notation.
///
/// Runs of two or more consecutive numbers collapse to `first-last`; the
/// runs are joined with `", "`. Input order and duplicates do not matter.
///
/// `[13, 14, 16]` renders as `"13-14, 16"`.
pub fn format_frame_ranges(frames: &[usize]) -> String {
    let mut nums = frames.to_vec();
    nums.sort_unstable();
    nums.dedup();

    let mut parts = Vec::new();
    let mut i = 0;
    while i < nums.len() {
        let mut j = i;
        while j + 1 < nums.len() && nums[j + 1] - nums[j] == 1 {
            j += 1;
        }
        if i == j {
            parts.push(nums[i].to_string());
        } else {
            parts.push(format!("{}-{}", nums[i], nums[j]));
        }
        i = j + 1;
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_one_based() {
        let r = FrameRange::new(2, 5, 10).unwrap();
        assert_eq!(r.numbers().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert!(r.contains_index(2));
        assert!(!r.contains_index(5));
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(FrameRange::new(5, 5, 10).is_err());
        assert!(FrameRange::new(0, 11, 10).is_err());
    }
}
