use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consts::ELLIPTIC_RATIO_WINDOW;
use crate::error::{GatingError, Result};
use crate::range::FrameRange;

/// Per-frame contour metrics produced by the report routine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// 1-based frame number.
    pub frame: usize,
    pub elliptic_ratio: f64,
    pub shortest_distance: f64,
    pub vector_angle: f64,
    pub vector_length: f64,
    pub lumen_area: f64,
}

/// Contour report table keyed by 1-based frame number.
#[derive(Clone, Debug, Default)]
pub struct ContourReport {
    rows: BTreeMap<usize, ReportRow>,
}

impl ContourReport {
    pub fn from_rows(rows: impl IntoIterator<Item = ReportRow>) -> Self {
        Self {
            rows: rows.into_iter().map(|r| (r.frame, r)).collect(),
        }
    }

    /// Load a report from CSV with a header row naming the `ReportRow` fields.
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let rows = reader
            .deserialize::<ReportRow>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(rows = rows.len(), path = %path.display(), "loaded contour report");
        Ok(Self::from_rows(rows))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, frame: usize) -> Option<&ReportRow> {
        self.rows.get(&frame)
    }

    pub fn rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.values()
    }

    /// Restrict the report to `range`, requiring one row per frame.
    ///
    /// Fails with [`GatingError::MissingContourData`] naming every frame of the
    /// range without a row; an empty report is [`GatingError::NoInputLoaded`].
    pub fn select(&self, range: &FrameRange) -> Result<RangeReport> {
        if self.rows.is_empty() {
            return Err(GatingError::NoInputLoaded);
        }

        let missing: Vec<usize> = range
            .numbers()
            .filter(|n| !self.rows.contains_key(n))
            .collect();
        if !missing.is_empty() {
            return Err(GatingError::MissingContourData { missing });
        }

        let rows = range
            .numbers()
            .filter_map(|n| self.rows.get(&n).cloned())
            .collect();
        Ok(RangeReport { range: *range, rows })
    }
}

/// Report rows of one frame range, positionally aligned with the frames.
#[derive(Clone, Debug)]
pub struct RangeReport {
    range: FrameRange,
    rows: Vec<ReportRow>,
}

impl RangeReport {
    pub fn range(&self) -> FrameRange {
        self.range
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, f: impl Fn(&ReportRow) -> f64) -> Vec<f64> {
        self.rows.iter().map(f).collect()
    }

    /// 1-based frame numbers, used as the plot x-axis.
    pub fn frame_numbers(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.frame).collect()
    }

    /// Lumen area at a position within the range.
    pub fn lumen_area_at(&self, position: usize) -> Option<f64> {
        self.rows.get(position).map(|r| r.lumen_area)
    }
}

/// Suggest the intramural segment of a full acquisition.
///
/// The elliptic ratio is smoothed with a trailing rolling mean over
/// [`ELLIPTIC_RATIO_WINDOW`] frames (both window ends included, so each mean
/// spans up to `window + 1` rows and the first mean lands on row `window`,
/// counted from 1); the longest run of rows whose mean is at least
/// `threshold` is returned as a 0-based half-open range.
pub fn suggest_intramural_range(report: &ContourReport, threshold: f64) -> Option<FrameRange> {
    let rows: Vec<&ReportRow> = report.rows().collect();
    let window = ELLIPTIC_RATIO_WINDOW;
    if rows.len() < window {
        return None;
    }
    let rolling_mean = |end: usize| -> Option<f64> {
        if end + 1 < window {
            return None;
        }
        let slice = &rows[(end + 1).saturating_sub(window + 1)..=end];
        Some(slice.iter().map(|r| r.elliptic_ratio).sum::<f64>() / slice.len() as f64)
    };

    let mut best: Option<(usize, usize)> = None;
    let mut run_start: Option<usize> = None;
    for end in 0..=rows.len() {
        let above = end < rows.len() && rolling_mean(end).is_some_and(|m| m >= threshold);

        match (above, run_start) {
            (true, None) => run_start = Some(end),
            (false, Some(start)) => {
                if best.is_none_or(|(s, e)| end - start > e - s) {
                    best = Some((start, end));
                }
                run_start = None;
            }
            _ => {}
        }
    }

    let (start, end) = best?;
    let lower = rows[start].frame.saturating_sub(1);
    let upper = rows[end - 1].frame;
    info!(
        from = lower + 1,
        to = upper,
        threshold,
        "suggested intramural range"
    );
    Some(FrameRange { lower, upper })
}
