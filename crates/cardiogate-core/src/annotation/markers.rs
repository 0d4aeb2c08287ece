use crate::gating::session::Phase;

/// Marker color class; the host maps these to concrete colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerColor {
    Diastole,
    Systole,
    Neutral,
}

impl From<Option<Phase>> for MarkerColor {
    fn from(phase: Option<Phase>) -> Self {
        match phase {
            Some(Phase::Diastole) => Self::Diastole,
            Some(Phase::Systole) => Self::Systole,
            None => Self::Neutral,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    /// Idle marker.
    Dotted,
    /// Selected marker.
    Dashed,
}

/// Vertical phase-boundary line on the signal plot.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryMarker {
    /// Position on the 1-based frame axis; fractional while dragged.
    pub x: f64,
    pub color: MarkerColor,
    pub style: LineStyle,
}

impl BoundaryMarker {
    pub fn new(x: f64, color: MarkerColor) -> Self {
        Self {
            x,
            color,
            style: LineStyle::Dotted,
        }
    }
}
