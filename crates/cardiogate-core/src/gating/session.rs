use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Cardiac phase of a gated frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Diastole,
    Systole,
}

impl Phase {
    pub fn other(self) -> Self {
        match self {
            Self::Diastole => Self::Systole,
            Self::Systole => Self::Diastole,
        }
    }

    /// One-letter label used in frame tables.
    pub fn letter(self) -> char {
        match self {
            Self::Diastole => 'D',
            Self::Systole => 'S',
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Diastole => write!(f, "Diastole"),
            Self::Systole => write!(f, "Systole"),
        }
    }
}

/// Gated frames of one acquisition, owned by the host and passed explicitly
/// to the gating engine and the annotation layer.
///
/// Frame indices are 0-based over the whole acquisition. The diastole and
/// systole sets are disjoint; the label map always mirrors them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GatingSession {
    diastole: BTreeSet<usize>,
    systole: BTreeSet<usize>,
    labels: BTreeMap<usize, Phase>,
    /// Frame shown by the host's frame indicator (0-based).
    current_frame: usize,
}

impl GatingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while neither phase has any frame.
    pub fn is_empty(&self) -> bool {
        self.diastole.is_empty() && self.systole.is_empty()
    }

    pub fn diastole_frames(&self) -> Vec<usize> {
        self.diastole.iter().copied().collect()
    }

    pub fn systole_frames(&self) -> Vec<usize> {
        self.systole.iter().copied().collect()
    }

    pub fn frames(&self, phase: Phase) -> &BTreeSet<usize> {
        match phase {
            Phase::Diastole => &self.diastole,
            Phase::Systole => &self.systole,
        }
    }

    pub fn phase_of(&self, frame: usize) -> Option<Phase> {
        self.labels.get(&frame).copied()
    }

    /// Per-frame phase labels.
    pub fn labels(&self) -> &BTreeMap<usize, Phase> {
        &self.labels
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn set_current_frame(&mut self, frame: usize) {
        self.current_frame = frame;
    }

    /// Replace both sets with an automatic gating result.
    ///
    /// A frame listed for both phases keeps the diastole label.
    pub fn assign(&mut self, diastole: &[usize], systole: &[usize]) {
        self.clear();
        for &f in systole {
            self.set_phase(f, Phase::Systole, true);
        }
        for &f in diastole {
            self.set_phase(f, Phase::Diastole, true);
        }
    }

    pub fn clear(&mut self) {
        self.diastole.clear();
        self.systole.clear();
        self.labels.clear();
    }

    /// Add or remove `frame` from a phase. Adding moves the frame out of the
    /// other phase.
    pub fn set_phase(&mut self, frame: usize, phase: Phase, checked: bool) {
        if checked {
            self.set_mut(phase.other()).remove(&frame);
            self.set_mut(phase).insert(frame);
            self.labels.insert(frame, phase);
        } else if self.set_mut(phase).remove(&frame) {
            self.labels.remove(&frame);
        }
    }

    /// Toggle entry point for the diastole checkbox, acting on the current frame.
    pub fn toggle_diastole(&mut self, checked: bool) {
        self.set_phase(self.current_frame, Phase::Diastole, checked);
    }

    /// Toggle entry point for the systole checkbox, acting on the current frame.
    pub fn toggle_systole(&mut self, checked: bool) {
        self.set_phase(self.current_frame, Phase::Systole, checked);
    }

    fn set_mut(&mut self, phase: Phase) -> &mut BTreeSet<usize> {
        match phase {
            Phase::Diastole => &mut self.diastole,
            Phase::Systole => &mut self.systole,
        }
    }
}
