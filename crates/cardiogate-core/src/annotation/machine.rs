use tracing::debug;

use crate::annotation::markers::{BoundaryMarker, LineStyle, MarkerColor};
use crate::consts::MARKER_SELECT_FRACTION;
use crate::frame::{index_to_number, plot_x_to_index};
use crate::gating::session::{GatingSession, Phase};
use crate::range::FrameRange;

/// Whether the plot toolbar has taken over the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    Normal,
    /// Zoom or pan tool active; annotation events are ignored.
    ZoomPan,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A pointer event in plot data coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Button pressed, held or released; `None` for a plain hover.
    pub button: Option<PointerButton>,
    /// x on the 1-based frame axis, `None` outside the plotting area.
    pub x: Option<f64>,
}

impl PointerEvent {
    pub fn primary(x: Option<f64>) -> Self {
        Self {
            button: Some(PointerButton::Primary),
            x,
        }
    }

    fn is_primary(&self) -> bool {
        self.button == Some(PointerButton::Primary)
    }
}

/// Observable state of the marker selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionState {
    Unselected,
    Selected {
        index: usize,
        pending: Option<Phase>,
    },
}

/// Marker editing state machine.
///
/// Owns every marker on the plot. Press selects or creates a marker, motion
/// drags it (or deletes it when the pointer leaves the plot), release commits
/// the pending phase of the dragged frame to the session.
#[derive(Clone, Debug, Default)]
pub struct AnnotationState {
    markers: Vec<BoundaryMarker>,
    selected: Option<usize>,
    armed: Option<Phase>,
    pending: Option<Phase>,
    /// Frame the pending phase was lifted from.
    pending_origin: Option<usize>,
    mode: InteractionMode,
    frame_count: usize,
    frame_indicator: Option<usize>,
}

impl AnnotationState {
    /// Fresh state for a plot spanning `frame_count` frames.
    pub fn new(frame_count: usize) -> Self {
        Self {
            frame_count,
            ..Self::default()
        }
    }

    /// State for a plot of `range`, with markers for the gated frames in it.
    ///
    /// The selection tolerance scales with the plotted range, not the
    /// acquisition.
    pub fn for_range(range: &FrameRange, session: &GatingSession) -> Self {
        let mut state = Self::new(range.len());
        state.draw_existing(session, range);
        state.frame_indicator = Some(session.current_frame());
        state
    }

    /// Frames spanned by the plot.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn markers(&self) -> &[BoundaryMarker] {
        &self.markers
    }

    pub fn selected_marker(&self) -> Option<&BoundaryMarker> {
        self.selected.and_then(|i| self.markers.get(i))
    }

    pub fn selection(&self) -> SelectionState {
        match self.selected {
            Some(index) => SelectionState::Selected {
                index,
                pending: self.pending,
            },
            None => SelectionState::Unselected,
        }
    }

    pub fn pending(&self) -> Option<Phase> {
        self.pending
    }

    pub fn armed(&self) -> Option<Phase> {
        self.armed
    }

    /// Phase given to markers created by the next press.
    pub fn arm(&mut self, phase: Option<Phase>) {
        self.armed = phase;
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }

    /// Frame shown by the plot's frame indicator (0-based).
    pub fn frame_indicator(&self) -> Option<usize> {
        self.frame_indicator
    }

    pub fn set_frame_indicator(&mut self, frame: usize) {
        self.frame_indicator = Some(frame);
    }

    /// Primary press inside the plot: select the nearby marker or create one.
    ///
    /// Returns whether anything changed.
    pub fn on_press(&mut self, event: PointerEvent, session: &mut GatingSession) -> bool {
        if self.mode != InteractionMode::Normal || !event.is_primary() {
            return false;
        }
        let Some(x) = event.x else {
            return false;
        };

        self.reset_highlights();
        self.cancel_gesture(session);

        let tolerance = self.frame_count as f64 * MARKER_SELECT_FRACTION;
        let nearest = self
            .markers
            .iter()
            .enumerate()
            .map(|(i, m)| (i, (m.x - x).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let mut created_with = None;
        let snapped_x = match nearest {
            Some((i, dist)) if dist < tolerance => {
                self.selected = Some(i);
                self.markers[i].x
            }
            _ => {
                self.markers
                    .push(BoundaryMarker::new(x, MarkerColor::from(self.armed)));
                self.selected = Some(self.markers.len() - 1);
                created_with = self.armed;
                x
            }
        };
        if let Some(i) = self.selected {
            self.markers[i].style = LineStyle::Dashed;
        }

        let frame = plot_x_to_index(snapped_x);
        session.set_current_frame(frame);
        self.frame_indicator = Some(frame);

        let diastole = session.frames(Phase::Diastole).contains(&frame);
        let systole = session.frames(Phase::Systole).contains(&frame);
        if diastole || created_with == Some(Phase::Diastole) {
            self.pending = Some(Phase::Diastole);
            self.pending_origin = diastole.then_some(frame);
            session.toggle_diastole(false);
        } else if systole || created_with == Some(Phase::Systole) {
            self.pending = Some(Phase::Systole);
            self.pending_origin = systole.then_some(frame);
            session.toggle_systole(false);
        }

        debug!(frame = index_to_number(frame), pending = ?self.pending, "marker pressed");
        true
    }

    /// Pointer moved with the primary button held: drag the selected marker.
    ///
    /// Leaving the plot deletes the marker.
    pub fn on_motion(&mut self, event: PointerEvent, session: &mut GatingSession) -> bool {
        if self.mode != InteractionMode::Normal || !event.is_primary() {
            return false;
        }
        let Some(i) = self.selected else {
            return false;
        };

        match event.x {
            Some(x) => {
                self.markers[i].x = x;
                let frame = plot_x_to_index(x);
                session.set_current_frame(frame);
                self.frame_indicator = Some(frame);
            }
            None => {
                self.markers.remove(i);
                self.selected = None;
                self.pending = None;
                self.pending_origin = None;
                debug!("marker dragged out of the plot and removed");
            }
        }
        true
    }

    /// Primary release inside the plot: commit the pending phase to the
    /// current frame. Pending state is cleared on every release.
    pub fn on_release(&mut self, event: PointerEvent, session: &mut GatingSession) -> bool {
        if self.mode != InteractionMode::Normal {
            return false;
        }
        let mut changed = false;
        if event.is_primary() && event.x.is_some() {
            match self.pending {
                Some(Phase::Diastole) => {
                    session.toggle_diastole(true);
                    changed = true;
                }
                Some(Phase::Systole) => {
                    session.toggle_systole(true);
                    changed = true;
                }
                None => {}
            }
        }
        self.pending = None;
        self.pending_origin = None;
        changed
    }

    /// Abandon a press whose release never arrived.
    ///
    /// A phase lifted off a gated frame goes back to that frame; nothing is
    /// committed anywhere else.
    pub fn cancel_gesture(&mut self, session: &mut GatingSession) {
        if let (Some(phase), Some(frame)) = (self.pending.take(), self.pending_origin.take()) {
            session.set_phase(frame, phase, true);
            debug!(frame = index_to_number(frame), %phase, "unfinished press restored");
        }
    }

    /// Add markers for gated frames inside `range`.
    pub fn draw_existing(&mut self, session: &GatingSession, range: &FrameRange) {
        for phase in [Phase::Diastole, Phase::Systole] {
            for &frame in session.frames(phase) {
                if range.contains_index(frame) {
                    self.markers.push(BoundaryMarker::new(
                        index_to_number(frame) as f64,
                        MarkerColor::from(Some(phase)),
                    ));
                }
            }
        }
    }

    /// Drop every marker and the selection.
    pub fn remove_markers(&mut self) {
        self.markers.clear();
        self.selected = None;
        self.pending = None;
        self.pending_origin = None;
    }

    /// Recolor the selected marker; `None` restores the neutral color.
    pub fn update_color(&mut self, phase: Option<Phase>) {
        if let Some(i) = self.selected {
            self.markers[i].color = MarkerColor::from(phase);
        }
    }

    /// Deselect the selected marker and restore its idle style.
    pub fn reset_highlights(&mut self) {
        if let Some(i) = self.selected.take() {
            if let Some(m) = self.markers.get_mut(i) {
                m.style = LineStyle::Dotted;
            }
        }
    }

    /// Checkbox toggle from the host: set or clear `phase` on the session's
    /// current frame and recolor the selected marker to match.
    pub fn toggle_phase(&mut self, session: &mut GatingSession, phase: Phase, checked: bool) {
        session.set_phase(session.current_frame(), phase, checked);
        self.update_color(checked.then_some(phase));
    }
}
