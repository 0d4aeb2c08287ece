use std::path::PathBuf;

use cardiogate_core::annotation::AnnotationState;
use cardiogate_core::gating::{AppConfig, GatingSession, GatingTraces};
use cardiogate_core::range::FrameRange;

/// What the worker is busy with (None = idle).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunningTask {
    LoadingFrames,
    LoadingReport,
    Gating,
}

impl std::fmt::Display for RunningTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadingFrames => write!(f, "Loading frames"),
            Self::LoadingReport => write!(f, "Loading report"),
            Self::Gating => write!(f, "Gating"),
        }
    }
}

/// Overall UI state.
#[derive(Default)]
pub struct UIState {
    pub frames_dir: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub total_frames: usize,
    pub frame_size: Option<[usize; 2]>,
    pub report_rows: usize,
    pub preview_frame_index: Option<usize>,

    /// Range inputs as 1-based frame numbers, inclusive.
    pub range_from: usize,
    pub range_to: usize,

    pub running_task: Option<RunningTask>,
    pub gating_status: Option<String>,

    pub log_messages: Vec<String>,
    pub progress_items_done: Option<usize>,
    pub progress_items_total: Option<usize>,

    /// Message shown in the error window until dismissed.
    pub error_modal: Option<String>,

    /// A primary drag started inside the plot area.
    pub plot_drag_active: bool,
}

impl UIState {
    pub fn is_busy(&self) -> bool {
        self.running_task.is_some()
    }

    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    pub fn has_input(&self) -> bool {
        self.total_frames > 0 && self.report_rows > 0
    }

    /// Range inputs as a 0-based half-open range, if valid.
    pub fn selected_range(&self) -> Option<FrameRange> {
        let lower = self.range_from.checked_sub(1)?;
        FrameRange::new(lower, self.range_to, self.total_frames).ok()
    }

    /// Reset the range inputs to span the whole acquisition.
    pub fn reset_range(&mut self) {
        self.range_from = 1;
        self.range_to = self.total_frames;
    }
}

/// Gating state owned by the UI thread.
#[derive(Default)]
pub struct GatingState {
    pub session: GatingSession,
    pub annotation: AnnotationState,
    pub traces: Option<GatingTraces>,
    pub show_unfiltered: bool,
}

impl GatingState {
    /// Rebuild the plot markers from the session for the traced range.
    pub fn redraw_markers(&mut self) {
        let Some(traces) = &self.traces else {
            return;
        };
        let mode = self.annotation.mode();
        let armed = self.annotation.armed();
        self.annotation = AnnotationState::for_range(&traces.range, &self.session);
        self.annotation.set_mode(mode);
        self.annotation.arm(armed);
    }

    /// Forget every gated frame and marker.
    pub fn clear(&mut self) {
        self.session.clear();
        self.annotation.remove_markers();
    }
}

/// Viewport display state.
pub struct ViewportState {
    pub texture: Option<egui::TextureHandle>,
    pub image_size: Option<[usize; 2]>,
    pub zoom: f32,
    pub pan_offset: egui::Vec2,
    pub viewing_label: String,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            texture: None,
            image_size: None,
            zoom: 1.0,
            pan_offset: egui::Vec2::ZERO,
            viewing_label: String::new(),
        }
    }
}

/// Editable configuration plus whether it changed since the last run.
#[derive(Default)]
pub struct ConfigState {
    pub app: AppConfig,
    pub dirty: bool,
}
