use std::path::PathBuf;
use std::time::Duration;

use cardiogate_core::frame::Frame;
use cardiogate_core::gating::auto::AutoGating;
use cardiogate_core::gating::{AppConfig, GatingTraces};
use cardiogate_core::range::FrameRange;

use crate::state::RunningTask;

/// Commands sent from UI thread to worker thread.
pub enum WorkerCommand {
    /// Read every frame image of a directory. Replaces cached frames.
    LoadFrames { dir: PathBuf },

    /// Read the per-frame contour report (CSV).
    LoadReport { path: PathBuf },

    /// Preview a cached frame by 0-based index.
    PreviewFrame { index: usize },

    /// Extract, condition and fuse the signals of `range`, then gate them.
    RunGating { range: FrameRange, config: AppConfig },
}

/// Results sent from worker thread back to UI thread.
pub enum WorkerResult {
    /// The worker picked up a command and is now busy with it.
    TaskStarted {
        task: RunningTask,
    },
    FramesLoaded {
        dir: PathBuf,
        count: usize,
        size: [usize; 2],
    },
    ReportLoaded {
        path: PathBuf,
        rows: usize,
    },
    FramePreview {
        frame: Frame,
        index: usize,
    },

    /// Traces of the range plus the automatic result; the UI decides whether
    /// the result is applied to its session.
    GatingComplete {
        traces: Box<GatingTraces>,
        auto: AutoGating,
        elapsed: Duration,
    },

    /// Progress update while frames are read.
    Progress {
        items_done: Option<usize>,
        items_total: Option<usize>,
    },

    ConfigImported {
        config: AppConfig,
    },
    Error {
        message: String,
    },
    Log {
        message: String,
    },
}
