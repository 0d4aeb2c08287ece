use std::sync::mpsc;

use cardiogate_core::frame::{index_to_number, Frame};
use cardiogate_core::gating::auto::apply_if_unset;

use crate::convert::frame_to_color_image;
use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::state::{ConfigState, GatingState, RunningTask, UIState, ViewportState};
use crate::worker;

pub struct CardiogateApp {
    pub cmd_tx: Option<mpsc::Sender<WorkerCommand>>,
    pub result_tx: mpsc::Sender<WorkerResult>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub ui_state: UIState,
    pub viewport: ViewportState,
    pub config: ConfigState,
    pub gating: GatingState,
    pub show_about: bool,
}

impl CardiogateApp {
    pub fn new(ctx: &egui::Context) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        let mut ui_state = UIState::default();
        let cmd_tx = match worker::spawn_worker(result_tx.clone(), ctx.clone()) {
            Ok(tx) => Some(tx),
            Err(err) => {
                tracing::error!("failed to start worker thread: {err}");
                ui_state.error_modal = Some(format!("Failed to start worker thread: {err}"));
                None
            }
        };

        Self {
            cmd_tx,
            result_tx,
            result_rx,
            ui_state,
            viewport: ViewportState::default(),
            config: ConfigState::default(),
            gating: GatingState::default(),
            show_about: false,
        }
    }

    /// Drain all pending results from the worker.
    fn poll_results(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::TaskStarted { task } => {
                    self.ui_state.running_task = Some(task);
                    self.ui_state.progress_items_done = None;
                    self.ui_state.progress_items_total = None;
                }
                WorkerResult::FramesLoaded { dir, count, size } => {
                    self.ui_state.add_log(format!(
                        "Opened: {} ({count} frames, {}x{})",
                        dir.display(),
                        size[0],
                        size[1]
                    ));
                    self.ui_state.frames_dir = Some(dir);
                    self.ui_state.total_frames = count;
                    self.ui_state.frame_size = Some(size);
                    self.ui_state.reset_range();
                    self.ui_state.preview_frame_index = None;
                    self.ui_state.running_task = None;
                    self.gating = GatingState::default();
                }
                WorkerResult::ReportLoaded { path, rows } => {
                    self.ui_state
                        .add_log(format!("Report: {} ({rows} rows)", path.display()));
                    self.ui_state.report_path = Some(path);
                    self.ui_state.report_rows = rows;
                    self.ui_state.running_task = None;
                }
                WorkerResult::FramePreview { frame, index } => {
                    self.ui_state.preview_frame_index = Some(index);
                    let label = format!("Frame {}", index_to_number(index));
                    self.update_viewport_texture(ctx, &frame, &label);
                }
                WorkerResult::GatingComplete {
                    traces,
                    auto,
                    elapsed,
                } => {
                    self.ui_state.running_task = None;
                    self.config.dirty = false;
                    if apply_if_unset(&mut self.gating.session, &auto) {
                        self.ui_state.add_log(format!(
                            "Automatic gating: {} diastolic, {} systolic frames",
                            auto.diastole.len(),
                            auto.systole.len()
                        ));
                    } else {
                        self.ui_state
                            .add_log("Existing gating kept, automatic result discarded".into());
                    }
                    self.ui_state.gating_status = Some(format!(
                        "Frames {}-{} ({})",
                        traces.range.lower + 1,
                        traces.range.upper,
                        format_duration(elapsed)
                    ));
                    self.gating.traces = Some(*traces);
                    self.gating.redraw_markers();
                }
                WorkerResult::Progress {
                    items_done,
                    items_total,
                } => {
                    self.ui_state.progress_items_done = items_done;
                    self.ui_state.progress_items_total = items_total;
                }
                WorkerResult::ConfigImported { config } => {
                    self.config.app = config;
                    self.config.dirty = true;
                    self.ui_state.add_log("Config imported".into());
                }
                WorkerResult::Error { message } => {
                    self.ui_state.running_task = None;
                    self.ui_state.add_log(format!("ERROR: {message}"));
                    self.ui_state.error_modal = Some(message);
                }
                WorkerResult::Log { message } => {
                    self.ui_state.add_log(message);
                }
            }
        }
    }

    fn update_viewport_texture(&mut self, ctx: &egui::Context, frame: &Frame, label: &str) {
        let image = frame_to_color_image(frame);
        let size = image.size;
        let texture = ctx.load_texture("viewport", image, egui::TextureOptions::LINEAR);
        self.viewport.texture = Some(texture);
        self.viewport.image_size = Some(size);
        self.viewport.viewing_label = label.to_string();
    }

    pub fn send_command(&mut self, cmd: WorkerCommand) {
        let sent = self
            .cmd_tx
            .as_ref()
            .is_some_and(|tx| tx.send(cmd).is_ok());
        if !sent {
            self.ui_state.running_task = None;
            self.ui_state.error_modal = Some("Worker thread is not running".into());
        }
    }

    /// Start a task on the worker unless one is already running.
    pub fn start_task(&mut self, task: RunningTask, cmd: WorkerCommand) {
        if self.ui_state.is_busy() {
            return;
        }
        self.ui_state.running_task = Some(task);
        self.ui_state.progress_items_done = None;
        self.ui_state.progress_items_total = None;
        self.send_command(cmd);
    }

    pub fn run_gating(&mut self) {
        if !self.ui_state.has_input() {
            self.ui_state.error_modal =
                Some("Please load frames and a contour report before gating".into());
            return;
        }
        let Some(range) = self.ui_state.selected_range() else {
            self.ui_state.error_modal = Some(format!(
                "Invalid frame range {}-{} (acquisition has {} frames)",
                self.ui_state.range_from, self.ui_state.range_to, self.ui_state.total_frames
            ));
            return;
        };
        let config = self.config.app.clone();
        self.start_task(RunningTask::Gating, WorkerCommand::RunGating { range, config });
    }

    /// Keep the viewport in sync with the session's current frame.
    fn sync_preview(&mut self) {
        if self.ui_state.total_frames == 0 {
            return;
        }
        let current = self.gating.session.current_frame();
        if self.ui_state.preview_frame_index != Some(current) && current < self.ui_state.total_frames
        {
            self.ui_state.preview_frame_index = Some(current);
            self.send_command(WorkerCommand::PreviewFrame { index: current });
        }
    }

    fn show_error_modal(&mut self, ctx: &egui::Context) {
        let Some(message) = self.ui_state.error_modal.clone() else {
            return;
        };
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    self.ui_state.error_modal = None;
                }
            });
    }
}

impl eframe::App for CardiogateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results(ctx);

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::controls::show(ctx, self);
        panels::gating_plot::show(ctx, self);
        panels::viewport::show(ctx, self);

        self.sync_preview();
        self.show_error_modal(ctx);

        if self.show_about {
            egui::Window::new("About Cardiogate")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Cardiogate");
                        ui.label("Cardiac phase gating for intravascular imaging");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        let mins = secs / 60.0;
        format!("{mins:.1}min")
    }
}
