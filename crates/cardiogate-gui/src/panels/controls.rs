use cardiogate_core::frame::{index_to_number, number_to_index};
use cardiogate_core::gating::Phase;
use cardiogate_core::range::format_frame_ranges;

use crate::app::CardiogateApp;
use crate::messages::WorkerCommand;
use crate::panels::section_header;

const LEFT_PANEL_WIDTH: f32 = 280.0;

pub fn show(ctx: &egui::Context, app: &mut CardiogateApp) {
    egui::SidePanel::left("controls")
        .default_width(LEFT_PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_min_width(LEFT_PANEL_WIDTH - 20.0);

                input_section(ui, app);
                ui.separator();
                range_section(ui, app);
                ui.separator();
                parameters_section(ui, app);
                ui.separator();
                annotation_section(ui, app);
                ui.separator();
                actions_section(ui, app);
            });
        });
}

pub(crate) fn pick_frames_dir(app: &CardiogateApp) {
    let Some(cmd_tx) = app.cmd_tx.clone() else {
        return;
    };
    std::thread::spawn(move || {
        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
            let _ = cmd_tx.send(WorkerCommand::LoadFrames { dir });
        }
    });
}

pub(crate) fn pick_report(app: &CardiogateApp) {
    let Some(cmd_tx) = app.cmd_tx.clone() else {
        return;
    };
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv", "txt"])
            .add_filter("All files", &["*"])
            .pick_file()
        {
            let _ = cmd_tx.send(WorkerCommand::LoadReport { path });
        }
    });
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn input_section(ui: &mut egui::Ui, app: &mut CardiogateApp) {
    section_header(ui, "Input", None);
    ui.add_space(4.0);

    ui.add_enabled_ui(!app.ui_state.is_busy(), |ui| {
        ui.horizontal(|ui| {
            if ui.button("Frames...").clicked() {
                pick_frames_dir(app);
            }
            if ui.button("Report...").clicked() {
                pick_report(app);
            }
        });
    });

    if let Some(ref dir) = app.ui_state.frames_dir {
        ui.label(file_name(dir));
        if let Some(size) = app.ui_state.frame_size {
            ui.small(format!(
                "{} frames, {}x{}",
                app.ui_state.total_frames, size[0], size[1]
            ));
        }
    }
    if let Some(ref path) = app.ui_state.report_path {
        ui.label(file_name(path));
        ui.small(format!("{} contour rows", app.ui_state.report_rows));
    }
}

fn range_section(ui: &mut egui::Ui, app: &mut CardiogateApp) {
    section_header(ui, "Frame Range", None);
    ui.add_space(4.0);

    let total = app.ui_state.total_frames.max(1);
    ui.add_enabled_ui(app.ui_state.total_frames > 0, |ui| {
        ui.horizontal(|ui| {
            ui.label("From");
            ui.add(egui::DragValue::new(&mut app.ui_state.range_from).range(1..=total));
            ui.label("to");
            ui.add(egui::DragValue::new(&mut app.ui_state.range_to).range(1..=total));
        });
        if ui.small_button("Full range").clicked() {
            app.ui_state.reset_range();
        }
    });
    if app.ui_state.total_frames > 0 && app.ui_state.selected_range().is_none() {
        ui.colored_label(egui::Color32::from_rgb(220, 80, 60), "Invalid range");
    }
}

fn parameters_section(ui: &mut egui::Ui, app: &mut CardiogateApp) {
    let status = app.config.dirty.then_some("changed");
    section_header(ui, "Parameters", status);
    ui.add_space(4.0);

    let cfg = &mut app.config.app;
    let mut changed = false;

    egui::Grid::new("gating_params")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("Frame rate");
            changed |= ui
                .add(egui::DragValue::new(&mut cfg.frame_rate).range(1.0..=500.0).suffix(" fps"))
                .changed();
            ui.end_row();

            ui.label("Low cut");
            changed |= ui
                .add(egui::DragValue::new(&mut cfg.gating.lowcut).speed(0.01).suffix(" Hz"))
                .changed();
            ui.end_row();

            ui.label("High cut");
            changed |= ui
                .add(egui::DragValue::new(&mut cfg.gating.highcut).speed(0.01).suffix(" Hz"))
                .changed();
            ui.end_row();

            ui.label("Filter order");
            changed |= ui
                .add(egui::DragValue::new(&mut cfg.gating.order).range(1..=10))
                .changed();
            ui.end_row();

            ui.label("Smoothing window");
            changed |= ui
                .add(egui::DragValue::new(&mut cfg.gating.window_size).range(1..=101))
                .changed();
            ui.end_row();

            ui.label("Peak percentile");
            changed |= ui
                .add(egui::Slider::new(&mut cfg.gating.min_height_percentile, 0.0..=100.0))
                .changed();
            ui.end_row();

            ui.label("Peak distance");
            changed |= ui
                .add(egui::DragValue::new(&mut cfg.gating.min_distance).range(1..=200))
                .changed();
            ui.end_row();

            ui.label("Match threshold");
            changed |= ui
                .add(egui::DragValue::new(&mut cfg.gating.auto_gating_threshold).range(0..=50))
                .changed();
            ui.end_row();

            ui.label("Intramural threshold");
            changed |= ui
                .add(egui::Slider::new(&mut cfg.gating.intramural_threshold, 0.0..=1.0))
                .changed();
            ui.end_row();
        });

    changed |= ui
        .checkbox(&mut cfg.gating.both_extrema, "Use both extrema")
        .changed();

    if changed {
        app.config.dirty = true;
    }
    if let Err(err) = app.config.app.gating.validate() {
        ui.colored_label(egui::Color32::from_rgb(220, 80, 60), err.to_string());
    }
}

fn annotation_section(ui: &mut egui::Ui, app: &mut CardiogateApp) {
    let status = app.gating.traces.is_some().then(|| {
        format!(
            "{} D / {} S",
            app.gating.session.frames(Phase::Diastole).len(),
            app.gating.session.frames(Phase::Systole).len()
        )
    });
    section_header(ui, "Annotation", status.as_deref());
    ui.add_space(4.0);

    let total = app.ui_state.total_frames;
    ui.add_enabled_ui(total > 0, |ui| {
        let mut armed = app.gating.annotation.armed();
        ui.horizontal(|ui| {
            ui.label("New marker");
            ui.radio_value(&mut armed, None, "None");
            ui.radio_value(&mut armed, Some(Phase::Diastole), "D");
            ui.radio_value(&mut armed, Some(Phase::Systole), "S");
        });
        app.gating.annotation.arm(armed);

        let mut number = index_to_number(app.gating.session.current_frame());
        if ui
            .add(
                egui::Slider::new(&mut number, 1..=total.max(1))
                    .text("Frame")
                    .clamping(egui::SliderClamping::Always),
            )
            .changed()
        {
            let frame = number_to_index(number);
            app.gating.session.set_current_frame(frame);
            app.gating.annotation.set_frame_indicator(frame);
        }

        let current = app.gating.session.current_frame();
        let mut diastole = app.gating.session.frames(Phase::Diastole).contains(&current);
        let mut systole = app.gating.session.frames(Phase::Systole).contains(&current);
        ui.horizontal(|ui| {
            let gating = &mut app.gating;
            if ui.checkbox(&mut diastole, "Diastole").changed() {
                gating
                    .annotation
                    .toggle_phase(&mut gating.session, Phase::Diastole, diastole);
            }
            if ui.checkbox(&mut systole, "Systole").changed() {
                gating
                    .annotation
                    .toggle_phase(&mut gating.session, Phase::Systole, systole);
            }
        });
    });

    for phase in [Phase::Diastole, Phase::Systole] {
        let frames: Vec<usize> = app
            .gating
            .session
            .frames(phase)
            .iter()
            .map(|&f| index_to_number(f))
            .collect();
        if !frames.is_empty() {
            ui.small(format!("{phase}: {}", format_frame_ranges(&frames)));
        }
    }
}

fn actions_section(ui: &mut egui::Ui, app: &mut CardiogateApp) {
    let busy = app.ui_state.is_busy();
    ui.add_enabled_ui(!busy && app.ui_state.has_input(), |ui| {
        let button = egui::Button::new(egui::RichText::new("Run Gating").strong())
            .min_size(egui::vec2(ui.available_width(), 28.0));
        if ui.add(button).clicked() {
            app.run_gating();
        }
    });

    ui.add_enabled_ui(!busy && !app.gating.session.is_empty(), |ui| {
        if ui.button("Clear gating").clicked() {
            app.gating.clear();
            app.ui_state.add_log("Gating cleared".into());
        }
    });

    if let Some(ref status) = app.ui_state.gating_status {
        ui.small(status);
    }
}
