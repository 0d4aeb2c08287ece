use cardiogate_core::frame::index_to_number;
use cardiogate_core::gating::AppConfig;
use serde::Serialize;

use crate::app::CardiogateApp;
use crate::messages::WorkerResult;
use crate::panels::controls::{pick_frames_dir, pick_report};

pub fn show(ctx: &egui::Context, app: &mut CardiogateApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui.add(egui::Button::new("Open Frames...").shortcut_text(ctx.format_shortcut(&open_shortcut))).clicked() {
                    ui.close();
                    pick_frames_dir(app);
                }
                if ui.button("Open Report...").clicked() {
                    ui.close();
                    pick_report(app);
                }

                ui.separator();

                if ui.button("Import Config...").clicked() {
                    ui.close();
                    import_config(app);
                }
                if ui.button("Export Config...").clicked() {
                    ui.close();
                    export_config(app);
                }

                let save_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
                if ui.add(egui::Button::new("Export Gating...").shortcut_text(ctx.format_shortcut(&save_shortcut))).clicked() {
                    ui.close();
                    export_gating(app);
                }

                ui.separator();

                let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui.add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut))).clicked() {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                if ui.button("Reset Defaults").clicked() {
                    ui.close();
                    app.config.app = AppConfig::default();
                    app.config.dirty = true;
                    app.ui_state.add_log("Config reset to defaults".into());
                }
                if ui.button("Clear Gating").clicked() {
                    ui.close();
                    app.gating.clear();
                    app.ui_state.add_log("Gating cleared".into());
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.show_about = true;
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O))) {
            pick_frames_dir(app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S))) {
            export_gating(app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

fn import_config(app: &mut CardiogateApp) {
    let result_tx = app.result_tx.clone();
    std::thread::spawn(move || {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .pick_file()
        else {
            return;
        };
        let result = match AppConfig::load(&path) {
            Ok(config) => WorkerResult::ConfigImported { config },
            Err(err) => WorkerResult::Error {
                message: format!("Failed to import {}: {err}", path.display()),
            },
        };
        let _ = result_tx.send(result);
    });
}

fn export_config(app: &mut CardiogateApp) {
    let config = app.config.app.clone();
    let result_tx = app.result_tx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .set_file_name("cardiogate.toml")
            .save_file()
        {
            let written = config
                .to_toml_string()
                .map_err(anyhow::Error::from)
                .and_then(|content| Ok(std::fs::write(&path, content)?));
            let _ = result_tx.send(match written {
                Ok(()) => WorkerResult::Log {
                    message: format!("Config saved: {}", path.display()),
                },
                Err(err) => WorkerResult::Error {
                    message: format!("Failed to save {}: {err}", path.display()),
                },
            });
        }
    });
}

/// Gated frames as written to disk, 1-based like the rest of the UI.
#[derive(Serialize)]
struct GatingExport {
    diastole: Vec<usize>,
    systole: Vec<usize>,
}

fn export_gating(app: &mut CardiogateApp) {
    let numbers = |frames: Vec<usize>| frames.into_iter().map(index_to_number).collect();
    let export = GatingExport {
        diastole: numbers(app.gating.session.diastole_frames()),
        systole: numbers(app.gating.session.systole_frames()),
    };
    let result_tx = app.result_tx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .set_file_name("gating.toml")
            .save_file()
        {
            let written = toml::to_string_pretty(&export)
                .map_err(anyhow::Error::from)
                .and_then(|content| Ok(std::fs::write(&path, content)?));
            let _ = result_tx.send(match written {
                Ok(()) => WorkerResult::Log {
                    message: format!("Gating saved: {}", path.display()),
                },
                Err(err) => WorkerResult::Error {
                    message: format!("Failed to save {}: {err}", path.display()),
                },
            });
        }
    });
}
