use crate::app::CardiogateApp;

pub fn show(ctx: &egui::Context, app: &mut CardiogateApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        if let Some(task) = app.ui_state.running_task {
            let (done, total) = (
                app.ui_state.progress_items_done,
                app.ui_state.progress_items_total,
            );
            let fraction = match (done, total) {
                (Some(done), Some(total)) if total > 0 => done as f32 / total as f32,
                _ => 0.0,
            };
            let detail = match (done, total) {
                (Some(done), Some(total)) => format!("{task} ({done}/{total})"),
                _ => format!("{task}..."),
            };
            ui.add(egui::ProgressBar::new(fraction).text(detail).animate(true));
        } else {
            ui.add(egui::ProgressBar::new(0.0).text(""));
        }

        // Log area, 4 lines high
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui_state.log_messages.is_empty() {
                    for _ in 0..4 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui_state.log_messages {
                        ui.label(msg);
                    }
                }
            });

        ui.horizontal(|ui| {
            if let Some(ref size) = app.viewport.image_size {
                ui.label(format!("{}x{}", size[0], size[1]));
                ui.separator();
            }
            ui.label(format!("Zoom: {:.0}%", app.viewport.zoom * 100.0));
            ui.separator();
            ui.label(format!("{:.1} fps", app.config.app.frame_rate));
            if app.gating.annotation.mode() == cardiogate_core::annotation::InteractionMode::ZoomPan {
                ui.separator();
                ui.label("Zoom/Pan");
            }
        });

        ui.add_space(2.0);
    });
}
