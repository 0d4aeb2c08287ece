use crate::app::CardiogateApp;

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 20.0;

pub fn show(ctx: &egui::Context, app: &mut CardiogateApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        ui.painter()
            .rect_filled(rect, 0.0, egui::Color32::from_gray(20));

        let Some(texture) = app.viewport.texture.as_ref() else {
            show_placeholder(ui);
            return;
        };
        let texture_id = texture.id();
        let image_size = match app.viewport.image_size {
            Some(size) => egui::vec2(size[0] as f32, size[1] as f32),
            None => texture.size_vec2(),
        };

        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        handle_zoom(ui, &response, app, rect);
        if response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            app.viewport.pan_offset += response.drag_delta();
        }
        if response.double_clicked() {
            fit_to_rect(app, image_size, rect);
        }

        let scaled = image_size * app.viewport.zoom;
        let img_rect = egui::Rect::from_center_size(rect.center() + app.viewport.pan_offset, scaled);
        ui.painter().image(
            texture_id,
            img_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        draw_frame_label(ui, rect, app);
    });
}

fn handle_zoom(ui: &egui::Ui, response: &egui::Response, app: &mut CardiogateApp, rect: egui::Rect) {
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
    if scroll_delta == 0.0 || !response.hovered() {
        return;
    }

    let zoom_factor = (scroll_delta * 0.005).exp();
    let new_zoom = (app.viewport.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);

    // Zoom toward mouse cursor
    if let Some(mouse_pos) = ui.input(|i| i.pointer.hover_pos()) {
        let center = rect.center().to_vec2() + app.viewport.pan_offset;
        let mouse_rel = mouse_pos.to_vec2() - center;
        let scale_change = new_zoom / app.viewport.zoom;
        app.viewport.pan_offset += mouse_rel * (1.0 - scale_change);
    }

    app.viewport.zoom = new_zoom;
}

/// Frame number plus its phase, tinted with the phase color.
fn draw_frame_label(ui: &egui::Ui, rect: egui::Rect, app: &CardiogateApp) {
    if app.viewport.viewing_label.is_empty() {
        return;
    }
    let display = &app.config.app.display;
    let shown = app.ui_state.preview_frame_index;
    let phase = shown.and_then(|f| app.gating.session.phase_of(f));
    let (text, color) = match phase {
        Some(phase) => (
            format!("{} ({phase})", app.viewport.viewing_label),
            crate::convert::marker_color(display, Some(phase).into()),
        ),
        None => (
            app.viewport.viewing_label.clone(),
            egui::Color32::from_white_alpha(200),
        ),
    };
    ui.painter().text(
        rect.left_top() + egui::vec2(8.0, 8.0),
        egui::Align2::LEFT_TOP,
        text,
        egui::FontId::proportional(14.0),
        color,
    );
}

fn show_placeholder(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new("Open a frame directory to begin")
                .size(18.0)
                .color(egui::Color32::from_gray(100)),
        );
    });
}

fn fit_to_rect(app: &mut CardiogateApp, image_size: egui::Vec2, rect: egui::Rect) {
    let available = rect.size();
    let fit = (available.x / image_size.x).min(available.y / image_size.y);
    app.viewport.zoom = fit.clamp(MIN_ZOOM, MAX_ZOOM);
    app.viewport.pan_offset = egui::Vec2::ZERO;
}
