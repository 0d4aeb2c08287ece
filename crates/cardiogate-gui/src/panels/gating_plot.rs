use cardiogate_core::annotation::{InteractionMode, LineStyle, PointerEvent};
use cardiogate_core::frame::index_to_number;
use cardiogate_core::gating::GatingTraces;
use egui_plot::{Legend, Line, Plot, PlotPoints, PlotTransform, VLine};

use crate::app::CardiogateApp;
use crate::convert::{marker_color, rgb};

const PLOT_HEIGHT: f32 = 300.0;
const MAXIMA_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 120, 40);
const EXTREMA_COLOR: egui::Color32 = egui::Color32::from_rgb(80, 160, 230);

pub fn show(ctx: &egui::Context, app: &mut CardiogateApp) {
    egui::TopBottomPanel::bottom("gating_plot")
        .resizable(true)
        .default_height(PLOT_HEIGHT)
        .show(ctx, |ui| {
            toolbar(ui, app);
            if app.gating.traces.is_some() {
                plot(ui, app);
            } else {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new("Run gating to plot the composite signals")
                            .color(egui::Color32::from_gray(100)),
                    );
                });
            }
        });
}

fn toolbar(ui: &mut egui::Ui, app: &mut CardiogateApp) {
    ui.horizontal(|ui| {
        ui.strong("Signals");
        ui.separator();

        let mut zoom_pan = app.gating.annotation.mode() == InteractionMode::ZoomPan;
        if ui
            .toggle_value(&mut zoom_pan, "Zoom / Pan")
            .on_hover_text("While active, clicks move the view instead of editing markers")
            .changed()
        {
            let mode = if zoom_pan {
                InteractionMode::ZoomPan
            } else {
                InteractionMode::Normal
            };
            let gating = &mut app.gating;
            gating.annotation.cancel_gesture(&mut gating.session);
            gating.annotation.set_mode(mode);
            app.ui_state.plot_drag_active = false;
        }
        ui.checkbox(&mut app.gating.show_unfiltered, "Unfiltered");

        if let Some(factor) = app
            .gating
            .traces
            .as_ref()
            .and_then(|t| t.scaled.factor_diff)
        {
            ui.separator();
            ui.small(format!("extrema scale {factor:.3}"));
        }
    });
}

fn plot(ui: &mut egui::Ui, app: &mut CardiogateApp) {
    let (pressed, released, down, pointer_pos) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.primary_down(),
            i.pointer.interact_pos(),
        )
    });
    let zoom_pan = app.gating.annotation.mode() == InteractionMode::ZoomPan;
    let display = app.config.app.display.clone();

    let response = Plot::new("gating_signals")
        .legend(Legend::default())
        .allow_drag(zoom_pan)
        .allow_zoom(zoom_pan)
        .allow_scroll(zoom_pan)
        .allow_boxed_zoom(zoom_pan)
        .x_axis_label("Frame")
        .show(ui, |plot_ui| {
            if let Some(traces) = &app.gating.traces {
                for line in signal_lines(traces, app.gating.show_unfiltered) {
                    plot_ui.line(line);
                }
            }

            for marker in app.gating.annotation.markers() {
                let style = match marker.style {
                    LineStyle::Dotted => egui_plot::LineStyle::Dotted { spacing: 6.0 },
                    LineStyle::Dashed => egui_plot::LineStyle::Dashed { length: 10.0 },
                };
                plot_ui.vline(
                    VLine::new("", marker.x)
                        .color(marker_color(&display, marker.color))
                        .width(1.5)
                        .style(style),
                );
            }

            if let Some(frame) = app.gating.annotation.frame_indicator() {
                plot_ui.vline(
                    VLine::new("Current frame", index_to_number(frame) as f64)
                        .color(rgb(display.neutral_color))
                        .width(1.0),
                );
            }
        });

    if zoom_pan {
        return;
    }
    let gating = &mut app.gating;
    let Some(pos) = pointer_pos else {
        // Released outside the window: the gesture ends without a commit.
        if released && app.ui_state.plot_drag_active {
            app.ui_state.plot_drag_active = false;
            gating
                .annotation
                .on_release(PointerEvent::primary(None), &mut gating.session);
        }
        return;
    };
    let transform = &response.transform;

    let changed = if pressed && transform.frame().contains(pos) {
        app.ui_state.plot_drag_active = true;
        gating
            .annotation
            .on_press(PointerEvent::primary(plot_x(transform, pos)), &mut gating.session)
    } else if released && app.ui_state.plot_drag_active {
        app.ui_state.plot_drag_active = false;
        gating
            .annotation
            .on_release(PointerEvent::primary(plot_x(transform, pos)), &mut gating.session)
    } else if down && app.ui_state.plot_drag_active && ui.input(|i| i.pointer.is_moving()) {
        gating
            .annotation
            .on_motion(PointerEvent::primary(plot_x(transform, pos)), &mut gating.session)
    } else {
        false
    };

    if changed {
        ui.ctx().request_repaint();
    }
}

/// Frame-axis x under `pos`, or `None` outside the plotting area.
fn plot_x(transform: &PlotTransform, pos: egui::Pos2) -> Option<f64> {
    transform
        .frame()
        .contains(pos)
        .then(|| transform.value_from_position(pos).x)
}

fn signal_lines(traces: &GatingTraces, show_unfiltered: bool) -> Vec<Line<'static>> {
    let points = |values: &[f64]| -> PlotPoints<'static> {
        traces
            .frame_numbers
            .iter()
            .zip(values)
            .map(|(&n, &v)| [n as f64, v])
            .collect::<Vec<_>>()
            .into()
    };

    let mut lines = vec![
        Line::new("Maxima", points(&traces.scaled.maxima.filtered))
            .color(MAXIMA_COLOR)
            .width(1.5),
        Line::new("Extrema", points(&traces.scaled.extrema.filtered))
            .color(EXTREMA_COLOR)
            .width(1.5),
    ];
    if show_unfiltered {
        lines.push(
            Line::new("Maxima (unfiltered)", points(&traces.scaled.maxima.unfiltered))
                .color(MAXIMA_COLOR.gamma_multiply(0.6))
                .style(egui_plot::LineStyle::Dashed { length: 6.0 }),
        );
        lines.push(
            Line::new("Extrema (unfiltered)", points(&traces.scaled.extrema.unfiltered))
                .color(EXTREMA_COLOR.gamma_multiply(0.6))
                .style(egui_plot::LineStyle::Dashed { length: 6.0 }),
        );
    }
    lines
}
