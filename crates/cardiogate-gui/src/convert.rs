use cardiogate_core::annotation::MarkerColor;
use cardiogate_core::frame::Frame;
use cardiogate_core::gating::DisplayConfig;

/// Grayscale frame (values in [0, 1]) as an egui image.
pub fn frame_to_color_image(frame: &Frame) -> egui::ColorImage {
    let pixels = frame
        .data
        .iter()
        .map(|&v| egui::Color32::from_gray((v.clamp(0.0, 1.0) * 255.0) as u8))
        .collect();

    egui::ColorImage {
        size: [frame.width(), frame.height()],
        pixels,
        source_size: Default::default(),
    }
}

pub fn rgb(c: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(c[0], c[1], c[2])
}

pub fn marker_color(display: &DisplayConfig, color: MarkerColor) -> egui::Color32 {
    match color {
        MarkerColor::Diastole => rgb(display.diastole_color),
        MarkerColor::Systole => rgb(display.systole_color),
        MarkerColor::Neutral => rgb(display.neutral_color),
    }
}
