use std::path::Path;

use ndarray::Array2;

use crate::error::Result;
use crate::frame::Frame;

/// File extensions accepted as frames.
pub const FRAME_EXTENSIONS: &[&str] = &["png", "tif", "tiff", "jpg", "jpeg", "bmp"];

/// Whether `path` has one of the [`FRAME_EXTENSIONS`] (case-insensitive).
pub fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            FRAME_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Load an image file into a grayscale Frame.
///
/// Color images are reduced to luminance; values are scaled to [0, 1].
pub fn load_image(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    let bit_depth = match img.color().bits_per_pixel() / u16::from(img.color().channel_count()) {
        16 => 16,
        _ => 8,
    };
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    let mut data = Array2::<f32>::zeros((h as usize, w as usize));

    for (col, row, pixel) in gray.enumerate_pixels() {
        data[[row as usize, col as usize]] = pixel.0[0] as f32 / 65535.0;
    }

    Ok(Frame::new(data, bit_depth))
}
