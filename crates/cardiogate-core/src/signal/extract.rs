use std::time::Instant;

use ndarray::Array2;
use num_complex::Complex;
use rayon::prelude::*;
use rustfft::FftPlanner;
use tracing::debug;

use crate::consts::{BLUR_TOP_FRACTION, PARALLEL_FRAME_THRESHOLD};
use crate::frame::Frame;

/// Pearson correlation between each frame and its successor.
///
/// The last frame has no successor and gets 0.0 so the output length matches
/// the frame count. A constant frame has no defined correlation and yields
/// NaN; normalization repairs it downstream.
pub fn correlation(frames: &[Frame]) -> Vec<f64> {
    let start = Instant::now();
    let pairs = frames.len().saturating_sub(1);

    let mut values: Vec<f64> = if frames.len() >= PARALLEL_FRAME_THRESHOLD {
        (0..pairs)
            .into_par_iter()
            .map(|i| pearson(&frames[i].data, &frames[i + 1].data))
            .collect()
    } else {
        (0..pairs)
            .map(|i| pearson(&frames[i].data, &frames[i + 1].data))
            .collect()
    };
    if !frames.is_empty() {
        values.push(0.0);
    }

    debug!(frames = frames.len(), elapsed = ?start.elapsed(), "correlation signal");
    values
}

/// Pearson correlation of two equally-sized arrays, flattened.
///
/// Mismatched sizes or zero variance give NaN.
pub fn pearson(a: &Array2<f32>, b: &Array2<f32>) -> f64 {
    if a.dim() != b.dim() || a.is_empty() {
        return f64::NAN;
    }
    let n = a.len() as f64;
    let mean_a = a.iter().map(|&v| v as f64).sum::<f64>() / n;
    let mean_b = b.iter().map(|&v| v as f64).sum::<f64>() / n;

    let mut cov = 0.0f64;
    let mut var_a = 0.0f64;
    let mut var_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let dx = x as f64 - mean_a;
        let dy = y as f64 - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (cov / denom).clamp(-1.0, 1.0)
}

/// Blur score per frame: mean of the largest 10% FFT magnitudes.
///
/// Sharp frames carry more high-frequency energy and score higher.
pub fn blur(frames: &[Frame]) -> Vec<f64> {
    let start = Instant::now();
    let values = if frames.len() >= PARALLEL_FRAME_THRESHOLD {
        frames.par_iter().map(|f| blur_score(&f.data)).collect()
    } else {
        frames.iter().map(|f| blur_score(&f.data)).collect()
    };
    debug!(frames = frames.len(), elapsed = ?start.elapsed(), "blur signal");
    values
}

/// Blur score of a single array.
pub fn blur_score(data: &Array2<f32>) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let spectrum = fft_shift(&fft2d(data));
    let mut magnitudes: Vec<f64> = spectrum.iter().map(|c| c.norm()).collect();

    let n = magnitudes.len();
    let threshold_index = ((1.0 - BLUR_TOP_FRACTION) * n as f64) as usize;
    let threshold_index = threshold_index.min(n - 1);
    magnitudes.select_nth_unstable_by(threshold_index, |a, b| a.total_cmp(b));

    let top = &magnitudes[threshold_index..];
    top.iter().sum::<f64>() / top.len() as f64
}

/// 2D FFT: row-wise FFT, then column-wise FFT.
fn fft2d(data: &Array2<f32>) -> Array2<Complex<f64>> {
    let (h, w) = data.dim();
    let mut planner = FftPlanner::new();
    let fft_row = planner.plan_fft_forward(w);
    let fft_col = planner.plan_fft_forward(h);

    let mut result = data.mapv(|v| Complex::new(v as f64, 0.0));

    for mut row in result.rows_mut() {
        let mut row_data: Vec<Complex<f64>> = row.to_vec();
        fft_row.process(&mut row_data);
        row.assign(&ndarray::ArrayView1::from(&row_data));
    }

    for mut col in result.columns_mut() {
        let mut col_data: Vec<Complex<f64>> = col.to_vec();
        fft_col.process(&mut col_data);
        col.assign(&ndarray::ArrayView1::from(&col_data));
    }

    result
}

/// Move the zero-frequency bin to the centre of the spectrum.
fn fft_shift(data: &Array2<Complex<f64>>) -> Array2<Complex<f64>> {
    let (h, w) = data.dim();
    let (sh, sw) = (h / 2, w / 2);
    Array2::from_shape_fn((h, w), |(row, col)| {
        data[[(row + h - sh) % h, (col + w - sw) % w]]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fft_shift_centres_dc() {
        let mut spectrum = Array2::<Complex<f64>>::zeros((4, 4));
        spectrum[[0, 0]] = Complex::new(1.0, 0.0);
        let shifted = fft_shift(&spectrum);
        assert_eq!(shifted[[2, 2]].re, 1.0);
    }

    #[test]
    fn fft_of_constant_is_dc_only() {
        let data = Array2::from_elem((4, 4), 0.5f32);
        let spectrum = fft2d(&data);
        assert!((spectrum[[0, 0]].re - 8.0).abs() < 1e-9);
        assert!(spectrum[[1, 2]].norm() < 1e-9);
    }
}
