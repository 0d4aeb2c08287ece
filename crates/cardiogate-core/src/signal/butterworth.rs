//! Butterworth band-pass design and zero-phase (forward-backward) filtering.
//!
//! The design follows the classic analog-prototype route: poles of the
//! order-N lowpass prototype on the unit circle, lowpass-to-bandpass
//! transform at pre-warped cutoffs, bilinear transform to the z-plane, and
//! expansion of zeros/poles into transfer-function coefficients.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex;

use crate::error::{GatingError, Result};

/// Transfer-function coefficients, `a[0] == 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterCoefficients {
    pub b: Vec<f64>,
    pub a: Vec<f64>,
}

impl FilterCoefficients {
    /// Number of edge samples mirrored on each side by [`filtfilt`].
    pub fn pad_len(&self) -> usize {
        3 * self.a.len().max(self.b.len())
    }
}

/// Design an order-`order` Butterworth band-pass.
///
/// `low` and `high` are cutoffs relative to the Nyquist frequency and must
/// satisfy `0 < low < high < 1`. The result has `2 * order + 1` coefficients
/// in each polynomial.
pub fn butter_bandpass(order: usize, low: f64, high: f64) -> Result<FilterCoefficients> {
    if order == 0 {
        return Err(GatingError::InvalidFilter("order must be at least 1".into()));
    }
    if !(low > 0.0 && low < high && high < 1.0) {
        return Err(GatingError::InvalidFilter(format!(
            "normalized cutoffs must satisfy 0 < low < high < 1 (got {low:.4}, {high:.4})"
        )));
    }

    // Analog lowpass prototype: poles on the left half of the unit circle.
    let n = order as f64;
    let proto: Vec<Complex<f64>> = (0..order)
        .map(|k| {
            let m = -(n - 1.0) + 2.0 * k as f64;
            -Complex::from_polar(1.0, std::f64::consts::PI * m / (2.0 * n))
        })
        .collect();

    // Pre-warp for the bilinear transform at fs = 2.
    let fs = 2.0;
    let w1 = 2.0 * fs * (std::f64::consts::PI * low / fs).tan();
    let w2 = 2.0 * fs * (std::f64::consts::PI * high / fs).tan();
    let bw = w2 - w1;
    let wo = (w1 * w2).sqrt();

    // Lowpass to bandpass: each prototype pole splits into two, N zeros at 0.
    let mut poles = Vec::with_capacity(2 * order);
    for &p in &proto {
        let p_lp = p * (bw / 2.0);
        let root = (p_lp * p_lp - wo * wo).sqrt();
        poles.push(p_lp + root);
        poles.push(p_lp - root);
    }
    let zeros_s = vec![Complex::new(0.0, 0.0); order];
    let gain_s = bw.powi(order as i32);

    // Bilinear transform; the N missing zeros land at z = -1.
    let fs2 = 2.0 * fs;
    let mut zeros: Vec<Complex<f64>> = zeros_s.iter().map(|&z| (fs2 + z) / (fs2 - z)).collect();
    zeros.extend(std::iter::repeat_n(Complex::new(-1.0, 0.0), order));
    let poles_z: Vec<Complex<f64>> = poles.iter().map(|&p| (fs2 + p) / (fs2 - p)).collect();

    let num: Complex<f64> = zeros_s.iter().map(|&z| fs2 - z).product();
    let den: Complex<f64> = poles.iter().map(|&p| fs2 - p).product();
    let gain = gain_s * (num / den).re;

    let b = poly(&zeros).into_iter().map(|c| c.re * gain).collect();
    let a = poly(&poles_z).into_iter().map(|c| c.re).collect();
    Ok(FilterCoefficients { b, a })
}

/// Expand `prod(x - r)` into coefficients, highest power first.
fn poly(roots: &[Complex<f64>]) -> Vec<Complex<f64>> {
    let mut coeffs = vec![Complex::new(1.0, 0.0)];
    for &r in roots {
        let mut next = vec![Complex::new(0.0, 0.0); coeffs.len() + 1];
        for (i, &c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * r;
        }
        coeffs = next;
    }
    coeffs
}

/// Direct-form II transposed IIR filter with initial state `zi`.
pub fn lfilter(coeffs: &FilterCoefficients, x: &[f64], zi: &[f64]) -> Vec<f64> {
    let FilterCoefficients { b, a } = coeffs;
    let order = a.len().max(b.len()) - 1;
    let mut z = zi.to_vec();
    z.resize(order, 0.0);

    let coef = |v: &Vec<f64>, i: usize| v.get(i).copied().unwrap_or(0.0);

    let mut y = Vec::with_capacity(x.len());
    for &xn in x {
        let yn = coef(b, 0) * xn + z.first().copied().unwrap_or(0.0);
        for i in 0..order {
            let carry = if i + 1 < order { z[i + 1] } else { 0.0 };
            z[i] = coef(b, i + 1) * xn + carry - coef(a, i + 1) * yn;
        }
        y.push(yn);
    }
    y
}

/// Steady-state initial conditions for a unit step input.
///
/// Solves `(I - A^T) zi = b[1..] - a[1..] * b[0]` where `A` is the companion
/// matrix of `a`.
pub fn lfilter_zi(coeffs: &FilterCoefficients) -> Result<Vec<f64>> {
    let FilterCoefficients { b, a } = coeffs;
    let n = a.len().max(b.len());
    if n < 2 {
        return Ok(Vec::new());
    }
    let a0 = a[0];
    let mut a_full: Vec<f64> = a.iter().map(|v| v / a0).collect();
    let mut b_full: Vec<f64> = b.iter().map(|v| v / a0).collect();
    a_full.resize(n, 0.0);
    b_full.resize(n, 0.0);

    let m = n - 1;
    let mut i_minus_a = DMatrix::<f64>::identity(m, m);
    // companion(a).T: first column is -a[1..], superdiagonal ones.
    for row in 0..m {
        i_minus_a[(row, 0)] += a_full[row + 1];
        if row + 1 < m {
            i_minus_a[(row, row + 1)] -= 1.0;
        }
    }
    let rhs = DVector::from_iterator(m, (1..n).map(|i| b_full[i] - a_full[i] * b_full[0]));

    i_minus_a
        .lu()
        .solve(&rhs)
        .map(|zi| zi.iter().copied().collect())
        .ok_or_else(|| GatingError::InvalidFilter("singular initial-state system".into()))
}

/// Zero-phase filtering: forward pass, then backward pass over the reversed
/// output, with odd extension of `pad_len` samples at both ends.
///
/// The signal must be longer than the pad length.
pub fn filtfilt(coeffs: &FilterCoefficients, x: &[f64]) -> Result<Vec<f64>> {
    let pad = coeffs.pad_len();
    if x.len() <= pad {
        return Err(GatingError::InsufficientSamples {
            len: x.len(),
            required: pad,
        });
    }

    let ext = odd_extend(x, pad);
    let zi = lfilter_zi(coeffs)?;

    let x0 = ext[0];
    let forward = lfilter(coeffs, &ext, &zi.iter().map(|z| z * x0).collect::<Vec<_>>());

    let mut reversed: Vec<f64> = forward.into_iter().rev().collect();
    let y0 = reversed[0];
    reversed = lfilter(coeffs, &reversed, &zi.iter().map(|z| z * y0).collect::<Vec<_>>());
    reversed.reverse();

    Ok(reversed[pad..pad + x.len()].to_vec())
}

/// Point-symmetric extension about both end samples.
fn odd_extend(x: &[f64], pad: usize) -> Vec<f64> {
    let n = x.len();
    let first = x[0];
    let last = x[n - 1];
    let mut ext = Vec::with_capacity(n + 2 * pad);
    ext.extend((1..=pad).rev().map(|i| 2.0 * first - x[i]));
    ext.extend_from_slice(x);
    ext.extend((1..=pad).map(|i| 2.0 * last - x[n - 1 - i]));
    ext
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poly_expands_roots() {
        let c = poly(&[Complex::new(1.0, 0.0), Complex::new(2.0, 0.0)]);
        let re: Vec<f64> = c.iter().map(|v| v.re).collect();
        assert_eq!(re, vec![1.0, -3.0, 2.0]);
    }

    #[test]
    fn odd_extension_mirrors_about_ends() {
        let ext = odd_extend(&[1.0, 2.0, 4.0, 7.0], 2);
        assert_eq!(ext, vec![-2.0, 0.0, 1.0, 2.0, 4.0, 7.0, 10.0, 12.0]);
    }

    #[test]
    fn first_order_bandpass_has_expected_shape() {
        let c = butter_bandpass(1, 0.2, 0.4).unwrap();
        assert_eq!(c.b.len(), 3);
        assert_eq!(c.a.len(), 3);
        // Band-pass zeros at z = 1 and z = -1: b is antisymmetric around the middle.
        assert!((c.b[0] + c.b[2]).abs() < 1e-12);
        assert!(c.b[1].abs() < 1e-12);
        assert!((c.a[0] - 1.0).abs() < 1e-12);
    }
}
