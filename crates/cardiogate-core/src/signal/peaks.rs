//! Local extrema with height and spacing constraints.

/// Peak-detection thresholds.
#[derive(Clone, Debug, PartialEq)]
pub struct PeakParams {
    /// Percentile (0..=100) of the signal used as the minimum peak height.
    pub min_height_percentile: f64,
    /// Minimum index distance between kept peaks (at least 1).
    pub min_distance: usize,
}

/// Sorted extrema (maxima and minima) and the maxima alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extrema {
    pub all: Vec<usize>,
    pub maxima: Vec<usize>,
}

/// Find the extrema of a signal.
///
/// NaN and infinite samples count as 0. The minimum height is the
/// `min_height_percentile` percentile of the signal; maxima must reach it,
/// and minima are the peaks of the negated signal held to the same height.
/// Both lists are thinned to `min_distance`, and so is their union.
pub fn identify_extrema(signal: &[f64], params: &PeakParams) -> Extrema {
    let clean: Vec<f64> = signal
        .iter()
        .map(|&v| if v.is_finite() { v } else { 0.0 })
        .collect();
    if clean.len() < 3 {
        return Extrema::default();
    }

    let min_height = percentile(&clean, params.min_height_percentile);
    let negated: Vec<f64> = clean.iter().map(|v| -v).collect();

    let maxima = find_peaks(&clean, min_height, params.min_distance);
    let minima = find_peaks(&negated, min_height, params.min_distance);

    let mut union: Vec<usize> = maxima.iter().chain(minima.iter()).copied().collect();
    union.sort_unstable();
    union.dedup();
    let magnitude: Vec<f64> = clean.iter().map(|v| v.abs()).collect();
    let all = select_by_distance(&union, &magnitude, params.min_distance);

    Extrema { all, maxima }
}

/// Local maxima at least `min_height` high, at least `distance` apart.
///
/// A flat peak counts once, at its middle sample (rounded down). The first and
/// last samples are never peaks.
pub fn find_peaks(x: &[f64], min_height: f64, distance: usize) -> Vec<usize> {
    let peaks: Vec<usize> = local_maxima(x)
        .into_iter()
        .filter(|&i| x[i] >= min_height)
        .collect();
    select_by_distance(&peaks, x, distance)
}

fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if x.len() < 3 {
        return peaks;
    }
    let i_max = x.len() - 1;
    let mut i = 1;
    while i < i_max {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < i_max && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// Keep the highest of `peaks` first, dropping any peak closer than
/// `distance` to one already kept. `peaks` must be sorted; output is sorted.
pub fn select_by_distance(peaks: &[usize], priority: &[f64], distance: usize) -> Vec<usize> {
    if distance <= 1 || peaks.len() < 2 {
        return peaks.to_vec();
    }

    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| priority[peaks[a]].total_cmp(&priority[peaks[b]]));

    let mut keep = vec![true; peaks.len()];
    for &j in order.iter().rev() {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }
        let mut k = j + 1;
        while k < peaks.len() && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}

/// Linear-interpolated percentile (`q` in 0..=100) of the values.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = q.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plateau_resolves_to_middle() {
        let x = [0.0, 1.0, 1.0, 1.0, 0.0];
        assert_eq!(local_maxima(&x), vec![2]);
        let x = [0.0, 1.0, 1.0, 0.0];
        assert_eq!(local_maxima(&x), vec![1]);
    }

    #[test]
    fn edges_are_not_peaks() {
        let x = [3.0, 1.0, 2.0, 1.0, 3.0];
        assert_eq!(local_maxima(&x), vec![2]);
    }

    #[test]
    fn distance_keeps_highest() {
        let x = [0.0, 2.0, 0.0, 5.0, 0.0, 1.0, 0.0];
        assert_eq!(find_peaks(&x, 0.0, 3), vec![3]);
        assert_eq!(find_peaks(&x, 0.0, 2), vec![1, 3, 5]);
    }

    #[test]
    fn percentile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&v, 50.0) - 2.5).abs() < 1e-12);
        assert_eq!(percentile(&v, 0.0), 1.0);
        assert_eq!(percentile(&v, 100.0), 4.0);
    }
}
