use serde::{Deserialize, Serialize};

/// Smooths an amplitude spectrum sampled on a monotonic frequency grid.
pub trait Smoother: Sync {
    /// Returns a series of the same length as `values`.
    fn smooth(&self, frequencies: &[f64], values: &[f64]) -> Vec<f64>;
}

/// Fractional-octave boxcar mean.
///
/// Each output point is the mean of every input point whose frequency lies
/// within `1 / (2 * fraction)` octave on either side of it. A window that
/// contains a non-finite value yields NaN.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OctaveSmoother {
    /// Window width is `1 / fraction` octave.
    pub fraction: f64,
}

impl Default for OctaveSmoother {
    fn default() -> Self {
        Self { fraction: 8.0 }
    }
}

impl Smoother for OctaveSmoother {
    fn smooth(&self, frequencies: &[f64], values: &[f64]) -> Vec<f64> {
        assert_eq!(frequencies.len(), values.len(), "frequency/value length mismatch");
        if frequencies.first() > frequencies.last() {
            let freqs: Vec<f64> = frequencies.iter().rev().copied().collect();
            let vals: Vec<f64> = values.iter().rev().copied().collect();
            let mut smoothed = self.smooth(&freqs, &vals);
            smoothed.reverse();
            return smoothed;
        }
        debug_assert!(frequencies.windows(2).all(|w| w[0] <= w[1]));

        // Prefix sums over finite values plus a running count of the rest
        let mut sums = Vec::with_capacity(values.len() + 1);
        let mut bad = Vec::with_capacity(values.len() + 1);
        sums.push(0.0f64);
        bad.push(0usize);
        for &v in values {
            let (s, b) = (sums[sums.len() - 1], bad[bad.len() - 1]);
            if v.is_finite() {
                sums.push(s + v);
                bad.push(b);
            } else {
                sums.push(s);
                bad.push(b + 1);
            }
        }

        let ratio = 2f64.powf(0.5 / self.fraction);
        frequencies
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                let (low, high) = (f / ratio, f * ratio);
                let lo = frequencies.partition_point(|&x| x < low).min(i);
                let hi = frequencies.partition_point(|&x| x <= high).max(i + 1);
                if bad[hi] > bad[lo] {
                    f64::NAN
                } else {
                    (sums[hi] - sums[lo]) / (hi - lo) as f64
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn linear_freqs(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64 * 0.1).collect()
    }

    #[test]
    fn test_constant_is_unchanged() {
        let freqs = linear_freqs(200);
        let values = vec![0.75; 200];
        let smoothed = OctaveSmoother::default().smooth(&freqs, &values);
        assert_eq!(smoothed.len(), 200);
        for v in smoothed {
            assert_abs_diff_eq!(v, 0.75, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_low_bins_are_untouched_on_linear_grid() {
        // Below ~11 bins a 1/8-octave window holds only the bin itself
        let freqs = linear_freqs(100);
        let values: Vec<f64> = (0..100).map(|i| (i % 2) as f64).collect();
        let smoothed = OctaveSmoother::default().smooth(&freqs, &values);
        for i in 0..5 {
            assert_abs_diff_eq!(smoothed[i], values[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_alternating_values_average_out_at_high_bins() {
        let freqs = linear_freqs(1000);
        let values: Vec<f64> = (0..1000).map(|i| (i % 2) as f64).collect();
        let smoothed = OctaveSmoother::default().smooth(&freqs, &values);
        for &v in &smoothed[500..] {
            assert!((v - 0.5).abs() < 0.05, "got {v}");
        }
    }

    #[test]
    fn test_descending_grid_matches_ascending() {
        let freqs = linear_freqs(300);
        let values: Vec<f64> = (0..300).map(|i| ((i * 13) % 7) as f64).collect();
        let ascending = OctaveSmoother::default().smooth(&freqs, &values);

        let rev_freqs: Vec<f64> = freqs.iter().rev().copied().collect();
        let rev_values: Vec<f64> = values.iter().rev().copied().collect();
        let mut descending = OctaveSmoother::default().smooth(&rev_freqs, &rev_values);
        descending.reverse();
        assert_eq!(ascending, descending);
    }

    #[test]
    fn test_nan_stays_local() {
        let freqs = linear_freqs(1000);
        let mut values = vec![1.0; 1000];
        values[900] = f64::NAN;
        let smoothed = OctaveSmoother::default().smooth(&freqs, &values);
        assert!(smoothed[900].is_nan());
        assert!(smoothed[100].is_finite());
        assert_abs_diff_eq!(smoothed[100], 1.0, epsilon = 1e-12);
    }
}
