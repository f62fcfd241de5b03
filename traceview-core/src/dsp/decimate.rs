//! Sample-rate reconciliation for a pair of channels.
//!
//! Intervals are in milliseconds between samples. A channel is brought to the
//! slower interval with a rational resampler: zero-stuff by `up`, low-pass at
//! the target Nyquist, keep every `down`-th sample. The filter is applied in
//! polyphase form so the upsampled signal is never materialised.

/// Taps per side of the anti-alias filter, per unit of the larger factor.
const HALF_TAPS_PER_FACTOR: usize = 10;

/// Reduce an interval ratio to integer `(up, down)` factors.
///
/// Works on microseconds so fractional intervals (12.5 ms for 80 Hz) reduce
/// exactly.
pub fn resample_factors(native_ms: f64, target_ms: f64) -> (usize, usize) {
    let native_us = (native_ms * 1000.0).round().max(1.0) as u64;
    let target_us = (target_ms * 1000.0).round().max(1.0) as u64;
    let g = gcd(native_us, target_us);
    ((native_us / g) as usize, (target_us / g) as usize)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Resample integer samples from `native_ms` spacing to `target_ms` spacing.
///
/// Equal intervals return the input unchanged. Filtered values are cast back
/// to integers by truncation toward zero.
pub fn decimate(samples: &[i32], native_ms: f64, target_ms: f64) -> Vec<i32> {
    let (up, down) = resample_factors(native_ms, target_ms);
    if up == down || samples.is_empty() {
        return samples.to_vec();
    }

    let taps = lowpass_taps(up, down);
    let half = (taps.len() / 2) as isize;
    let up_i = up as isize;
    let up_len = (samples.len() * up) as isize;
    let out_len = (samples.len() * up).div_ceil(down);

    let mut output = Vec::with_capacity(out_len);
    for m in 0..out_len {
        // Position of this output sample on the upsampled grid
        let n = (m * down) as isize;
        let lo = (n - half).max(0);
        let hi = (n + half).min(up_len - 1);

        // Only every `up`-th upsampled point is non-zero: input index j sits at j*up
        let j_first = (lo + up_i - 1) / up_i;
        let j_last = hi / up_i;

        let mut acc = 0.0f64;
        for j in j_first..=j_last {
            let k = (n - j * up_i + half) as usize;
            acc += samples[j as usize] as f64 * taps[k];
        }
        output.push(acc as i32);
    }

    log::debug!(
        "Resampled {} points by {}/{} to {} points ({} ms -> {} ms)",
        samples.len(),
        up,
        down,
        output.len(),
        native_ms,
        target_ms
    );
    output
}

/// Hann-windowed sinc low-pass for the upsampled grid, DC gain `up`.
fn lowpass_taps(up: usize, down: usize) -> Vec<f64> {
    let factor = up.max(down);
    let half = HALF_TAPS_PER_FACTOR * factor;
    let size = 2 * half + 1;
    // Cutoff in cycles per upsampled sample
    let fc = 0.5 / factor as f64;

    let mut taps: Vec<f64> = (0..size)
        .map(|i| {
            let t = i as f64 - half as f64;
            let sinc = if t == 0.0 {
                1.0
            } else {
                let x = std::f64::consts::PI * 2.0 * fc * t;
                x.sin() / x
            };
            let hann =
                0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / (size - 1) as f64).cos());
            2.0 * fc * sinc * hann
        })
        .collect();

    let sum: f64 = taps.iter().sum();
    let scale = up as f64 / sum;
    for tap in taps.iter_mut() {
        *tap *= scale;
    }
    taps
}

/// A processed series after length bounding.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundedSeries {
    pub samples: Vec<i32>,
    /// True when the input exceeded the bound and was cut.
    pub truncated: bool,
}

/// Enforce the processing length bound.
///
/// Over-long input keeps its first `max_len` points inside a zero-filled buffer
/// of the next power of two at or above `max_len`.
pub fn bound_length(samples: Vec<i32>, max_len: usize) -> BoundedSeries {
    if samples.len() <= max_len {
        return BoundedSeries {
            samples,
            truncated: false,
        };
    }

    let mut bounded = vec![0i32; max_len.next_power_of_two()];
    bounded[..max_len].copy_from_slice(&samples[..max_len]);
    BoundedSeries {
        samples: bounded,
        truncated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(len: usize, interval_ms: f64, freq_hz: f64, amplitude: f64) -> Vec<i32> {
        (0..len)
            .map(|i| {
                let t = i as f64 * interval_ms / 1000.0;
                (amplitude * (2.0 * PI * freq_hz * t).sin()) as i32
            })
            .collect()
    }

    #[test]
    fn test_resample_factors_reduce() {
        assert_eq!(resample_factors(20.0, 50.0), (2, 5));
        assert_eq!(resample_factors(25.0, 25.0), (1, 1));
        assert_eq!(resample_factors(12.5, 25.0), (1, 2));
        assert_eq!(resample_factors(10.0, 1000.0), (1, 100));
    }

    #[test]
    fn test_equal_interval_is_identity() {
        let input = vec![3, -7, 12, 0, 44];
        assert_eq!(decimate(&input, 20.0, 20.0), input);
    }

    #[test]
    fn test_output_length_follows_ratio() {
        let input = vec![0i32; 2560];
        assert_eq!(decimate(&input, 20.0, 50.0).len(), 1024);

        let input = vec![0i32; 1001];
        assert_eq!(decimate(&input, 10.0, 20.0).len(), 501);
    }

    #[test]
    fn test_constant_level_survives_away_from_edges() {
        let input = vec![1000i32; 2000];
        let output = decimate(&input, 20.0, 50.0);
        // Edges lose taps; the interior must hold the level to within truncation
        for &v in &output[40..output.len() - 40] {
            assert!((v - 1000).abs() <= 1, "got {v}");
        }
    }

    #[test]
    fn test_passband_sine_keeps_amplitude() {
        // 0.5 Hz is far below the 10 Hz Nyquist of a 50 ms grid
        let input = sine(5000, 20.0, 0.5, 10_000.0);
        let output = decimate(&input, 20.0, 50.0);
        let peak = output[100..output.len() - 100]
            .iter()
            .map(|v| v.abs())
            .max()
            .unwrap();
        assert!((peak - 10_000).abs() < 200, "peak {peak}");
    }

    #[test]
    fn test_stopband_sine_is_attenuated() {
        // 20 Hz is above the 10 Hz Nyquist of a 50 ms grid
        let input = sine(5000, 20.0, 20.0, 10_000.0);
        let output = decimate(&input, 20.0, 50.0);
        let peak = output[100..output.len() - 100]
            .iter()
            .map(|v| v.abs())
            .max()
            .unwrap();
        assert!(peak < 500, "peak {peak}");
    }

    #[test]
    fn test_bound_length_short_input_untouched() {
        let bounded = bound_length(vec![1, 2, 3], 8);
        assert_eq!(bounded.samples, vec![1, 2, 3]);
        assert!(!bounded.truncated);
    }

    #[test]
    fn test_bound_length_pads_to_power_of_two() {
        let input: Vec<i32> = (1..=20).collect();
        let bounded = bound_length(input, 12);
        assert!(bounded.truncated);
        assert_eq!(bounded.samples.len(), 16);
        assert_eq!(&bounded.samples[..12], &(1..=12).collect::<Vec<_>>()[..]);
        assert!(bounded.samples[12..].iter().all(|&v| v == 0));
    }

    #[test]
    fn test_bound_length_exact_power_of_two() {
        let bounded = bound_length(vec![5; 40], 32);
        assert_eq!(bounded.samples, vec![5; 32]);
        assert!(bounded.truncated);
    }
}
