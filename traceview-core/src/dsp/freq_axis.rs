use crate::types::FreqParameters;

/// Resolves the frequency axis that labels a coherence spectrum.
pub trait FrequencyAxis: Sync {
    /// Frequency span for a spectrum built from `num_samples` points at
    /// `sample_freq` Hz.
    fn freq_parameters(&self, num_samples: usize, sample_freq: f64) -> FreqParameters;

    /// Expand a span into explicit frequencies, ascending.
    fn frequencies(&self, params: &FreqParameters) -> Vec<f64> {
        generate_freq_array(params.start_freq, params.end_freq, params.num_freq, false)
    }
}

/// The trace viewer's response-plot convention: `num_samples / 2` points from
/// one bin width up to Nyquist. The zero-frequency bin is never labelled, so
/// every point has a finite period.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewerFrequencyAxis;

impl FrequencyAxis for ViewerFrequencyAxis {
    fn freq_parameters(&self, num_samples: usize, sample_freq: f64) -> FreqParameters {
        let end_freq = sample_freq / 2.0;
        let num_freq = num_samples / 2;
        let start_freq = if num_freq > 0 {
            end_freq / num_freq as f64
        } else {
            end_freq
        };
        FreqParameters {
            start_freq,
            end_freq,
            num_freq,
        }
    }
}

/// `num` frequencies between `start` and `end` inclusive.
///
/// Linear or logarithmic spacing; the order follows `start` to `end`, so a
/// descending array comes from passing `start > end`.
pub fn generate_freq_array(start: f64, end: f64, num: usize, log_spacing: bool) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = (num - 1) as f64;
            if log_spacing {
                let (ls, le) = (start.ln(), end.ln());
                let step = (le - ls) / last;
                (0..num).map(|i| (ls + step * i as f64).exp()).collect()
            } else {
                let step = (end - start) / last;
                (0..num).map(|i| start + step * i as f64).collect()
            }
        }
    }
}
