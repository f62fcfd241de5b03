use realfft::num_complex::Complex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One-sided FFT of a single Welch segment.
pub type SpectralFrame = Vec<Complex<f64>>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpectralError {
    /// The processed series cannot hold even one segment of a usable length.
    #[error("series of {len} points is too short for spectral analysis (need at least {minimum})")]
    TooShort { len: usize, minimum: usize },
}

/// Welch output for one channel.
#[derive(Clone, Debug)]
pub struct WelchSpectra {
    /// Spectra in segment order, one per emitted window.
    pub frames: Vec<SpectralFrame>,
    /// Welch segment counter. Pre-counts the first window and skips the
    /// boundary-corrected tail window, so it is `frames.len() - 1` whenever the
    /// tail correction ran.
    pub segment_count: usize,
    /// Power-of-two window length used for every frame.
    pub segment_length: usize,
}

/// Averaged auto- and cross-spectra, all of the same one-sided length.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectralAccumulators {
    pub pxx: Vec<Complex<f64>>,
    pub pyy: Vec<Complex<f64>>,
    pub pxy: Vec<Complex<f64>>,
    pub pyx: Vec<Complex<f64>>,
}

impl SpectralAccumulators {
    /// Zeroed accumulators for `bins` frequency bins.
    pub fn zeroed(bins: usize) -> Self {
        let zero = vec![Complex::new(0.0, 0.0); bins];
        Self {
            pxx: zero.clone(),
            pyy: zero.clone(),
            pxy: zero.clone(),
            pyx: zero,
        }
    }

    pub fn len(&self) -> usize {
        self.pxx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pxx.is_empty()
    }
}

/// Frequency span handed back by a [`FrequencyAxis`](crate::dsp::freq_axis::FrequencyAxis).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FreqParameters {
    pub start_freq: f64,
    pub end_freq: f64,
    pub num_freq: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CurvePoint {
    /// Seconds (1 / frequency).
    pub period: f64,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoherenceSeries {
    pub name: &'static str,
    /// Sorted by ascending period.
    pub points: Vec<CurvePoint>,
}

impl CoherenceSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Raw and smoothed sqrt-coherence against period.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoherenceCurve {
    pub raw: CoherenceSeries,
    pub smoothed: CoherenceSeries,
}
