//! Welch cross-spectral coherence for pairs of seismic traces.
//!
//! The pipeline for one channel pair is
//! [`decimate`](dsp::decimate::decimate) → [`bound_length`](dsp::decimate::bound_length)
//! → [`welch_spectra`](dsp::welch::welch_spectra) per channel, then
//! [`accumulate`](dsp::cross_spectra::accumulate) and
//! [`compose`](dsp::compose::compose) once. Threading, validation and data
//! access live in the `traceview` crate.

pub mod dsp;
pub mod types;

pub use dsp::filter::SegmentFilter;
pub use dsp::freq_axis::{FrequencyAxis, ViewerFrequencyAxis};
pub use dsp::smoothing::{OctaveSmoother, Smoother};
pub use types::{
    CoherenceCurve, CoherenceSeries, CurvePoint, FreqParameters, SpectralAccumulators,
    SpectralError, SpectralFrame, WelchSpectra,
};
