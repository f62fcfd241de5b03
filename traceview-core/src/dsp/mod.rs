pub mod compose;
pub mod cross_spectra;
pub mod decimate;
pub mod fft;
pub mod filter;
pub mod freq_axis;
pub mod smoothing;
pub mod welch;
