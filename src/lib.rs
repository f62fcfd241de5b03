//! Spectral coherence between two trace channels.
//!
//! [`compute_coherence`] validates a two-channel selection, downsamples the
//! faster channel to the slower rate, runs both Welch pipelines in parallel
//! and returns raw and smoothed sqrt-coherence against period. The numeric
//! stages live in [`traceview_core`].

pub mod channel;
pub mod coherence;
pub mod config;
pub mod error;
pub mod types;

pub use channel::{ChannelSource, MemoryChannel};
pub use coherence::{compute_coherence, CoherenceEstimator};
pub use config::CoherenceConfig;
pub use error::{CoherenceError, CoherenceResult, ErrorKind, SourceError};
pub use types::{CoherenceOutput, CoherenceWarning, TimeInterval};

pub use traceview_core::{
    CoherenceCurve, CoherenceSeries, CurvePoint, FreqParameters, FrequencyAxis, OctaveSmoother,
    SegmentFilter, Smoother, ViewerFrequencyAxis,
};
