//! Error types for coherence computation

use thiserror::Error;
use traceview_core::SpectralError;

/// Result type for coherence operations
pub type CoherenceResult<T> = Result<T, CoherenceError>;

/// Reasons a channel source cannot hand out contiguous samples
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("gap in data at {at_ms} ms")]
    Gap { at_ms: i64 },

    #[error("no data in the requested interval")]
    NoData,
}

/// Broad grouping of [`CoherenceError`] for callers deciding how to report it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad selection by the user; fix the input and retry.
    UserInput,
    /// The data store could not supply the requested range.
    DataUnavailable,
    /// Inputs passed validation but could not be analysed.
    Processing,
    Config,
}

#[derive(Error, Debug)]
pub enum CoherenceError {
    /// Coherence is defined for a pair of channels only
    #[error("coherence needs exactly 2 channels, got {found}")]
    ChannelCount { found: usize },

    /// Too few points in the selected interval
    #[error(
        "{channel} has {samples} points in the selected interval (need at least {minimum}); select a longer dataset"
    )]
    InsufficientData {
        channel: String,
        samples: usize,
        minimum: usize,
    },

    /// Gap or missing data in the selected interval
    #[error("no contiguous data for {channel}: {source}")]
    DataUnavailable {
        channel: String,
        #[source]
        source: SourceError,
    },

    /// Processed series could not be segmented
    #[error("cannot analyse {channel}: {source}")]
    Spectral {
        channel: String,
        #[source]
        source: SpectralError,
    },

    /// The two channels did not produce matching Welch segments
    #[error(
        "channels disagree after segmenting: {x_segments} vs {y_segments} segments, window {x_len} vs {y_len}"
    )]
    SegmentMismatch {
        x_segments: usize,
        y_segments: usize,
        x_len: usize,
        y_len: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl CoherenceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoherenceError::ChannelCount { .. } | CoherenceError::InsufficientData { .. } => {
                ErrorKind::UserInput
            }
            CoherenceError::DataUnavailable { .. } => ErrorKind::DataUnavailable,
            CoherenceError::Spectral { .. } | CoherenceError::SegmentMismatch { .. } => {
                ErrorKind::Processing
            }
            CoherenceError::InvalidConfig(_) | CoherenceError::ConfigParse(_) => ErrorKind::Config,
        }
    }
}
