use serde::{Deserialize, Serialize};
use traceview_core::CoherenceCurve;

/// Half-open time range `[start_ms, end_ms)` in epoch milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeInterval {
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start_ms < other.end_ms && other.start_ms < self.end_ms
    }
}

/// Non-fatal conditions met during a run, for the caller to surface.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum CoherenceWarning {
    /// The channels had different sample intervals; the faster one was
    /// downsampled to `target_ms`.
    RateMismatch {
        channel_a: String,
        interval_a_ms: f64,
        channel_b: String,
        interval_b_ms: f64,
        target_ms: f64,
    },
    /// A channel had more points than the processing bound and was cut.
    Truncated {
        channel: String,
        points: usize,
        max_points: usize,
    },
    /// Raw coherence bins that came out as NaN or infinite.
    NonFiniteBins { count: usize },
}

/// Result of a coherence run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoherenceOutput {
    pub curve: CoherenceCurve,
    /// Span actually analysed. May be shorter than the request when a
    /// channel hit the processing bound.
    pub effective_interval: TimeInterval,
    /// Largest processed series length across the two channels.
    pub effective_length: usize,
    /// Interval both channels were analysed at.
    pub sample_interval_ms: f64,
    pub segment_count: usize,
    pub warnings: Vec<CoherenceWarning>,
}
