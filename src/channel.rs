use crate::error::SourceError;
use crate::types::TimeInterval;
use std::ops::Range;

/// Read access to one channel of trace data.
pub trait ChannelSource: Sync {
    /// Network/station/location/channel label used in messages.
    fn name(&self) -> String;

    /// Milliseconds between samples.
    fn sample_interval_ms(&self) -> f64;

    /// Number of points the channel holds inside `interval`.
    fn data_length(&self, interval: &TimeInterval) -> usize;

    /// Contiguous samples over `interval`. Fails if the range holds a gap or
    /// no data at all.
    fn gapless_samples(&self, interval: &TimeInterval) -> Result<Vec<i32>, SourceError>;

    /// Per-channel processing bound. `None` defers to the configured one.
    fn max_data_length(&self) -> Option<usize> {
        None
    }
}

/// A channel held entirely in memory.
#[derive(Clone, Debug)]
pub struct MemoryChannel {
    pub name: String,
    pub start_ms: i64,
    pub sample_interval_ms: f64,
    pub samples: Vec<i32>,
    /// Ranges with no recorded data.
    pub gaps: Vec<TimeInterval>,
}

impl MemoryChannel {
    pub fn new(
        name: impl Into<String>,
        start_ms: i64,
        sample_interval_ms: f64,
        samples: Vec<i32>,
    ) -> Self {
        Self {
            name: name.into(),
            start_ms,
            sample_interval_ms,
            samples,
            gaps: Vec::new(),
        }
    }

    pub fn with_gap(mut self, gap: TimeInterval) -> Self {
        self.gaps.push(gap);
        self
    }

    /// Indices of the samples whose timestamps fall inside `interval`.
    fn index_range(&self, interval: &TimeInterval) -> Range<usize> {
        let to_index = |t: i64| {
            let pos = (t - self.start_ms) as f64 / self.sample_interval_ms;
            (pos.ceil().max(0.0) as usize).min(self.samples.len())
        };
        let first = to_index(interval.start_ms);
        let last = to_index(interval.end_ms);
        first..last.max(first)
    }
}

impl ChannelSource for MemoryChannel {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn sample_interval_ms(&self) -> f64 {
        self.sample_interval_ms
    }

    fn data_length(&self, interval: &TimeInterval) -> usize {
        self.index_range(interval).len()
    }

    fn gapless_samples(&self, interval: &TimeInterval) -> Result<Vec<i32>, SourceError> {
        let range = self.index_range(interval);
        if range.is_empty() {
            return Err(SourceError::NoData);
        }
        if let Some(gap) = self.gaps.iter().find(|g| g.overlaps(interval)) {
            return Err(SourceError::Gap {
                at_ms: gap.start_ms.max(interval.start_ms),
            });
        }
        Ok(self.samples[range].to_vec())
    }
}
