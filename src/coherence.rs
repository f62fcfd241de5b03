//! Two-channel coherence driver.
//!
//! Validates the selection, brings both channels to a common sample
//! interval, runs their Welch pipelines side by side and combines the
//! resulting spectra into a coherence curve.

use crate::channel::ChannelSource;
use crate::config::CoherenceConfig;
use crate::error::{CoherenceError, CoherenceResult};
use crate::types::{CoherenceOutput, CoherenceWarning, TimeInterval};
use traceview_core::dsp::compose::compose;
use traceview_core::dsp::cross_spectra::accumulate;
use traceview_core::dsp::decimate::{bound_length, decimate};
use traceview_core::dsp::welch::welch_spectra;
use traceview_core::{
    FrequencyAxis, OctaveSmoother, SegmentFilter, Smoother, ViewerFrequencyAxis, WelchSpectra,
};

/// Welch output for one channel plus what it took to get there.
struct ChannelSpectra {
    spectra: WelchSpectra,
    processed_len: usize,
    truncated: Option<CoherenceWarning>,
}

/// Coherence estimator with pluggable frequency axis and smoothing.
pub struct CoherenceEstimator<A = ViewerFrequencyAxis, S = OctaveSmoother> {
    config: CoherenceConfig,
    axis: A,
    smoother: S,
}

impl CoherenceEstimator {
    /// Viewer frequency axis, smoothing taken from `config`.
    pub fn new(config: CoherenceConfig) -> Self {
        let smoother = config.smoothing;
        Self {
            config,
            axis: ViewerFrequencyAxis,
            smoother,
        }
    }
}

impl Default for CoherenceEstimator {
    fn default() -> Self {
        Self::new(CoherenceConfig::default())
    }
}

impl<A: FrequencyAxis, S: Smoother> CoherenceEstimator<A, S> {
    pub fn with_axis<B: FrequencyAxis>(self, axis: B) -> CoherenceEstimator<B, S> {
        CoherenceEstimator {
            config: self.config,
            axis,
            smoother: self.smoother,
        }
    }

    pub fn with_smoother<T: Smoother>(self, smoother: T) -> CoherenceEstimator<A, T> {
        CoherenceEstimator {
            config: self.config,
            axis: self.axis,
            smoother,
        }
    }

    pub fn config(&self) -> &CoherenceConfig {
        &self.config
    }

    /// Coherence between `channels[0]` and `channels[1]` over `interval`.
    ///
    /// `filter`, when given, is applied to every Welch window of both
    /// channels before its FFT.
    pub fn compute(
        &self,
        channels: &[&dyn ChannelSource],
        interval: &TimeInterval,
        filter: Option<&dyn SegmentFilter>,
    ) -> CoherenceResult<CoherenceOutput> {
        // Cheap checks first; nothing below runs on a bad selection
        if channels.len() != 2 {
            return Err(CoherenceError::ChannelCount {
                found: channels.len(),
            });
        }
        let (a, b) = (channels[0], channels[1]);

        for channel in [a, b] {
            let samples = channel.data_length(interval);
            if samples < self.config.min_samples {
                return Err(CoherenceError::InsufficientData {
                    channel: channel.name(),
                    samples,
                    minimum: self.config.min_samples,
                });
            }
        }

        let mut warnings = Vec::new();

        // Larger interval = slower channel; the faster one gets downsampled
        let (interval_a, interval_b) = (a.sample_interval_ms(), b.sample_interval_ms());
        let target_ms = interval_a.max(interval_b);
        if interval_a != interval_b {
            log::warn!(
                "Channel sample intervals do not match ({} = {} ms, {} = {} ms); downsampling to {} ms",
                a.name(),
                interval_a,
                b.name(),
                interval_b,
                target_ms
            );
            warnings.push(CoherenceWarning::RateMismatch {
                channel_a: a.name(),
                interval_a_ms: interval_a,
                channel_b: b.name(),
                interval_b_ms: interval_b,
                target_ms,
            });
        }

        // Each result lands in its own slot regardless of which side finishes first
        let (x, y) = rayon::join(
            || self.process_channel(a, interval, target_ms, filter),
            || self.process_channel(b, interval, target_ms, filter),
        );
        let (x, y) = (x?, y?);

        warnings.extend(x.truncated.clone());
        warnings.extend(y.truncated.clone());
        let effective_length = x.processed_len.max(y.processed_len);

        if x.spectra.frames.len() != y.spectra.frames.len()
            || x.spectra.segment_count != y.spectra.segment_count
            || x.spectra.segment_length != y.spectra.segment_length
        {
            return Err(CoherenceError::SegmentMismatch {
                x_segments: x.spectra.segment_count,
                y_segments: y.spectra.segment_count,
                x_len: x.spectra.segment_length,
                y_len: y.spectra.segment_length,
            });
        }

        let acc = accumulate(&x.spectra.frames, &y.spectra.frames, x.spectra.segment_count);
        let curve = compose(&acc, target_ms, &self.axis, &self.smoother);

        // Non-finite bins stay in the curve; only their count is reported
        let non_finite = curve
            .raw
            .points
            .iter()
            .filter(|p| !p.value.is_finite())
            .count();
        if non_finite > 0 {
            log::warn!("{} of {} coherence bins are not finite", non_finite, curve.raw.len());
            warnings.push(CoherenceWarning::NonFiniteBins { count: non_finite });
        }

        let effective_interval = TimeInterval::new(
            interval.start_ms,
            interval.start_ms + (target_ms * effective_length as f64) as i64,
        );

        log::info!(
            "Coherence {} / {}: {} bins from {} segments of {} points at {} ms",
            a.name(),
            b.name(),
            curve.raw.len(),
            x.spectra.segment_count,
            x.spectra.segment_length,
            target_ms
        );

        Ok(CoherenceOutput {
            curve,
            effective_interval,
            effective_length,
            sample_interval_ms: target_ms,
            segment_count: x.spectra.segment_count,
            warnings,
        })
    }

    /// Fetch, downsample, bound and segment one channel.
    fn process_channel(
        &self,
        channel: &dyn ChannelSource,
        interval: &TimeInterval,
        target_ms: f64,
        filter: Option<&dyn SegmentFilter>,
    ) -> CoherenceResult<ChannelSpectra> {
        let name = channel.name();
        let raw = channel
            .gapless_samples(interval)
            .map_err(|source| CoherenceError::DataUnavailable {
                channel: name.clone(),
                source,
            })?;

        let resampled = decimate(&raw, channel.sample_interval_ms(), target_ms);
        let max_len = channel
            .max_data_length()
            .unwrap_or(self.config.max_data_length);
        let resampled_len = resampled.len();
        let bounded = bound_length(resampled, max_len);

        let truncated = if bounded.truncated {
            log::warn!(
                "Points count ({}) exceeds max value ({}) for trace {}",
                resampled_len,
                max_len,
                name
            );
            Some(CoherenceWarning::Truncated {
                channel: name.clone(),
                points: resampled_len,
                max_points: max_len,
            })
        } else {
            None
        };

        let processed_len = bounded.samples.len();
        let spectra = welch_spectra(&bounded.samples, filter, target_ms).map_err(|source| {
            CoherenceError::Spectral {
                channel: name.clone(),
                source,
            }
        })?;

        log::debug!(
            "{}: {} raw points, {} processed, window {}, {} segments",
            name,
            raw.len(),
            processed_len,
            spectra.segment_length,
            spectra.segment_count
        );

        Ok(ChannelSpectra {
            spectra,
            processed_len,
            truncated,
        })
    }
}

/// Coherence with the default configuration, axis and smoothing.
pub fn compute_coherence(
    channels: &[&dyn ChannelSource],
    interval: &TimeInterval,
    filter: Option<&dyn SegmentFilter>,
) -> CoherenceResult<CoherenceOutput> {
    let estimator: CoherenceEstimator = CoherenceEstimator::default();
    estimator.compute(channels, interval, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MemoryChannel;
    use crate::error::SourceError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Wraps a channel and counts sample fetches.
    struct CountingChannel {
        inner: MemoryChannel,
        fetches: AtomicUsize,
    }

    impl CountingChannel {
        fn new(inner: MemoryChannel) -> Self {
            Self {
                inner,
                fetches: AtomicUsize::new(0),
            }
        }
    }

    impl ChannelSource for CountingChannel {
        fn name(&self) -> String {
            self.inner.name()
        }
        fn sample_interval_ms(&self) -> f64 {
            self.inner.sample_interval_ms()
        }
        fn data_length(&self, interval: &TimeInterval) -> usize {
            self.inner.data_length(interval)
        }
        fn gapless_samples(&self, interval: &TimeInterval) -> Result<Vec<i32>, SourceError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.gapless_samples(interval)
        }
    }

    fn noise_like(len: usize, seed: i64) -> Vec<i32> {
        (0..len as i64)
            .map(|i| (((i * 7919 + seed * 104_729) % 2003) - 1001) as i32)
            .collect()
    }

    #[test]
    fn test_short_channel_does_no_spectral_work() {
        let a = CountingChannel::new(MemoryChannel::new("A", 0, 20.0, noise_like(16, 1)));
        let b = CountingChannel::new(MemoryChannel::new("B", 0, 20.0, noise_like(1024, 2)));
        let err = compute_coherence(&[&a, &b], &TimeInterval::new(0, 20_480), None).unwrap_err();
        assert!(matches!(
            err,
            CoherenceError::InsufficientData {
                samples: 16,
                minimum: 32,
                ..
            }
        ));
        assert_eq!(a.fetches.load(Ordering::SeqCst), 0);
        assert_eq!(b.fetches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_second_channel_is_checked_too() {
        let a = MemoryChannel::new("A", 0, 20.0, noise_like(1024, 1));
        let b = MemoryChannel::new("B", 0, 20.0, noise_like(20, 2));
        let err = compute_coherence(&[&a, &b], &TimeInterval::new(0, 20_480), None).unwrap_err();
        match err {
            CoherenceError::InsufficientData { channel, .. } => assert_eq!(channel, "B"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_channel_count() {
        let a = MemoryChannel::new("A", 0, 20.0, noise_like(1024, 1));
        let interval = TimeInterval::new(0, 20_480);
        let one: &dyn ChannelSource = &a;
        for channels in [vec![], vec![one], vec![one, one, one]] {
            let err = compute_coherence(&channels, &interval, None).unwrap_err();
            assert!(matches!(err, CoherenceError::ChannelCount { found } if found == channels.len()));
        }
    }

    #[test]
    fn test_per_channel_bound_is_honoured() {
        struct Bounded(MemoryChannel);
        impl ChannelSource for Bounded {
            fn name(&self) -> String {
                self.0.name()
            }
            fn sample_interval_ms(&self) -> f64 {
                self.0.sample_interval_ms()
            }
            fn data_length(&self, interval: &TimeInterval) -> usize {
                self.0.data_length(interval)
            }
            fn gapless_samples(&self, interval: &TimeInterval) -> Result<Vec<i32>, SourceError> {
                self.0.gapless_samples(interval)
            }
            fn max_data_length(&self) -> Option<usize> {
                Some(1000)
            }
        }

        let a = Bounded(MemoryChannel::new("A", 0, 20.0, noise_like(4096, 1)));
        let b = Bounded(MemoryChannel::new("B", 0, 20.0, noise_like(4096, 2)));
        let out = compute_coherence(&[&a, &b], &TimeInterval::new(0, 81_920), None).unwrap();
        assert_eq!(out.effective_length, 1024);
        assert_eq!(out.effective_interval, TimeInterval::new(0, 20_480));
        assert_eq!(
            out.warnings
                .iter()
                .filter(|w| matches!(w, CoherenceWarning::Truncated { max_points: 1000, .. }))
                .count(),
            2
        );
    }
}
