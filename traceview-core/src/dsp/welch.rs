//! Welch segmentation with a fixed 75% overlap.
//!
//! The window length is one power of two below a quarter of the series,
//! which gives roughly 13 windows for a typical trace. Windows advance by a
//! quarter of their length until less than one full window remains after the
//! current one; the final window is then pinned to end exactly at the last
//! sample.

use crate::dsp::fft::real_spectrum;
use crate::dsp::filter::SegmentFilter;
use crate::types::{SpectralError, WelchSpectra};
use std::ops::Range;

/// Shortest window for which a quarter-length hop is at least one sample.
pub const MIN_SEGMENT_LENGTH: usize = 4;

/// Shortest series whose window length reaches [`MIN_SEGMENT_LENGTH`].
pub const MIN_SERIES_LENGTH: usize = 18;

/// Window length for a series of `len` points: `2^(ceil(log2(round(len/4))) - 1)`.
pub fn segment_length(len: usize) -> usize {
    let quarter = (len as f64 / 4.0).round() as usize;
    quarter.next_power_of_two() / 2
}

/// Fill/complete state machine over a series of `len` points.
///
/// `cnt` is the next input index to copy, `seg_end` the input index where the
/// window being filled ends and `seg_idx` the fill position inside the window
/// buffer. `segments` pre-counts the first window and is bumped on every
/// regular advance; the pinned tail window is not counted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentCursor {
    len: usize,
    segment_length: usize,
    pub cnt: usize,
    pub seg_end: usize,
    pub seg_idx: usize,
    pub segments: usize,
    finished: bool,
}

impl SegmentCursor {
    pub fn new(len: usize, segment_length: usize) -> Self {
        Self {
            len,
            segment_length,
            cnt: 0,
            seg_end: segment_length,
            seg_idx: 0,
            segments: 1,
            finished: false,
        }
    }

    /// Input range covered by the window currently being filled.
    pub fn window(&self) -> Range<usize> {
        self.seg_end - self.segment_length..self.seg_end
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Copy the rest of the current window from `input` into `buffer`.
    pub fn fill(&mut self, input: &[i32], buffer: &mut [i32]) {
        let count = self.seg_end - self.cnt;
        buffer[self.seg_idx..self.seg_idx + count].copy_from_slice(&input[self.cnt..self.seg_end]);
        self.cnt = self.seg_end;
        self.seg_idx += count;
    }

    /// Move past a filled window. Returns false once the window ending at the
    /// last sample has been consumed.
    pub fn complete(&mut self) -> bool {
        self.seg_idx = 0;
        if self.seg_end == self.len {
            self.finished = true;
            return false;
        }

        if self.cnt + self.segment_length > self.len {
            // Pin the tail window to the end of the series
            self.cnt = self.len - self.segment_length;
            self.seg_end = self.len;
        } else {
            self.cnt -= (self.segment_length * 3) / 4;
            self.seg_end += self.segment_length / 4;
            self.segments += 1;
        }
        true
    }
}

/// Window ranges and the segment counter for a series of `len` points.
pub fn segment_windows(len: usize) -> (Vec<Range<usize>>, usize) {
    let l = segment_length(len);
    if l < MIN_SEGMENT_LENGTH {
        return (Vec::new(), 0);
    }
    let mut cursor = SegmentCursor::new(len, l);
    let mut windows = Vec::new();
    loop {
        cursor.cnt = cursor.seg_end;
        windows.push(cursor.window());
        if !cursor.complete() {
            break;
        }
    }
    (windows, cursor.segments)
}

/// Cut `samples` into overlapping windows, filter each one and return their
/// one-sided spectra.
pub fn welch_spectra(
    samples: &[i32],
    filter: Option<&dyn SegmentFilter>,
    sample_interval_ms: f64,
) -> Result<WelchSpectra, SpectralError> {
    let n = samples.len();
    let l = segment_length(n);
    if l < MIN_SEGMENT_LENGTH {
        return Err(SpectralError::TooShort {
            len: n,
            minimum: MIN_SERIES_LENGTH,
        });
    }

    let mut cursor = SegmentCursor::new(n, l);
    let mut block = vec![0i32; l];
    let mut frames = Vec::new();

    loop {
        cursor.fill(samples, &mut block);

        let data: Vec<f64> = match filter {
            Some(f) => {
                let filtered = f.apply(&block, sample_interval_ms);
                debug_assert_eq!(filtered.len(), l, "segment filter changed block length");
                filtered.iter().map(|&v| v as f64).collect()
            }
            None => block.iter().map(|&v| v as f64).collect(),
        };
        frames.push(real_spectrum(&data));

        if !cursor.complete() {
            break;
        }
    }

    log::debug!(
        "Welch: {} points, window {}, {} frames, segment counter {}",
        n,
        l,
        frames.len(),
        cursor.segments
    );

    Ok(WelchSpectra {
        frames,
        segment_count: cursor.segments,
        segment_length: l,
    })
}
