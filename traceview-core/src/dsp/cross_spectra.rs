use crate::types::{SpectralAccumulators, SpectralFrame};

/// Average auto- and cross-spectra over paired Welch frames.
///
/// Frame `r` of `x` is paired with frame `r` of `y`. Sums are divided by
/// `segment_count`. Both lists must have the same length and the same frame
/// length; anything else is a caller bug and panics.
pub fn accumulate(
    x_frames: &[SpectralFrame],
    y_frames: &[SpectralFrame],
    segment_count: usize,
) -> SpectralAccumulators {
    assert_eq!(
        x_frames.len(),
        y_frames.len(),
        "channels produced different numbers of frames"
    );
    assert!(!x_frames.is_empty(), "no frames to accumulate");
    assert!(segment_count > 0, "segment count must be positive");

    let bins = x_frames[0].len();
    let mut acc = SpectralAccumulators::zeroed(bins);

    for (x, y) in x_frames.iter().zip(y_frames.iter()) {
        assert_eq!(x.len(), bins, "frame length mismatch");
        assert_eq!(y.len(), bins, "frame length mismatch");
        for i in 0..bins {
            acc.pxx[i] += x[i] * x[i].conj();
            acc.pyy[i] += y[i] * y[i].conj();
            acc.pxy[i] += x[i] * y[i].conj();
            acc.pyx[i] += y[i] * x[i].conj();
        }
    }

    let n = segment_count as f64;
    for spectrum in [&mut acc.pxx, &mut acc.pyy, &mut acc.pxy, &mut acc.pyx] {
        for v in spectrum.iter_mut() {
            *v /= n;
        }
    }

    acc
}
