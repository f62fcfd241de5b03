use crate::dsp::freq_axis::FrequencyAxis;
use crate::dsp::smoothing::Smoother;
use crate::types::{CoherenceCurve, CoherenceSeries, CurvePoint, SpectralAccumulators};

pub const RAW_SERIES: &str = "raw series";
pub const SMOOTHED_SERIES: &str = "smoothed series";

/// Magnitude-squared coherence per bin: `Re(Pxy * Pyx) / Re(Pxx * Pyy)`.
///
/// The ratio is not guarded. A zero auto-spectrum gives inf or NaN and the
/// value is passed on as is.
pub fn coherence(acc: &SpectralAccumulators) -> Vec<f64> {
    (0..acc.len())
        .map(|i| {
            let numerator = (acc.pxy[i] * acc.pyx[i]).re;
            let denominator = (acc.pxx[i] * acc.pyy[i]).re;
            numerator / denominator
        })
        .collect()
}

/// Turn averaged spectra into raw and smoothed sqrt-coherence against period.
///
/// `sample_interval_ms` is the common interval both channels were processed
/// at. Negative coherence is not clamped before the square root, so such bins
/// come out as NaN.
pub fn compose(
    acc: &SpectralAccumulators,
    sample_interval_ms: f64,
    axis: &dyn FrequencyAxis,
    smoother: &dyn Smoother,
) -> CoherenceCurve {
    let coh = coherence(acc);

    let params = axis.freq_parameters(coh.len() * 2, 1000.0 / sample_interval_ms);
    let frequencies = axis.frequencies(&params);
    assert_eq!(
        frequencies.len(),
        coh.len(),
        "frequency axis does not match spectrum length"
    );

    let sqrt_coh: Vec<f64> = coh.iter().map(|c| c.sqrt()).collect();
    let smoothed = smoother.smooth(&frequencies, &sqrt_coh);

    CoherenceCurve {
        raw: by_period(RAW_SERIES, &frequencies, &sqrt_coh),
        smoothed: by_period(SMOOTHED_SERIES, &frequencies, &smoothed),
    }
}

fn by_period(name: &'static str, frequencies: &[f64], values: &[f64]) -> CoherenceSeries {
    let mut points: Vec<CurvePoint> = frequencies
        .iter()
        .zip(values.iter())
        .map(|(&f, &value)| CurvePoint {
            period: 1.0 / f,
            value,
        })
        .collect();
    points.sort_by(|a, b| a.period.total_cmp(&b.period));
    CoherenceSeries { name, points }
}
