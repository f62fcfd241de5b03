/// Stateless transform applied to each Welch segment before its FFT.
///
/// Implementations must return a block of the same length. The sample interval
/// is the one the block was processed at, i.e. after any downsampling.
pub trait SegmentFilter: Sync {
    fn apply(&self, block: &[i32], sample_interval_ms: f64) -> Vec<i32>;
}

impl<F> SegmentFilter for F
where
    F: Fn(&[i32], f64) -> Vec<i32> + Sync,
{
    fn apply(&self, block: &[i32], sample_interval_ms: f64) -> Vec<i32> {
        self(block, sample_interval_ms)
    }
}
