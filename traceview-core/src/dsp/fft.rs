use realfft::num_complex::Complex;
use realfft::RealFftPlanner;
use std::cell::RefCell;

thread_local! {
    static FFT_PLANNER: RefCell<RealFftPlanner<f64>> = RefCell::new(RealFftPlanner::new());
}

/// One-sided spectrum of a real block: `block.len() / 2 + 1` complex bins.
///
/// No window is applied and the result is not normalised. Planners are cached
/// per thread, so the two channel pipelines never contend on a lock.
pub fn real_spectrum(block: &[f64]) -> Vec<Complex<f64>> {
    let fft = FFT_PLANNER.with(|p| p.borrow_mut().plan_fft_forward(block.len()));

    let mut input = fft.make_input_vec();
    input.copy_from_slice(block);
    let mut spectrum = fft.make_output_vec();

    // Buffers come from the plan itself, so the lengths always agree.
    fft.process(&mut input, &mut spectrum).expect("FFT failed");
    spectrum
}
