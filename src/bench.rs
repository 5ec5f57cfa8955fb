//! Per-kernel timing harness
//!
//! Measures full-image resizes with a monotonic clock after a fixed
//! number of untimed warm-up runs, and reports the mean milliseconds per
//! resize. Warm-up count and mean-of-iterations reporting are part of the
//! contract so numbers stay comparable across kernels and runs. The
//! caller's output buffer is reused for every iteration; nothing is
//! allocated inside the timed region.

use std::time::{Duration, Instant};

use rgb::RGBA8;

use crate::error::{Error, Result};
use crate::resize::{ResizeMode, resize_with_mode, validate};

/// Untimed resizes before measurement starts.
const WARMUP_RUNS: u32 = 10;

/// Time `iters` full-image resizes of `src` into `dst` with the kernel
/// selected by `mode`, returning mean milliseconds per resize.
#[allow(clippy::too_many_arguments)]
pub fn benchmark(
    src: &[RGBA8],
    src_width: usize,
    src_height: usize,
    dst: &mut [RGBA8],
    dst_width: usize,
    dst_height: usize,
    mode: ResizeMode,
    iters: u32,
) -> Result<f64> {
    validate(src.len(), src_width, src_height, dst.len(), dst_width, dst_height)?;
    if iters < 1 {
        return Err(Error::BadIterations(iters));
    }

    for _ in 0..WARMUP_RUNS {
        resize_with_mode(src, src_width, src_height, dst, dst_width, dst_height, mode)?;
    }

    let mut total = Duration::ZERO;
    for _ in 0..iters {
        let start = Instant::now();
        resize_with_mode(src, src_width, src_height, dst, dst_width, dst_height, mode)?;
        total += start.elapsed();
    }

    let mean_ms = total.as_secs_f64() * 1000.0 / iters as f64;
    log::debug!(
        "{:?} {}x{} -> {}x{}: {:.3} ms mean over {} iterations",
        mode,
        src_width,
        src_height,
        dst_width,
        dst_height,
        mean_ms,
        iters
    );
    Ok(mean_ms)
}

/// [`benchmark`] with the scalar kernel.
pub fn benchmark_scalar(
    src: &[RGBA8],
    src_width: usize,
    src_height: usize,
    dst: &mut [RGBA8],
    dst_width: usize,
    dst_height: usize,
    iters: u32,
) -> Result<f64> {
    benchmark(src, src_width, src_height, dst, dst_width, dst_height, ResizeMode::Scalar, iters)
}

/// [`benchmark`] with the unchecked scalar kernel.
pub fn benchmark_scalar_unsafe(
    src: &[RGBA8],
    src_width: usize,
    src_height: usize,
    dst: &mut [RGBA8],
    dst_width: usize,
    dst_height: usize,
    iters: u32,
) -> Result<f64> {
    benchmark(
        src,
        src_width,
        src_height,
        dst,
        dst_width,
        dst_height,
        ResizeMode::ScalarUnsafe,
        iters,
    )
}

/// [`benchmark`] with the 4-wide kernel.
pub fn benchmark_vectorized(
    src: &[RGBA8],
    src_width: usize,
    src_height: usize,
    dst: &mut [RGBA8],
    dst_width: usize,
    dst_height: usize,
    iters: u32,
) -> Result<f64> {
    benchmark(
        src,
        src_width,
        src_height,
        dst,
        dst_width,
        dst_height,
        ResizeMode::Vectorized,
        iters,
    )
}

/// [`benchmark`] with the 8-wide kernel.
pub fn benchmark_wide(
    src: &[RGBA8],
    src_width: usize,
    src_height: usize,
    dst: &mut [RGBA8],
    dst_width: usize,
    dst_height: usize,
    iters: u32,
) -> Result<f64> {
    benchmark(src, src_width, src_height, dst, dst_width, dst_height, ResizeMode::Wide, iters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_iterations_rejected() {
        let src = vec![RGBA8::default(); 4];
        let mut dst = vec![RGBA8::default(); 4];
        let err = benchmark(&src, 2, 2, &mut dst, 2, 2, ResizeMode::Scalar, 0).unwrap_err();
        assert!(matches!(err, Error::BadIterations(0)));
    }

    #[test]
    fn test_invalid_buffers_rejected_before_warmup() {
        let src = vec![RGBA8::default(); 3];
        let mut dst = vec![RGBA8::default(); 4];
        assert!(benchmark(&src, 2, 2, &mut dst, 2, 2, ResizeMode::Scalar, 1).is_err());
    }

    #[test]
    fn test_mean_is_finite_and_output_written() {
        let src = vec![RGBA8::new(200, 100, 50, 255); 8 * 4];
        let mut dst = vec![RGBA8::default(); 16 * 8];
        let ms = benchmark(&src, 8, 4, &mut dst, 16, 8, ResizeMode::Scalar, 3).unwrap();
        assert!(ms.is_finite());
        assert!(ms >= 0.0);
        // Warm-up already filled the output; a constant source stays constant
        assert!(dst.iter().all(|&p| p == src[0]));
    }
}
