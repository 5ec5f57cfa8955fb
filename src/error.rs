//! Error types for zenscale

/// Error type for resize and benchmark operations
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A width or height is zero
    #[error("bad dimensions: {width}x{height}")]
    BadDimensions {
        /// Offending width
        width: usize,
        /// Offending height
        height: usize,
    },

    /// A pixel buffer does not hold exactly width * height pixels
    #[error("buffer holds {len} pixels, expected {width}x{height} = {expected}")]
    BufferMismatch {
        /// Actual buffer length in pixels
        len: usize,
        /// Expected width
        width: usize,
        /// Expected height
        height: usize,
        /// width * height, computed in 64-bit arithmetic
        expected: u64,
    },

    /// Benchmark called with fewer than one iteration
    #[error("benchmark needs at least 1 iteration, got {0}")]
    BadIterations(u32),
}

/// Result type for zenscale operations
pub type Result<T, E = Error> = core::result::Result<T, E>;
