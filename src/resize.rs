//! Kernel selection and buffer validation

use imgref::{ImgRef, ImgVec};
use rgb::RGBA8;

use crate::error::{Error, Result};
use crate::resize_scalar::resize_scalar;
use crate::resize_scalar_unsafe::resize_scalar_unsafe;
use crate::resize_vectorized::resize_vectorized;
use crate::resize_wide::resize_wide;

/// Which resize kernel to run
///
/// All four produce byte-identical output; they exist to be compared.
/// The SIMD modes fall back to scalar rows on machines without the
/// required CPU features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// One pixel at a time, bounds-checked
    Scalar,
    /// Scalar arithmetic with unchecked buffer access
    ScalarUnsafe,
    /// 4 output columns per step (SSE)
    Vectorized,
    /// 8 output columns per step (AVX2)
    Wide,
}

/// Check dimensions and buffer lengths before any kernel touches them.
///
/// Lengths are compared in 64-bit arithmetic so `width * height` cannot
/// wrap on 32-bit targets.
pub(crate) fn validate(
    src_len: usize,
    src_width: usize,
    src_height: usize,
    dst_len: usize,
    dst_width: usize,
    dst_height: usize,
) -> Result<()> {
    for (width, height) in [(src_width, src_height), (dst_width, dst_height)] {
        if width == 0 || height == 0 {
            return Err(Error::BadDimensions { width, height });
        }
    }
    for (len, width, height) in [
        (src_len, src_width, src_height),
        (dst_len, dst_width, dst_height),
    ] {
        let expected = width as u64 * height as u64;
        if len as u64 != expected {
            return Err(Error::BufferMismatch {
                len,
                width,
                height,
                expected,
            });
        }
    }
    Ok(())
}

/// Dispatch a resize to the kernel selected by `mode`.
///
/// `src` holds `src_width * src_height` pixels, `dst` holds
/// `dst_width * dst_height`; the buffers must not overlap. Every output
/// row is written exactly once and all rows complete before this
/// returns.
pub fn resize_with_mode(
    src: &[RGBA8],
    src_width: usize,
    src_height: usize,
    dst: &mut [RGBA8],
    dst_width: usize,
    dst_height: usize,
    mode: ResizeMode,
) -> Result<()> {
    log::debug!(
        "resize {}x{} -> {}x{} using {:?}",
        src_width,
        src_height,
        dst_width,
        dst_height,
        mode
    );
    match mode {
        ResizeMode::Scalar => resize_scalar(src, src_width, src_height, dst, dst_width, dst_height),
        ResizeMode::ScalarUnsafe => {
            resize_scalar_unsafe(src, src_width, src_height, dst, dst_width, dst_height)
        }
        ResizeMode::Vectorized => {
            resize_vectorized(src, src_width, src_height, dst, dst_width, dst_height)
        }
        ResizeMode::Wide => resize_wide(src, src_width, src_height, dst, dst_width, dst_height),
    }
}

/// Resize into a freshly allocated image.
///
/// The source must be a contiguous buffer (no row stride padding).
pub fn resize(src: ImgRef<'_, RGBA8>, dst_width: usize, dst_height: usize, mode: ResizeMode) -> Result<ImgVec<RGBA8>> {
    let mut out = vec![RGBA8::default(); dst_width * dst_height];
    resize_with_mode(
        src.buf(),
        src.width(),
        src.height(),
        &mut out,
        dst_width,
        dst_height,
        mode,
    )?;
    Ok(ImgVec::new(out, dst_width, dst_height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_zero_dims() {
        assert!(matches!(
            validate(0, 0, 4, 4, 2, 2),
            Err(Error::BadDimensions { width: 0, height: 4 })
        ));
        assert!(matches!(
            validate(4, 2, 2, 0, 3, 0),
            Err(Error::BadDimensions { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_wrong_lengths() {
        assert!(matches!(
            validate(3, 2, 2, 4, 2, 2),
            Err(Error::BufferMismatch { len: 3, .. })
        ));
        assert!(matches!(
            validate(4, 2, 2, 5, 2, 2),
            Err(Error::BufferMismatch { len: 5, .. })
        ));
        assert!(validate(4, 2, 2, 6, 3, 2).is_ok());
    }

    #[test]
    fn test_validate_compares_in_64_bit() {
        // On a 64-bit target this product stays exact; the point is that
        // the comparison never truncates before comparing
        let big = 1usize << 20;
        assert!(matches!(
            validate(16, big, big, 4, 2, 2),
            Err(Error::BufferMismatch { .. })
        ));
    }

    #[test]
    fn test_resize_allocates_output() {
        let src = vec![RGBA8::new(10, 20, 30, 40); 4];
        let img = imgref::ImgRef::new(&src, 2, 2);
        let out = resize(img, 5, 3, ResizeMode::Scalar).unwrap();
        assert_eq!(out.width(), 5);
        assert_eq!(out.height(), 3);
        assert!(out.buf().iter().all(|&p| p == src[0]));
    }
}
