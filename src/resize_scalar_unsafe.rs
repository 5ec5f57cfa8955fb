//! Scalar bilinear resize kernel with unchecked buffer access
//!
//! Same arithmetic as [`crate::resize_scalar`], but neighbor reads, table
//! lookups, and the row store skip bounds checks so the optimizer can keep
//! the inner loop tight. Output is byte-identical to the checked kernel.

#![allow(clippy::too_many_arguments)]

use rayon::prelude::*;
use rgb::RGBA8;

use crate::error::Result;
use crate::resize::validate;
use crate::sampling::sample_axis;
use crate::srgb::{SRGB8_TO_F32, f32_to_srgb8, f32_to_unorm8};

#[inline(always)]
fn lerp(a: f32, b: f32, q: f32) -> f32 {
    a + (b - a) * q
}

#[inline(always)]
unsafe fn srgb8_to_f32_unchecked(c: u8) -> f32 {
    unsafe { *SRGB8_TO_F32.get_unchecked(c as usize) }
}

/// Same blend as the checked kernel; the u8 table index cannot exceed the
/// 256-entry table, so the unchecked lookup is only about codegen.
#[inline(always)]
unsafe fn blend_pixel(s11: RGBA8, s21: RGBA8, s12: RGBA8, s22: RGBA8, qx: f32, qy: f32) -> RGBA8 {
    unsafe {
        let r = lerp(
            lerp(srgb8_to_f32_unchecked(s11.r), srgb8_to_f32_unchecked(s21.r), qx),
            lerp(srgb8_to_f32_unchecked(s12.r), srgb8_to_f32_unchecked(s22.r), qx),
            qy,
        );
        let g = lerp(
            lerp(srgb8_to_f32_unchecked(s11.g), srgb8_to_f32_unchecked(s21.g), qx),
            lerp(srgb8_to_f32_unchecked(s12.g), srgb8_to_f32_unchecked(s22.g), qx),
            qy,
        );
        let b = lerp(
            lerp(srgb8_to_f32_unchecked(s11.b), srgb8_to_f32_unchecked(s21.b), qx),
            lerp(srgb8_to_f32_unchecked(s12.b), srgb8_to_f32_unchecked(s22.b), qx),
            qy,
        );
        let a = lerp(
            lerp(s11.a as f32 / 255.0, s21.a as f32 / 255.0, qx),
            lerp(s12.a as f32 / 255.0, s22.a as f32 / 255.0, qx),
            qy,
        );

        RGBA8 {
            r: f32_to_srgb8(r),
            g: f32_to_srgb8(g),
            b: f32_to_srgb8(b),
            a: f32_to_unorm8(a),
        }
    }
}

/// Resample one output row without per-pixel bounds checks.
///
/// Neighbor indices are clamped to the source image by [`sample_axis`],
/// so with consistent arguments every unchecked read stays in bounds.
///
/// # Safety
///
/// `src` must hold exactly `src_width * src_height` pixels and `dst_row`
/// at least `dst_width`; [`resize_scalar_unsafe`] establishes both
/// before any row runs.
pub unsafe fn resize_row_scalar_unsafe(
    src: &[RGBA8],
    src_width: usize,
    src_height: usize,
    dst_row: &mut [RGBA8],
    dst_width: usize,
    dst_height: usize,
    yo: usize,
) {
    debug_assert_eq!(src.len(), src_width * src_height);
    debug_assert_eq!(dst_row.len(), dst_width);
    debug_assert!(yo < dst_height);

    let ys = sample_axis(yo, dst_height, src_height);
    let row_lo = ys.lo * src_width;
    let row_hi = ys.hi * src_width;

    unsafe {
        for xo in 0..dst_width {
            let xs = sample_axis(xo, dst_width, src_width);

            let s11 = *src.get_unchecked(row_lo + xs.lo);
            let s21 = *src.get_unchecked(row_lo + xs.hi);
            let s12 = *src.get_unchecked(row_hi + xs.lo);
            let s22 = *src.get_unchecked(row_hi + xs.hi);

            *dst_row.get_unchecked_mut(xo) = blend_pixel(s11, s21, s12, s22, xs.q, ys.q);
        }
    }
}

/// Resize `src` into `dst` with the unchecked scalar kernel.
pub fn resize_scalar_unsafe(
    src: &[RGBA8],
    src_width: usize,
    src_height: usize,
    dst: &mut [RGBA8],
    dst_width: usize,
    dst_height: usize,
) -> Result<()> {
    validate(src.len(), src_width, src_height, dst.len(), dst_width, dst_height)?;

    dst.par_chunks_exact_mut(dst_width)
        .enumerate()
        .for_each(|(yo, row)| {
            // Buffer lengths were validated above; each chunk is one row
            unsafe {
                resize_row_scalar_unsafe(
                    src, src_width, src_height, row, dst_width, dst_height, yo,
                );
            }
        });

    Ok(())
}
