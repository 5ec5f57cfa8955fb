//! Scalar bilinear resize kernel
//!
//! One output pixel at a time, bounds-checked. This is the reference
//! implementation the other kernels are held byte-identical to.

#![allow(clippy::too_many_arguments)]

use rayon::prelude::*;
use rgb::RGBA8;

use crate::error::Result;
use crate::resize::validate;
use crate::sampling::sample_axis;
use crate::srgb::{f32_to_srgb8, f32_to_unorm8, srgb8_to_f32, unorm8_to_f32};

#[inline(always)]
fn lerp(a: f32, b: f32, q: f32) -> f32 {
    a + (b - a) * q
}

/// Blend four neighbors in linear light and re-encode.
///
/// RGB decodes through the sRGB curve, alpha through plain unorm; the
/// horizontal lerps run first, then the vertical one.
#[inline(always)]
fn blend_pixel(s11: RGBA8, s21: RGBA8, s12: RGBA8, s22: RGBA8, qx: f32, qy: f32) -> RGBA8 {
    let r = lerp(
        lerp(srgb8_to_f32(s11.r), srgb8_to_f32(s21.r), qx),
        lerp(srgb8_to_f32(s12.r), srgb8_to_f32(s22.r), qx),
        qy,
    );
    let g = lerp(
        lerp(srgb8_to_f32(s11.g), srgb8_to_f32(s21.g), qx),
        lerp(srgb8_to_f32(s12.g), srgb8_to_f32(s22.g), qx),
        qy,
    );
    let b = lerp(
        lerp(srgb8_to_f32(s11.b), srgb8_to_f32(s21.b), qx),
        lerp(srgb8_to_f32(s12.b), srgb8_to_f32(s22.b), qx),
        qy,
    );
    let a = lerp(
        lerp(unorm8_to_f32(s11.a), unorm8_to_f32(s21.a), qx),
        lerp(unorm8_to_f32(s12.a), unorm8_to_f32(s22.a), qx),
        qy,
    );

    RGBA8 {
        r: f32_to_srgb8(r),
        g: f32_to_srgb8(g),
        b: f32_to_srgb8(b),
        a: f32_to_unorm8(a),
    }
}

/// Resample one output row.
///
/// `dst_row` is row `yo` of the destination, exactly `dst_width` pixels.
pub fn resize_row_scalar(
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

    for (xo, out) in dst_row.iter_mut().enumerate() {
        let xs = sample_axis(xo, dst_width, src_width);

        let s11 = src[row_lo + xs.lo];
        let s21 = src[row_lo + xs.hi];
        let s12 = src[row_hi + xs.lo];
        let s22 = src[row_hi + xs.hi];

        *out = blend_pixel(s11, s21, s12, s22, xs.q, ys.q);
    }
}

/// Resize `src` into `dst` with the scalar kernel.
pub fn resize_scalar(
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
            resize_row_scalar(src, src_width, src_height, row, dst_width, dst_height, yo);
        });

    Ok(())
}
