//! 4-wide SSE bilinear resize kernel
//!
//! Processes 4 consecutive output columns per step. The channel values
//! of the four neighbor taps live in channel-planar 4-lane registers;
//! neighbors are gathered with dependent scalar loads. Output is
//! byte-identical to the scalar kernel: every float op (div, mul, sub,
//! add, floor) maps to the same IEEE single-precision operation the
//! scalar path performs, and nothing is allowed to contract into an FMA.

#![allow(clippy::too_many_arguments)]

#[cfg(target_arch = "x86_64")]
use archmage::{Desktop64, SimdToken, arcane};
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;
use rayon::prelude::*;
use rgb::RGBA8;

use crate::error::Result;
use crate::resize::validate;
use crate::resize_scalar::resize_row_scalar;
#[cfg(target_arch = "x86_64")]
use crate::sampling::sample_axis;
#[cfg(target_arch = "x86_64")]
use crate::simd::{f32x4_to_srgb8_epi32, f32x4_to_unorm8_epi32};
#[cfg(target_arch = "x86_64")]
use crate::srgb::SRGB8_TO_F32;

/// Unpack one little-endian RGBA word; x86 is little-endian, so a plain
/// reinterpret puts R in the first byte.
#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn pixel_from_word(w: u32) -> RGBA8 {
    bytemuck::cast(w)
}

#[cfg(target_arch = "x86_64")]
#[arcane]
#[inline(always)]
fn lerp4(_token: Desktop64, a: __m128, b: __m128, q: __m128) -> __m128 {
    // a + (b - a) * q, kept as separate mul and add to stay bit-identical
    // with the scalar lerp
    _mm_add_ps(a, _mm_mul_ps(_mm_sub_ps(b, a), q))
}

/// Bilinear blend of one channel across 4 lanes. `taps` holds the four
/// neighbors in s11, s21, s12, s22 order.
#[cfg(target_arch = "x86_64")]
#[arcane]
#[inline(always)]
fn bilerp4(token: Desktop64, taps: &[[f32; 4]; 4], qx: __m128, qy: __m128) -> __m128 {
    let s11 = safe_unaligned_simd::x86_64::_mm_loadu_ps(&taps[0]);
    let s21 = safe_unaligned_simd::x86_64::_mm_loadu_ps(&taps[1]);
    let s12 = safe_unaligned_simd::x86_64::_mm_loadu_ps(&taps[2]);
    let s22 = safe_unaligned_simd::x86_64::_mm_loadu_ps(&taps[3]);

    let l1 = lerp4(token, s11, s21, qx);
    let l2 = lerp4(token, s12, s22, qx);
    lerp4(token, l1, l2, qy)
}

/// Interpolate output columns `xo .. xo + 4` of one row, returning the
/// packed RGBA words. Lanes past the last output column clamp to valid
/// source pixels; the caller drops them.
#[cfg(target_arch = "x86_64")]
#[arcane]
#[inline(always)]
fn interp_block4(
    token: Desktop64,
    src: &[RGBA8],
    src_width: usize,
    row_lo: usize,
    row_hi: usize,
    qy: __m128,
    xo: usize,
    dst_width: usize,
) -> [u32; 4] {
    let half = _mm_set1_ps(0.5);
    let lanes = _mm_setr_ps(
        xo as f32,
        (xo + 1) as f32,
        (xo + 2) as f32,
        (xo + 3) as f32,
    );

    // Same op sequence as sample_axis: center, source coordinate, floor
    let u = _mm_div_ps(_mm_add_ps(lanes, half), _mm_set1_ps(dst_width as f32));
    let s = _mm_sub_ps(_mm_mul_ps(u, _mm_set1_ps(src_width as f32)), half);
    let fl = _mm_floor_ps(s);
    let qx = _mm_sub_ps(s, fl);

    let zero = _mm_setzero_si128();
    let max_x = _mm_set1_epi32(src_width as i32 - 1);
    let ix = _mm_cvttps_epi32(fl);
    let x_lo = _mm_min_epi32(_mm_max_epi32(ix, zero), max_x);
    let x_hi = _mm_min_epi32(
        _mm_max_epi32(_mm_add_epi32(ix, _mm_set1_epi32(1)), zero),
        max_x,
    );

    let mut lo_arr = [0i32; 4];
    let mut hi_arr = [0i32; 4];
    safe_unaligned_simd::x86_64::_mm_storeu_si128(&mut lo_arr, x_lo);
    safe_unaligned_simd::x86_64::_mm_storeu_si128(&mut hi_arr, x_hi);

    // Gather and decode the four taps per lane into channel-planar lanes
    let mut r = [[0f32; 4]; 4];
    let mut g = [[0f32; 4]; 4];
    let mut b = [[0f32; 4]; 4];
    let mut a = [[0f32; 4]; 4];
    for lane in 0..4 {
        let x0 = lo_arr[lane] as usize;
        let x1 = hi_arr[lane] as usize;
        let taps = [
            src[row_lo + x0],
            src[row_lo + x1],
            src[row_hi + x0],
            src[row_hi + x1],
        ];
        for (n, px) in taps.into_iter().enumerate() {
            r[n][lane] = SRGB8_TO_F32[px.r as usize];
            g[n][lane] = SRGB8_TO_F32[px.g as usize];
            b[n][lane] = SRGB8_TO_F32[px.b as usize];
            a[n][lane] = px.a as f32 / 255.0;
        }
    }

    let rv = bilerp4(token, &r, qx, qy);
    let gv = bilerp4(token, &g, qx, qy);
    let bv = bilerp4(token, &b, qx, qy);
    let av = bilerp4(token, &a, qx, qy);

    let rc = f32x4_to_srgb8_epi32(token, rv);
    let gc = f32x4_to_srgb8_epi32(token, gv);
    let bc = f32x4_to_srgb8_epi32(token, bv);
    let ac = f32x4_to_unorm8_epi32(token, av);

    // Pack each lane into one little-endian RGBA word, R in the low byte
    let word = _mm_or_si128(
        _mm_or_si128(rc, _mm_slli_epi32::<8>(gc)),
        _mm_or_si128(_mm_slli_epi32::<16>(bc), _mm_slli_epi32::<24>(ac)),
    );

    let mut words = [0u32; 4];
    safe_unaligned_simd::x86_64::_mm_storeu_si128(&mut words, word);
    words
}

/// Resample one output row, 4 columns per step.
#[cfg(target_arch = "x86_64")]
#[arcane]
pub fn resize_row_vectorized(
    token: Desktop64,
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
    let qy = _mm_set1_ps(ys.q);

    let mut xo = 0;
    while xo + 4 <= dst_width {
        let words = interp_block4(token, src, src_width, row_lo, row_hi, qy, xo, dst_width);
        for (i, w) in words.into_iter().enumerate() {
            dst_row[xo + i] = pixel_from_word(w);
        }
        xo += 4;
    }

    // Residual columns: one more block, storing only the lanes that exist
    let tail = dst_width - xo;
    if tail > 0 {
        let words = interp_block4(token, src, src_width, row_lo, row_hi, qy, xo, dst_width);
        for (i, w) in words.into_iter().take(tail).enumerate() {
            dst_row[xo + i] = pixel_from_word(w);
        }
    }
}

/// Resize `src` into `dst` with the 4-wide kernel.
///
/// Falls back to scalar rows when the CPU lacks the required features.
pub fn resize_vectorized(
    src: &[RGBA8],
    src_width: usize,
    src_height: usize,
    dst: &mut [RGBA8],
    dst_width: usize,
    dst_height: usize,
) -> Result<()> {
    validate(src.len(), src_width, src_height, dst.len(), dst_width, dst_height)?;

    #[cfg(target_arch = "x86_64")]
    if let Some(token) = Desktop64::summon() {
        dst.par_chunks_exact_mut(dst_width)
            .enumerate()
            .for_each(|(yo, row)| {
                resize_row_vectorized(
                    token, src, src_width, src_height, row, dst_width, dst_height, yo,
                );
            });
        return Ok(());
    }

    log::debug!("4-wide SIMD unavailable, resampling rows with the scalar kernel");
    dst.par_chunks_exact_mut(dst_width)
        .enumerate()
        .for_each(|(yo, row)| {
            resize_row_scalar(src, src_width, src_height, row, dst_width, dst_height, yo);
        });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resize_scalar::resize_scalar;

    fn patterned(n: usize) -> Vec<RGBA8> {
        (0..n)
            .map(|i| {
                RGBA8::new(
                    ((i * 37) % 256) as u8,
                    ((i * 73 + 11) % 256) as u8,
                    ((i * 151 + 199) % 256) as u8,
                    ((i * 17 + 5) % 256) as u8,
                )
            })
            .collect()
    }

    #[test]
    fn test_matches_scalar_including_tails() {
        let src = patterned(31 * 13);

        // Widths straddling the 4-lane boundary exercise every tail length
        for wo in 1..=9 {
            let ho = 5;
            let mut scalar = vec![RGBA8::default(); wo * ho];
            let mut vectorized = vec![RGBA8::default(); wo * ho];
            resize_scalar(&src, 31, 13, &mut scalar, wo, ho).unwrap();
            resize_vectorized(&src, 31, 13, &mut vectorized, wo, ho).unwrap();
            assert_eq!(scalar, vectorized, "mismatch at width {}", wo);
        }
    }

    #[test]
    fn test_matches_scalar_upscale() {
        let src = patterned(3 * 2);
        let mut scalar = vec![RGBA8::default(); 90 * 40];
        let mut vectorized = vec![RGBA8::default(); 90 * 40];
        resize_scalar(&src, 3, 2, &mut scalar, 90, 40).unwrap();
        resize_vectorized(&src, 3, 2, &mut vectorized, 90, 40).unwrap();
        assert_eq!(scalar, vectorized);
    }
}
