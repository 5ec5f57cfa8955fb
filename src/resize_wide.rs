//! 8-wide AVX2 bilinear resize kernel
//!
//! Same structure as the 4-wide kernel at twice the lane count. The main
//! loop stores 8 packed RGBA words at a time; the residual columns use an
//! in-bounds lane mask and a masked store, so nothing is ever written past
//! the last column. Masked-out lanes still compute a sample, but their
//! neighbor indices go through the same per-lane clamp as every other
//! lane, so the gather only ever touches in-bounds source pixels.

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
use crate::simd::{f32x8_to_srgb8_epi32, f32x8_to_unorm8_epi32};
#[cfg(target_arch = "x86_64")]
use crate::srgb::SRGB8_TO_F32;

#[cfg(target_arch = "x86_64")]
#[arcane]
#[inline(always)]
fn lerp8(_token: Desktop64, a: __m256, b: __m256, q: __m256) -> __m256 {
    // Separate mul and add; an FMA here would round differently than the
    // scalar kernel
    _mm256_add_ps(a, _mm256_mul_ps(_mm256_sub_ps(b, a), q))
}

/// Bilinear blend of one channel across 8 lanes. `taps` holds the four
/// neighbors in s11, s21, s12, s22 order.
#[cfg(target_arch = "x86_64")]
#[arcane]
#[inline(always)]
fn bilerp8(token: Desktop64, taps: &[[f32; 8]; 4], qx: __m256, qy: __m256) -> __m256 {
    let s11 = safe_unaligned_simd::x86_64::_mm256_loadu_ps(&taps[0]);
    let s21 = safe_unaligned_simd::x86_64::_mm256_loadu_ps(&taps[1]);
    let s12 = safe_unaligned_simd::x86_64::_mm256_loadu_ps(&taps[2]);
    let s22 = safe_unaligned_simd::x86_64::_mm256_loadu_ps(&taps[3]);

    let l1 = lerp8(token, s11, s21, qx);
    let l2 = lerp8(token, s12, s22, qx);
    lerp8(token, l1, l2, qy)
}

/// Interpolate output columns `xo .. xo + 8` of one row into packed RGBA
/// words, one per 32-bit lane.
#[cfg(target_arch = "x86_64")]
#[arcane]
#[inline(always)]
fn interp_block8(
    token: Desktop64,
    src: &[RGBA8],
    src_width: usize,
    row_lo: usize,
    row_hi: usize,
    qy: __m256,
    xo: usize,
    dst_width: usize,
) -> __m256i {
    let half = _mm256_set1_ps(0.5);
    let lanes = _mm256_setr_ps(
        xo as f32,
        (xo + 1) as f32,
        (xo + 2) as f32,
        (xo + 3) as f32,
        (xo + 4) as f32,
        (xo + 5) as f32,
        (xo + 6) as f32,
        (xo + 7) as f32,
    );

    let u = _mm256_div_ps(_mm256_add_ps(lanes, half), _mm256_set1_ps(dst_width as f32));
    let s = _mm256_sub_ps(_mm256_mul_ps(u, _mm256_set1_ps(src_width as f32)), half);
    let fl = _mm256_floor_ps(s);
    let qx = _mm256_sub_ps(s, fl);

    let zero = _mm256_setzero_si256();
    let max_x = _mm256_set1_epi32(src_width as i32 - 1);
    let ix = _mm256_cvttps_epi32(fl);
    let x_lo = _mm256_min_epi32(_mm256_max_epi32(ix, zero), max_x);
    let x_hi = _mm256_min_epi32(
        _mm256_max_epi32(_mm256_add_epi32(ix, _mm256_set1_epi32(1)), zero),
        max_x,
    );

    let mut lo_arr = [0i32; 8];
    let mut hi_arr = [0i32; 8];
    safe_unaligned_simd::x86_64::_mm256_storeu_si256(&mut lo_arr, x_lo);
    safe_unaligned_simd::x86_64::_mm256_storeu_si256(&mut hi_arr, x_hi);

    // Eight dependent scalar loads per tap measured faster than a
    // hardware gather for this four-neighbor pattern
    let mut r = [[0f32; 8]; 4];
    let mut g = [[0f32; 8]; 4];
    let mut b = [[0f32; 8]; 4];
    let mut a = [[0f32; 8]; 4];
    for lane in 0..8 {
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

    let rv = bilerp8(token, &r, qx, qy);
    let gv = bilerp8(token, &g, qx, qy);
    let bv = bilerp8(token, &b, qx, qy);
    let av = bilerp8(token, &a, qx, qy);

    let rc = f32x8_to_srgb8_epi32(token, rv);
    let gc = f32x8_to_srgb8_epi32(token, gv);
    let bc = f32x8_to_srgb8_epi32(token, bv);
    let ac = f32x8_to_unorm8_epi32(token, av);

    _mm256_or_si256(
        _mm256_or_si256(rc, _mm256_slli_epi32::<8>(gc)),
        _mm256_or_si256(_mm256_slli_epi32::<16>(bc), _mm256_slli_epi32::<24>(ac)),
    )
}

/// Resample one output row, 8 columns per step.
#[cfg(target_arch = "x86_64")]
#[arcane]
pub fn resize_row_wide(
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
    let qy = _mm256_set1_ps(ys.q);

    // Store bounds come from the slice itself, so the raw stores below
    // cannot overrun it even with an inconsistent dst_width
    let row_len = dst_row.len();

    let mut xo = 0;
    while xo + 8 <= row_len {
        let words = interp_block8(token, src, src_width, row_lo, row_hi, qy, xo, dst_width);
        // RGBA8 is 4 bytes, so 8 pixels are one unaligned 256-bit store
        unsafe {
            _mm256_storeu_si256(dst_row.as_mut_ptr().add(xo) as *mut __m256i, words);
        }
        xo += 8;
    }

    if xo < row_len {
        let words = interp_block8(token, src, src_width, row_lo, row_hi, qy, xo, dst_width);
        let lane_ids = _mm256_setr_epi32(
            xo as i32,
            (xo + 1) as i32,
            (xo + 2) as i32,
            (xo + 3) as i32,
            (xo + 4) as i32,
            (xo + 5) as i32,
            (xo + 6) as i32,
            (xo + 7) as i32,
        );
        let in_bounds = _mm256_cmpgt_epi32(_mm256_set1_epi32(row_len as i32), lane_ids);
        unsafe {
            _mm256_maskstore_epi32(dst_row.as_mut_ptr().add(xo) as *mut i32, in_bounds, words);
        }
    }
}

/// Resize `src` into `dst` with the 8-wide kernel.
///
/// Falls back to scalar rows when the CPU lacks the required features.
pub fn resize_wide(
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
                resize_row_wide(
                    token, src, src_width, src_height, row, dst_width, dst_height, yo,
                );
            });
        return Ok(());
    }

    log::debug!("8-wide SIMD unavailable, resampling rows with the scalar kernel");
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

        // Widths straddling the 8-lane boundary exercise every mask shape
        for wo in 1..=17 {
            let ho = 5;
            let mut scalar = vec![RGBA8::default(); wo * ho];
            let mut wide = vec![RGBA8::default(); wo * ho];
            resize_scalar(&src, 31, 13, &mut scalar, wo, ho).unwrap();
            resize_wide(&src, 31, 13, &mut wide, wo, ho).unwrap();
            assert_eq!(scalar, wide, "mismatch at width {}", wo);
        }
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_masked_tail_never_writes_past_row() {
        let Some(token) = Desktop64::summon() else {
            return;
        };

        let src = patterned(9 * 9);
        let wo = 13;
        let ho = 3;
        let poison = RGBA8::new(0xAB, 0xCD, 0xEF, 0x42);
        let mut dst = vec![poison; wo * ho];

        // Render only the middle row; a masked store overrunning the row
        // slice would corrupt the row after it
        let (before, rest) = dst.split_at_mut(wo);
        let (row, after) = rest.split_at_mut(wo);
        resize_row_wide(token, &src, 9, 9, row, wo, ho, 1);

        assert!(before.iter().all(|&p| p == poison));
        assert!(after.iter().all(|&p| p == poison));

        let mut expect = vec![RGBA8::default(); wo];
        resize_row_scalar(&src, 9, 9, &mut expect, wo, ho, 1);
        assert_eq!(&row[..], &expect[..]);
    }
}
