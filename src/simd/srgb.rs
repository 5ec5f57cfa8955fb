//! SSE/AVX2 lane-wise sRGB and unorm encoders
//!
//! The encoders mirror the scalar table codec in [`crate::srgb`] one
//! operation at a time: float clamps via min/max (when the first operand
//! is NaN the second wins, which matches the scalar inverted comparison),
//! bit reinterpretation, and the bias/scale fixed point blend in integer
//! lanes. The 104-entry table is fetched with
//! dependent scalar loads; a hardware gather measured slower for this
//! access pattern.

use archmage::{Desktop64, arcane};
use core::arch::x86_64::*;

use crate::srgb::{ALMOST_ONE_BITS, FP32_TO_SRGB8_TAB4, MINVAL_BITS};

/// Encode 8 linear floats to sRGB codes, one per 32-bit lane.
#[arcane]
pub fn f32x8_to_srgb8_epi32(_token: Desktop64, v: __m256) -> __m256i {
    let minval = _mm256_set1_ps(f32::from_bits(MINVAL_BITS));
    let almost_one = _mm256_set1_ps(f32::from_bits(ALMOST_ONE_BITS));

    // NaN lanes fail the max compare and take minval, landing on code 0.
    let f = _mm256_min_ps(_mm256_max_ps(v, minval), almost_one);

    let bits = _mm256_castps_si256(f);
    let idx = _mm256_srli_epi32::<20>(_mm256_sub_epi32(
        bits,
        _mm256_set1_epi32(MINVAL_BITS as i32),
    ));

    let mut idx_arr = [0i32; 8];
    safe_unaligned_simd::x86_64::_mm256_storeu_si256(&mut idx_arr, idx);
    let mut tab_arr = [0i32; 8];
    for (tab, i) in tab_arr.iter_mut().zip(idx_arr) {
        *tab = FP32_TO_SRGB8_TAB4[i as usize] as i32;
    }
    let tab = safe_unaligned_simd::x86_64::_mm256_loadu_si256(&tab_arr);

    let bias = _mm256_slli_epi32::<9>(_mm256_srli_epi32::<16>(tab));
    let scale = _mm256_and_si256(tab, _mm256_set1_epi32(0xffff));
    let t = _mm256_and_si256(_mm256_srli_epi32::<12>(bits), _mm256_set1_epi32(0xff));

    _mm256_srli_epi32::<16>(_mm256_add_epi32(bias, _mm256_mullo_epi32(scale, t)))
}

/// Encode 8 linear floats to unorm codes (alpha), one per 32-bit lane.
#[arcane]
pub fn f32x8_to_unorm8_epi32(_token: Desktop64, v: __m256) -> __m256i {
    // max scrubs NaN and negatives to 0, as the scalar !(f > 0) does
    let f = _mm256_max_ps(v, _mm256_setzero_ps());
    let f = _mm256_min_ps(f, _mm256_set1_ps(1.0));
    let scaled = _mm256_add_ps(_mm256_mul_ps(f, _mm256_set1_ps(255.0)), _mm256_set1_ps(0.5));
    // Truncation equals floor here; the operand is non-negative
    _mm256_cvttps_epi32(scaled)
}

/// Encode 4 linear floats to sRGB codes, one per 32-bit lane.
#[arcane]
pub fn f32x4_to_srgb8_epi32(_token: Desktop64, v: __m128) -> __m128i {
    let minval = _mm_set1_ps(f32::from_bits(MINVAL_BITS));
    let almost_one = _mm_set1_ps(f32::from_bits(ALMOST_ONE_BITS));

    let f = _mm_min_ps(_mm_max_ps(v, minval), almost_one);

    let bits = _mm_castps_si128(f);
    let idx = _mm_srli_epi32::<20>(_mm_sub_epi32(bits, _mm_set1_epi32(MINVAL_BITS as i32)));

    let mut idx_arr = [0i32; 4];
    safe_unaligned_simd::x86_64::_mm_storeu_si128(&mut idx_arr, idx);
    let mut tab_arr = [0i32; 4];
    for (tab, i) in tab_arr.iter_mut().zip(idx_arr) {
        *tab = FP32_TO_SRGB8_TAB4[i as usize] as i32;
    }
    let tab = safe_unaligned_simd::x86_64::_mm_loadu_si128(&tab_arr);

    let bias = _mm_slli_epi32::<9>(_mm_srli_epi32::<16>(tab));
    let scale = _mm_and_si128(tab, _mm_set1_epi32(0xffff));
    let t = _mm_and_si128(_mm_srli_epi32::<12>(bits), _mm_set1_epi32(0xff));

    _mm_srli_epi32::<16>(_mm_add_epi32(bias, _mm_mullo_epi32(scale, t)))
}

/// Encode 4 linear floats to unorm codes (alpha), one per 32-bit lane.
#[arcane]
pub fn f32x4_to_unorm8_epi32(_token: Desktop64, v: __m128) -> __m128i {
    let f = _mm_max_ps(v, _mm_setzero_ps());
    let f = _mm_min_ps(f, _mm_set1_ps(1.0));
    let scaled = _mm_add_ps(_mm_mul_ps(f, _mm_set1_ps(255.0)), _mm_set1_ps(0.5));
    _mm_cvttps_epi32(scaled)
}

/// Array form of [`f32x8_to_srgb8_epi32`] for callers without registers.
#[arcane]
pub fn f32x8_to_srgb8(token: Desktop64, vals: [f32; 8]) -> [u8; 8] {
    let v = safe_unaligned_simd::x86_64::_mm256_loadu_ps(&vals);
    let codes = f32x8_to_srgb8_epi32(token, v);
    let mut out = [0i32; 8];
    safe_unaligned_simd::x86_64::_mm256_storeu_si256(&mut out, codes);
    out.map(|c| c as u8)
}

/// Array form of [`f32x8_to_unorm8_epi32`].
#[arcane]
pub fn f32x8_to_unorm8(token: Desktop64, vals: [f32; 8]) -> [u8; 8] {
    let v = safe_unaligned_simd::x86_64::_mm256_loadu_ps(&vals);
    let codes = f32x8_to_unorm8_epi32(token, v);
    let mut out = [0i32; 8];
    safe_unaligned_simd::x86_64::_mm256_storeu_si256(&mut out, codes);
    out.map(|c| c as u8)
}

/// Array form of [`f32x4_to_srgb8_epi32`].
#[arcane]
pub fn f32x4_to_srgb8(token: Desktop64, vals: [f32; 4]) -> [u8; 4] {
    let v = safe_unaligned_simd::x86_64::_mm_loadu_ps(&vals);
    let codes = f32x4_to_srgb8_epi32(token, v);
    let mut out = [0i32; 4];
    safe_unaligned_simd::x86_64::_mm_storeu_si128(&mut out, codes);
    out.map(|c| c as u8)
}

/// Array form of [`f32x4_to_unorm8_epi32`].
#[arcane]
pub fn f32x4_to_unorm8(token: Desktop64, vals: [f32; 4]) -> [u8; 4] {
    let v = safe_unaligned_simd::x86_64::_mm_loadu_ps(&vals);
    let codes = f32x4_to_unorm8_epi32(token, v);
    let mut out = [0i32; 4];
    safe_unaligned_simd::x86_64::_mm_storeu_si128(&mut out, codes);
    out.map(|c| c as u8)
}
