//! Lane-wise SIMD forms of the sRGB codec
//!
//! This module contains safe SIMD implementations using archmage tokens.
//! Every function here is bit-identical to its scalar counterpart in
//! [`crate::srgb`] for all inputs, NaN included.

#[cfg(target_arch = "x86_64")]
mod srgb;

#[cfg(target_arch = "x86_64")]
pub use srgb::*;
