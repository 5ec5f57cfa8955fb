//! Parity test: all four kernels produce byte-identical rasters

use rgb::RGBA8;
use zenscale::{ResizeMode, resize_with_mode};

const MODES: [ResizeMode; 4] = [
    ResizeMode::Scalar,
    ResizeMode::ScalarUnsafe,
    ResizeMode::Vectorized,
    ResizeMode::Wide,
];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic pseudo-random pixels so failures reproduce exactly.
fn random_image(len: usize, mut seed: u32) -> Vec<RGBA8> {
    (0..len)
        .map(|_| {
            let mut next = || {
                seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
                (seed >> 24) as u8
            };
            RGBA8::new(next(), next(), next(), next())
        })
        .collect()
}

fn run_all_modes(
    src: &[RGBA8],
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
) -> Vec<Vec<RGBA8>> {
    MODES
        .iter()
        .map(|&mode| {
            let mut dst = vec![RGBA8::default(); dst_width * dst_height];
            resize_with_mode(src, src_width, src_height, &mut dst, dst_width, dst_height, mode)
                .unwrap();
            dst
        })
        .collect()
}

#[test]
fn test_cross_variant_equivalence_large() {
    init_logging();
    let src = random_image(257 * 129, 0xC0FFEE);
    let outputs = run_all_modes(&src, 257, 129, 900, 825);

    for (out, mode) in outputs.iter().zip(MODES).skip(1) {
        // Compare raw bytes; the contract is byte identity, not just
        // pixel equality
        assert_eq!(
            bytemuck::cast_slice::<RGBA8, u8>(&outputs[0]),
            bytemuck::cast_slice::<RGBA8, u8>(out),
            "{:?} differs from Scalar on 257x129 -> 900x825",
            mode
        );
    }
}

#[test]
fn test_cross_variant_equivalence_odd_tail_width() {
    init_logging();
    // 901 is not a multiple of 4 or 8, so both SIMD kernels take their
    // residual-column path on every row
    let src = random_image(257 * 129, 0xBADF00D);
    let outputs = run_all_modes(&src, 257, 129, 901, 33);

    for (out, mode) in outputs.iter().zip(MODES).skip(1) {
        assert_eq!(&outputs[0], out, "{:?} differs from Scalar at width 901", mode);

        // Spot-check the final columns covered by the tail path
        for yo in 0..33 {
            let row = &out[yo * 901..][..901];
            let expect = &outputs[0][yo * 901..][..901];
            assert_eq!(&row[896..], &expect[896..], "{:?} tail columns, row {}", mode, yo);
        }
    }
}

#[test]
fn test_cross_variant_equivalence_small_sizes() {
    let src = random_image(7 * 5, 42);

    for (wo, ho) in [(1, 1), (2, 9), (3, 3), (4, 4), (5, 2), (8, 1), (13, 13), (16, 2)] {
        let outputs = run_all_modes(&src, 7, 5, wo, ho);
        for (out, mode) in outputs.iter().zip(MODES).skip(1) {
            assert_eq!(&outputs[0], out, "{:?} differs from Scalar at {}x{}", mode, wo, ho);
        }
    }
}

#[test]
fn test_downscale_parity() {
    let src = random_image(640 * 480, 7);
    let outputs = run_all_modes(&src, 640, 480, 123, 77);
    for (out, mode) in outputs.iter().zip(MODES).skip(1) {
        assert_eq!(&outputs[0], out, "{:?} differs from Scalar on downscale", mode);
    }
}

#[test]
fn test_determinism() {
    let src = random_image(33 * 21, 99);

    for mode in MODES {
        let mut first = vec![RGBA8::default(); 100 * 50];
        let mut second = vec![RGBA8::default(); 100 * 50];
        resize_with_mode(&src, 33, 21, &mut first, 100, 50, mode).unwrap();
        resize_with_mode(&src, 33, 21, &mut second, 100, 50, mode).unwrap();
        assert_eq!(first, second, "{:?} is not deterministic", mode);
    }
}
