use super::*;

fn gray(w: u32, h: u32, v: u8) -> image::RgbaImage {
    image::RgbaImage::from_pixel(w, h, image::Rgba([v, v, v, 200]))
}

#[test]
fn zero_mix_weight_returns_source() {
    let src = gray(8, 8, 120);
    let mut c = NoiseCompositor::new(NoiseParams::default(), 1);
    assert_eq!(c.blend(&src, None, 0.0), src);
    assert_eq!(c.image_weight(0.0), 1.0);
}

#[test]
fn full_mix_weight_scales_image_by_one_minus_k() {
    let src = gray(4, 4, 200);
    let mut c = NoiseCompositor::new(
        NoiseParams {
            std_dev: 0.0,
            max_weight: 0.4,
        },
        9,
    );
    let out = c.blend(&src, None, 1.0);
    assert!((c.image_weight(1.0) - 0.6).abs() < 1e-12);
    for px in out.pixels() {
        assert_eq!(px.0, [120, 120, 120, 200]);
    }
}

#[test]
fn noise_is_centered_and_rerolled_each_call() {
    let src = gray(64, 64, 128);
    let mut c = NoiseCompositor::new(NoiseParams::default(), 3);
    let a = c.blend(&src, None, 1.0);
    let b = c.blend(&src, None, 1.0);
    assert_ne!(a, b);

    let n = (64 * 64 * 3) as f64;
    let mean = a
        .pixels()
        .flat_map(|p| p.0[..3].to_vec())
        .map(f64::from)
        .sum::<f64>()
        / n;
    // 0.6 * 128 plus zero-mean noise.
    assert!((mean - 76.8).abs() < 2.0, "mean={mean}");
    assert!(a.pixels().all(|p| p.0[3] == 200));
}

#[test]
fn region_limits_affected_pixels() {
    let src = gray(10, 10, 100);
    let mut c = NoiseCompositor::new(NoiseParams::default(), 5);
    let out = c.blend(&src, Some(Rect::new(2.0, 2.0, 5.0, 5.0)), 1.0);
    assert_eq!(out.get_pixel(0, 0), src.get_pixel(0, 0));
    assert_eq!(out.get_pixel(9, 9), src.get_pixel(9, 9));
    let changed = (2..5)
        .flat_map(|y| (2..5).map(move |x| (x, y)))
        .filter(|&(x, y)| out.get_pixel(x, y) != src.get_pixel(x, y))
        .count();
    assert!(changed > 0);
}

#[test]
fn params_validate_ranges() {
    assert!(NoiseParams::default().validate().is_ok());
    assert!(
        NoiseParams {
            std_dev: 10.0,
            max_weight: 1.5
        }
        .validate()
        .is_err()
    );
}
