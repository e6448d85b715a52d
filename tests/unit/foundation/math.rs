use super::*;

#[test]
fn lerp_helpers_hit_endpoints() {
    assert_eq!(lerp(2.0, 6.0, 0.25), 3.0);
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(100.0, 50.0, 140.0, 70.0);
    assert_eq!(lerp_rect(a, b, 0.0), a);
    assert_eq!(lerp_rect(a, b, 1.0), b);
    let mid = lerp_rect(a, b, 0.5);
    assert_eq!(mid.origin(), Point::new(50.0, 25.0));
    assert_eq!(mid.width(), 25.0);
}

#[test]
fn clamp01_handles_nan() {
    assert_eq!(clamp01(f64::NAN), 0.0);
    assert_eq!(clamp01(-3.0), 0.0);
    assert_eq!(clamp01(3.0), 1.0);
}

#[test]
fn rng_is_deterministic_per_seed() {
    let mut a = Rng64::new(7);
    let mut b = Rng64::new(7);
    for _ in 0..16 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn gaussian_samples_have_unit_scale() {
    let mut rng = Rng64::new(42);
    let n = 20_000;
    let samples: Vec<f64> = (0..n).map(|_| rng.next_gaussian()).collect();
    let mean = samples.iter().sum::<f64>() / n as f64;
    let var = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    assert!(mean.abs() < 0.05, "mean={mean}");
    assert!((var - 1.0).abs() < 0.08, "var={var}");
}

#[test]
fn value_noise_is_bounded_and_continuous() {
    let mut prev = value_noise(3, 0.0);
    for i in 1..1000 {
        let v = value_noise(3, i as f64 * 0.01);
        assert!((0.0..=1.0).contains(&v));
        assert!((v - prev).abs() < 0.1);
        prev = v;
    }
    assert_eq!(value_noise(3, 5.0), value_noise(3, 5.0));
}
