use super::*;

#[test]
fn sub_window_rescales_and_clamps() {
    let w = Window::new(0.4, 0.7);
    assert_eq!(w.progress(0.4), 0.0);
    assert!((w.progress(0.55) - 0.5).abs() < 1e-12);
    assert_eq!(w.progress(0.7), 1.0);
    assert_eq!(w.progress(0.2), 0.0);
    assert_eq!(w.progress(0.9), 1.0);
}

#[test]
fn sub_window_is_monotonic_and_bounded() {
    let windows = [
        Window::new(0.0, 0.3),
        Window::new(0.15, 0.45),
        Window::new(0.5, 1.0),
        Window::new(0.3, 0.31),
    ];
    for w in windows {
        let mut prev = 0.0;
        for i in 0..=1000 {
            let v = w.progress(i as f64 / 1000.0);
            assert!((0.0..=1.0).contains(&v));
            assert!(v >= prev);
            prev = v;
        }
    }
}

#[test]
fn validation_rejects_inverted_windows() {
    assert!(Window::new(0.5, 0.5).validate().is_err());
    assert!(Window::new(0.7, 0.4).validate().is_err());
    assert!(Window::new(0.0, f64::INFINITY).validate().is_err());
    assert!(Window::span(0.4, 0.3).validate().is_ok());
}

#[test]
fn fades_follow_half_stage_ramps() {
    assert_eq!(fade_in(0.25, 2.0), 0.5);
    assert_eq!(fade_in(0.8, 2.0), 1.0);
    assert_eq!(fade_out_after(0.75, 0.5, 2.0), 0.5);
    assert_eq!(fade_out_after(0.2, 0.5, 2.0), 1.0);
    assert_eq!(fade_in_out(0.5), 1.0);
    assert_eq!(fade_in_out(1.0), 0.0);
}
