use super::*;

const ALL: [Ease; 7] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
];

#[test]
fn endpoints_are_stable() {
    for e in ALL {
        assert_eq!(e.apply(0.0), 0.0, "{e:?}");
        assert_eq!(e.apply(1.0), 1.0, "{e:?}");
    }
}

#[test]
fn inputs_are_clamped() {
    for e in ALL {
        assert_eq!(e.apply(-2.0), 0.0);
        assert_eq!(e.apply(5.0), 1.0);
        assert_eq!(e.apply(f64::NAN), 0.0);
    }
}

#[test]
fn curves_are_monotonic() {
    for e in ALL {
        let mut prev = 0.0;
        for i in 0..=200 {
            let v = e.apply(i as f64 / 200.0);
            assert!(v + 1e-12 >= prev, "{e:?} at {i}");
            prev = v;
        }
    }
}

#[test]
fn in_out_cubic_is_symmetric_at_midpoint() {
    assert!((Ease::InOutCubic.apply(0.5) - 0.5).abs() < 1e-12);
    assert!((Ease::InOutCubic.apply(0.25) - 0.0625).abs() < 1e-12);
}

#[test]
fn serde_names_are_snake_case() {
    let e: Ease = serde_json::from_str("\"in_out_cubic\"").unwrap();
    assert_eq!(e, Ease::InOutCubic);
    assert_eq!(serde_json::to_string(&Ease::Linear).unwrap(), "\"linear\"");
}
