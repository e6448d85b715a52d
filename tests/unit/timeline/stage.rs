use super::*;

fn abc() -> Timeline<&'static str> {
    Timeline::new(vec![
        Stage::new("a", 1000.0),
        Stage::new("b", 500.0),
        Stage::new("c", 1500.0),
    ])
    .unwrap()
}

fn at(t: &Timeline<&'static str>, ms: f64) -> (&'static str, f64) {
    let s = t.sample(ms);
    (s.stage, s.raw_progress)
}

#[test]
fn construction_fails_fast_on_bad_durations() {
    assert!(Timeline::<&'static str>::new(vec![]).is_err());
    assert!(Timeline::new(vec![Stage::new("a", 0.0)]).is_err());
    assert!(Timeline::new(vec![Stage::new("a", 10.0), Stage::new("b", -1.0)]).is_err());
    assert!(Timeline::new(vec![Stage::new("a", f64::NAN)]).is_err());
    assert_eq!(abc().total_ms(), 3000.0);
}

#[test]
fn three_stage_scenario() {
    let t = abc();
    assert_eq!(at(&t, 0.0), ("a", 0.0));
    let (id, p) = at(&t, 999.0);
    assert_eq!(id, "a");
    assert!((p - 0.999).abs() < 1e-12);
    assert_eq!(at(&t, 1000.0), ("b", 0.0));
    let (id, p) = at(&t, 1499.0);
    assert_eq!(id, "b");
    assert!((p - 0.998).abs() < 1e-12);
    assert_eq!(at(&t, 1500.0), ("c", 0.0));
    assert_eq!(at(&t, 3000.0), ("a", 0.0));
    assert_eq!(at(&t, 4500.0), ("c", 0.0));
}

#[test]
fn laps_count_completed_loops() {
    let t = abc();
    assert_eq!(t.sample(0.0).lap, 0);
    assert_eq!(t.sample(2999.0).lap, 0);
    assert_eq!(t.sample(3000.0).lap, 1);
    assert_eq!(t.sample(9500.0).lap, 3);
    assert_eq!(t.sample(9500.0).index, 0);
    assert_eq!(t.sample(10_000.0).index, 1);
}

#[test]
fn samples_stay_in_range_and_repeat_each_loop() {
    let t = abc();
    let ids = ["a", "b", "c"];
    for i in 0..5000 {
        let ms = i as f64 * 1.37;
        let s = t.sample(ms);
        assert!(ids.contains(&s.stage));
        assert!((0.0..1.0).contains(&s.raw_progress), "{ms} -> {s:?}");

        let next = t.sample(ms + t.total_ms());
        assert_eq!(next.stage, s.stage);
        assert!((next.raw_progress - s.raw_progress).abs() < 1e-9);
        assert_eq!(next.lap, s.lap + 1);
    }
}

#[test]
fn non_finite_elapsed_heals_to_first_stage() {
    let t = abc();
    let s = t.sample(f64::NAN);
    assert_eq!((s.index, s.stage, s.raw_progress), (0, "a", 0.0));
    let s = t.sample(f64::INFINITY);
    assert_eq!((s.index, s.raw_progress), (0, 0.0));
}

#[test]
fn negative_elapsed_wraps_backwards() {
    let t = abc();
    assert_eq!(at(&t, -1500.0), ("c", 0.0));
    assert_eq!(t.sample(-1500.0).lap, 0);
}

#[test]
fn start_offsets_accumulate() {
    let t = abc();
    assert_eq!(t.start_of(0), Some(0.0));
    assert_eq!(t.start_of(2), Some(1500.0));
    assert_eq!(t.start_of(3), None);
}
