use super::*;
use crate::{
    assets::store::NoAssets,
    render::overlay::RecordingOverlay,
    sequences::guidance::{GuidanceConfig, GuidanceSequence, OVERLAY_LABELS},
};

fn controller(width: f64) -> PlaybackController<GuidanceSequence> {
    let seq = GuidanceSequence::new(GuidanceConfig::default()).unwrap();
    PlaybackController::new(seq, PlaybackConfig::default(), width).unwrap()
}

fn tick(c: &mut PlaybackController<GuidanceSequence>, now: f64) -> Option<FramePlan> {
    c.tick(now, &Palette::default(), &NoAssets).unwrap()
}

#[test]
fn stopped_until_visible() {
    let mut c = controller(1000.0);
    assert!(!c.is_playing());
    assert!(tick(&mut c, 0.0).is_none());

    c.on_visibility(0.2, 0.0);
    assert!(!c.is_playing());

    c.on_visibility(0.35, 1000.0);
    assert!(c.is_playing());
    let plan = tick(&mut c, 1000.0).unwrap();
    assert_eq!(plan.stage, "s_plus_input");
}

#[test]
fn leaving_the_viewport_pauses_and_reentering_restarts() {
    let mut c = controller(1000.0);
    c.on_visibility(1.0, 0.0);
    for t in (0..=1000).step_by(100) {
        tick(&mut c, t as f64);
    }
    c.on_visibility(0.0, 1000.0);
    assert!(!c.is_playing());
    assert!(tick(&mut c, 1100.0).is_none());
    assert_eq!(c.elapsed(5000.0), 1000.0);

    c.on_visibility(0.9, 8000.0);
    assert_eq!(c.elapsed(8000.0), 0.0);
    assert_eq!(tick(&mut c, 8000.0).unwrap().stage, "s_plus_input");
}

#[test]
fn click_toggle_without_time_passing_is_idempotent() {
    let mut c = controller(1000.0);
    c.on_click(0.0);
    assert!(c.is_playing());
    tick(&mut c, 0.0);
    tick(&mut c, 200.0);
    let before = c.elapsed(200.0);

    c.on_click(200.0);
    assert!(!c.is_playing());
    c.on_click(200.0);
    assert!(c.is_playing());
    assert_eq!(c.elapsed(200.0), before);
    let sample = c.sequence().timeline().sample(c.elapsed(200.0));
    assert_eq!(sample.stage.name(), "s_plus_input");
    assert!((sample.raw_progress - 200.0 / 300.0).abs() < 1e-9);
}

#[test]
fn resume_after_click_keeps_wrapped_position() {
    let mut c = controller(1000.0);
    c.on_click(0.0);
    c.on_click(1200.0);
    c.on_click(60_000.0);
    assert_eq!(c.elapsed(60_000.0), 1200.0);
    assert_eq!(tick(&mut c, 60_000.0).unwrap().stage, "s_plus_to_model");
}

#[test]
fn stalled_ticks_are_clamped() {
    let mut c = controller(1000.0);
    c.on_visibility(1.0, 0.0);
    tick(&mut c, 0.0);
    tick(&mut c, 100.0);
    assert_eq!(c.elapsed(100.0), 100.0);

    tick(&mut c, 10_100.0);
    assert_eq!(c.elapsed(10_100.0), 350.0);
    tick(&mut c, 10_200.0);
    assert_eq!(c.elapsed(10_200.0), 450.0);
}

#[test]
fn resize_recomputes_anchors_and_reports_flips() {
    let mut c = controller(1000.0);
    assert_eq!(c.breakpoint(), Breakpoint::Wide);
    let wide = c.anchors().clone();

    assert!(c.on_resize(500.0).unwrap());
    assert_eq!(c.breakpoint(), Breakpoint::Narrow);
    assert_eq!(c.surface().width, 500.0);
    assert_ne!(c.anchors(), &wide);

    assert!(!c.on_resize(600.0).unwrap());
    assert_eq!(c.surface().width, 600.0);
    assert!(c.on_resize(0.0).is_err());
    assert_eq!(c.surface().width, 600.0);
}

#[test]
fn render_at_is_pure_and_adds_the_phase_label() {
    let c = controller(1000.0);
    let pal = Palette::default();
    let a = c.render_at(1500.0, &pal, &NoAssets).unwrap();
    let b = c.render_at(1500.0, &pal, &NoAssets).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.stage, "s_plus_to_model");
    assert!(
        a.texts()
            .any(|t| t.text == "Computing the velocity for high scores")
    );
    assert!(!c.is_playing());
}

#[test]
fn present_hides_unplaced_labels() {
    let mut c = controller(1000.0);
    c.on_visibility(1.0, 0.0);
    let mut overlay = RecordingOverlay::default();
    let plan = tick(&mut c, 100.0).unwrap();
    c.present(&plan, &mut overlay);

    for label in OVERLAY_LABELS {
        let state = overlay.get(label).unwrap();
        match plan.overlay(label) {
            Some(p) => assert_eq!(state.opacity, p.opacity),
            None => assert_eq!(state.opacity, 0.0),
        }
    }
}

#[test]
fn config_validation() {
    assert!(PlaybackConfig::from_json_str(r#"{ "visibility_threshold": 0 }"#).is_err());
    assert!(PlaybackConfig::from_json_str(r#"{ "max_step_ms": -1 }"#).is_err());
    let cfg = PlaybackConfig::from_json_str(r#"{ "max_step_ms": 100 }"#).unwrap();
    assert_eq!(cfg.visibility_threshold, 0.35);
}
