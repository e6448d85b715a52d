use super::*;
use crate::{
    assets::store::NoAssets,
    foundation::core::Palette,
    render::plan::{DrawCommand, FramePlan},
};

const NARROW: f64 = 500.0;
const WIDE: f64 = 1000.0;

fn seq() -> GuidanceSequence {
    GuidanceSequence::new(GuidanceConfig::default()).unwrap()
}

fn plan_for(seq: &GuidanceSequence, width: f64, stage: GuidanceStage, p: f64) -> FramePlan {
    let (surface, bp) = seq.surface_for_container(width).unwrap();
    let anchors = seq.layout().compute_anchors(surface, bp);
    let palette = Palette::default();
    let input = StageInput {
        stage,
        progress: p,
        raw_progress: p,
        lap: 0,
        anchors: &anchors,
        palette: &palette,
        assets: &NoAssets,
    };
    let mut out = FrameBuilder::new();
    seq.render(seq.handler_for(stage), &input, &mut out).unwrap();
    out.finish(surface, stage.name())
}

fn label_alpha(seq: &GuidanceSequence, stage: GuidanceStage, p: f64) -> Option<f64> {
    let (surface, bp) = seq.surface_for_container(WIDE).unwrap();
    let anchors = seq.layout().compute_anchors(surface, bp);
    let palette = Palette::default();
    let input = StageInput {
        stage,
        progress: p,
        raw_progress: p,
        lap: 0,
        anchors: &anchors,
        palette: &palette,
        assets: &NoAssets,
    };
    seq.phase_label(&input).map(|l| l.alpha)
}

#[test]
fn default_timeline_has_fourteen_stages() {
    let s = seq();
    assert_eq!(s.timeline().len(), 14);
    assert_eq!(s.timeline().total_ms(), 21_900.0);
    assert_eq!(s.easing(), Ease::InOutCubic);
}

#[test]
fn canvas_follows_breakpoint() {
    let s = seq();
    let (narrow, bp) = s.surface_for_container(NARROW).unwrap();
    assert_eq!(bp, Breakpoint::Narrow);
    assert_eq!((narrow.width, narrow.height), (500.0, 1500.0));

    let (wide, bp) = s.surface_for_container(WIDE).unwrap();
    assert_eq!(bp, Breakpoint::Wide);
    assert_eq!((wide.width, wide.height), (1000.0, 450.0));

    let (capped, _) = s.surface_for_container(1600.0).unwrap();
    assert_eq!((capped.width, capped.height), (1200.0, 480.0));

    assert!(s.surface_for_container(0.0).is_err());
}

#[test]
fn layout_is_deterministic() {
    let s = seq();
    let (surface, bp) = s.surface_for_container(WIDE).unwrap();
    let a = serde_json::to_string(&s.layout().compute_anchors(surface, bp)).unwrap();
    let b = serde_json::to_string(&s.layout().compute_anchors(surface, bp)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn narrow_stacks_outputs_and_wide_places_them_beside_the_model() {
    let s = seq();
    let (surface, bp) = s.surface_for_container(NARROW).unwrap();
    let narrow = s.layout().compute_anchors(surface, bp);
    let model = narrow.rect(GuidanceAnchor::Model).unwrap();
    let high = narrow.rect(GuidanceAnchor::HighOut).unwrap();
    let low = narrow.rect(GuidanceAnchor::LowOut).unwrap();
    assert!(high.y0 > model.y1);
    assert!(low.y0 > high.y1);
    assert_eq!(high.x0, low.x0);

    let (surface, bp) = s.surface_for_container(WIDE).unwrap();
    let wide = s.layout().compute_anchors(surface, bp);
    let model = wide.rect(GuidanceAnchor::Model).unwrap();
    let high = wide.rect(GuidanceAnchor::HighOut).unwrap();
    assert!(high.x0 > model.x1);
    assert!((model.center().x - 500.0).abs() < 1e-9);
}

#[test]
fn score_vectors_share_a_slot() {
    let s = seq();
    let (surface, bp) = s.surface_for_container(WIDE).unwrap();
    let a = s.layout().compute_anchors(surface, bp);
    assert_eq!(
        a.rect(GuidanceAnchor::SPlus).unwrap(),
        a.rect(GuidanceAnchor::SMinus).unwrap()
    );
}

#[test]
fn stages_group_into_handlers() {
    let s = seq();
    assert_eq!(s.handler_for(GuidanceStage::SMinusInput), GuidanceHandler::Inputs);
    assert_eq!(s.handler_for(GuidanceStage::HighOutput), GuidanceHandler::HighBranch);
    assert_eq!(s.handler_for(GuidanceStage::ProcessSMinus), GuidanceHandler::LowBranch);
    assert_eq!(s.handler_for(GuidanceStage::Regroup), GuidanceHandler::Subtraction);
    assert_eq!(s.handler_for(GuidanceStage::Hold), GuidanceHandler::Guidance);
}

#[test]
fn every_stage_renders_at_both_breakpoints() {
    let s = seq();
    for stage in s.timeline().stages() {
        for width in [NARROW, WIDE] {
            for p in [0.0, 0.25, 0.5, 0.75, 0.999] {
                let plan = plan_for(&s, width, stage.id, p);
                assert!(
                    !plan.commands.is_empty(),
                    "{} at {p} drew nothing",
                    stage.id.name()
                );
                for o in &plan.overlays {
                    assert!(OVERLAY_LABELS.contains(&o.label));
                }
            }
        }
    }
}

#[test]
fn inputs_show_noisy_image_and_score_label() {
    let s = seq();
    let plan = plan_for(&s, WIDE, GuidanceStage::SPlusInput, 0.5);
    let noisy = plan.commands.iter().find_map(|c| match c {
        DrawCommand::Image { asset, noise, .. } if *asset == s.config().images.input => Some(*noise),
        _ => None,
    });
    assert_eq!(noisy, Some(0.9));
    assert_eq!(plan.overlay("s_plus").unwrap().opacity, 1.0);
}

#[test]
fn high_output_fades_in_with_progress() {
    let s = seq();
    let plan = plan_for(&s, WIDE, GuidanceStage::HighOutput, 0.5);
    assert_eq!(plan.overlay("high_reward_out").unwrap().opacity, 0.5);
    let high = plan.commands.iter().find_map(|c| match c {
        DrawCommand::Image { asset, alpha, .. } if *asset == s.config().images.high => Some(*alpha),
        _ => None,
    });
    assert_eq!(high, Some(0.5));
}

#[test]
fn subtraction_reveals_guidance_vector_late() {
    let s = seq();
    let regroup = plan_for(&s, WIDE, GuidanceStage::Regroup, 0.9);
    assert!(regroup.overlay("guidance_vec").is_none());

    let early = plan_for(&s, WIDE, GuidanceStage::Subtraction, 0.2);
    assert!(early.overlay("guidance_vec").is_none());

    let late = plan_for(&s, WIDE, GuidanceStage::Subtraction, 0.95);
    assert!(late.overlay("guidance_vec").is_some());
    let dashed = late.commands.iter().any(|c| {
        matches!(c, DrawCommand::Stroke { style, .. } if style.dash == Some([8.0, 6.0]))
    });
    assert!(dashed);
}

#[test]
fn hold_shows_title_and_formula() {
    let s = seq();
    let plan = plan_for(&s, NARROW, GuidanceStage::Hold, 0.5);
    assert!(plan.texts().any(|t| t.text == s.config().text.final_title));
    assert_eq!(plan.overlay("guidance_formula").unwrap().opacity, 1.0);
}

#[test]
fn phase_label_fades_per_stage() {
    let s = seq();
    assert_eq!(label_alpha(&s, GuidanceStage::ImageCaptionInput, 0.5), None);
    assert_eq!(label_alpha(&s, GuidanceStage::SPlusToModel, 0.25), Some(0.5));
    assert_eq!(label_alpha(&s, GuidanceStage::ProcessSPlus, 0.1), Some(1.0));
    assert_eq!(label_alpha(&s, GuidanceStage::LowOutput, 0.75), Some(0.5));
    let sub = label_alpha(&s, GuidanceStage::Subtraction, 0.9).unwrap();
    assert!((sub - 0.5).abs() < 1e-9);
    assert_eq!(label_alpha(&s, GuidanceStage::Hold, 0.0), Some(1.0));
}

#[test]
fn config_json_overrides_only_named_fields() {
    let cfg = GuidanceConfig::from_json_str(r#"{ "reward_count": 3 }"#).unwrap();
    assert_eq!(cfg.reward_count, 3);
    assert_eq!(cfg.breakpoint_width, 700.0);

    assert!(GuidanceConfig::from_json_str(r#"{ "reward_count": 0 }"#).is_err());
    let err = GuidanceConfig::from_json_str(
        r#"{ "windows": { "final_fade": { "start": 0.5, "end": 0.2 } } }"#,
    )
    .unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
}
