use super::*;
use crate::{
    assets::store::{AssetProvider, NoAssets, PreparedImage},
    foundation::core::{Palette, Point},
    render::plan::{DrawCommand, FramePlan, Paint, Shape},
};

const NARROW: f64 = 500.0;
const WIDE: f64 = 1000.0;

fn seq() -> TradeoffSequence {
    TradeoffSequence::new(TradeoffConfig::default()).unwrap()
}

fn tiny() -> PreparedImage {
    PreparedImage::from_rgba(image::RgbaImage::from_pixel(2, 2, image::Rgba([9, 9, 9, 255])))
}

fn plan_for(
    seq: &TradeoffSequence,
    width: f64,
    stage: TradeoffStage,
    p: f64,
    assets: &dyn AssetProvider,
) -> FramePlan {
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
        assets,
    };
    let mut out = FrameBuilder::new();
    seq.render(seq.handler_for(stage), &input, &mut out).unwrap();
    out.finish(surface, stage.name())
}

fn bar_count(seq: &TradeoffSequence, plan: &FramePlan) -> usize {
    plan.commands
        .iter()
        .filter(|c| match c {
            DrawCommand::Fill {
                paint: Paint::Solid(color),
                ..
            } => seq.config().reward_colors.contains(color),
            _ => false,
        })
        .count()
}

#[test]
fn timeline_holds_around_the_scrub() {
    let s = seq();
    let names: Vec<_> = s.timeline().stages().iter().map(|st| st.id.name()).collect();
    assert_eq!(names, ["hold_start", "scrub", "hold_end"]);
    assert_eq!(s.timeline().total_ms(), 44_000.0);
    assert_eq!(s.easing(), Ease::Linear);
}

#[test]
fn frame_follows_elapsed_time() {
    let s = seq();
    assert_eq!(s.frame_at(0.0), 0);
    assert_eq!(s.frame_at(1999.0), 0);
    assert_eq!(s.frame_at(2000.0), 0);
    assert_eq!(s.frame_at(2200.0), 1);
    assert_eq!(s.frame_at(2000.0 + 100.5 * 200.0), 100);
    assert_eq!(s.frame_at(41_999.0), 199);
    assert_eq!(s.frame_at(43_000.0), 199);
    assert_eq!(s.frame_at(44_000.0), 0);
    assert_eq!(s.frame_for(TradeoffStage::Scrub, 1.0), 199);
}

#[test]
fn canvas_policy_per_breakpoint() {
    let s = seq();
    let (narrow, bp) = s.surface_for_container(NARROW).unwrap();
    assert_eq!(bp, Breakpoint::Narrow);
    assert_eq!((narrow.width, narrow.height), (500.0, 1000.0));
    let (small, _) = s.surface_for_container(250.0).unwrap();
    assert_eq!(small.height, 600.0);

    let (wide, bp) = s.surface_for_container(WIDE).unwrap();
    assert_eq!(bp, Breakpoint::Wide);
    assert_eq!((wide.width, wide.height), (1000.0, 500.0));
    let (huge, _) = s.surface_for_container(1800.0).unwrap();
    assert_eq!((huge.width, huge.height), (1200.0, 600.0));
    assert!(s.surface_for_container(-1.0).is_err());
}

#[test]
fn layout_is_deterministic() {
    let s = seq();
    for width in [NARROW, WIDE] {
        let (surface, bp) = s.surface_for_container(width).unwrap();
        let a = serde_json::to_string(&s.layout().compute_anchors(surface, bp)).unwrap();
        let b = serde_json::to_string(&s.layout().compute_anchors(surface, bp)).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn narrow_layout_stacks_elements() {
    let s = seq();
    let (surface, bp) = s.surface_for_container(NARROW).unwrap();
    let a = s.layout().compute_anchors(surface, bp);
    assert_eq!(a.point(TradeoffAnchor::Prompt).unwrap(), Point::new(250.0, 40.0));
    let vector = a.rect(TradeoffAnchor::Vector).unwrap();
    let model = a.rect(TradeoffAnchor::Model).unwrap();
    let output = a.rect(TradeoffAnchor::Output).unwrap();
    assert_eq!((vector.x0, vector.y0, vector.width()), (180.0, 120.0, 140.0));
    assert_eq!(model.y0, 290.0);
    assert_eq!(output.y0, 440.0);
    assert_eq!(output.center().x, 250.0);
    assert!(output.y1 <= surface.height);
}

#[test]
fn wide_layout_flanks_the_model() {
    let s = seq();
    let (surface, bp) = s.surface_for_container(WIDE).unwrap();
    let a = s.layout().compute_anchors(surface, bp);
    let vector = a.rect(TradeoffAnchor::Vector).unwrap();
    let model = a.rect(TradeoffAnchor::Model).unwrap();
    let output = a.rect(TradeoffAnchor::Output).unwrap();
    assert_eq!(model.x0, 400.0);
    assert_eq!(vector.x0, 140.0);
    assert_eq!(output.x0, 680.0);
    for r in [vector, model, output] {
        assert_eq!(r.center().y, 250.0);
    }
}

#[test]
fn bars_follow_the_reward_row_of_the_frame() {
    let csv = "frame,a,b,c,d,e,f,g\n0,1,0,0,0,0,0,0\n199,1,1,1,0,0,0,0\n";
    let s = seq().with_rewards(RewardTable::parse(csv, 7).unwrap());
    let first = plan_for(&s, WIDE, TradeoffStage::HoldStart, 0.5, &NoAssets);
    assert_eq!(bar_count(&s, &first), 1);
    let last = plan_for(&s, WIDE, TradeoffStage::HoldEnd, 0.5, &NoAssets);
    assert_eq!(bar_count(&s, &last), 3);
    let missing = plan_for(&s, WIDE, TradeoffStage::Scrub, 0.5, &NoAssets);
    assert_eq!(bar_count(&s, &missing), 7);
}

#[test]
fn missing_frame_draws_placeholder() {
    let s = seq();
    let plan = plan_for(&s, WIDE, TradeoffStage::HoldStart, 0.0, &NoAssets);
    assert!(!plan.commands.iter().any(|c| matches!(c, DrawCommand::Image { .. })));
    assert!(plan.texts().any(|t| t.text == "Generated Output"));

    let mut store = PreparedAssetStore::new("unused");
    store.insert(&s.config().frame_key(0), tiny()).unwrap();
    let plan = plan_for(&s, WIDE, TradeoffStage::HoldStart, 0.0, &store);
    let asset = plan.commands.iter().find_map(|c| match c {
        DrawCommand::Image { asset, noise, .. } => Some((asset.clone(), *noise)),
        _ => None,
    });
    assert_eq!(
        asset,
        Some(("assets/images/random_walk_output/frame_0000.jpg".to_owned(), 0.0))
    );
}

#[test]
fn arrows_only_on_wide() {
    let s = seq();
    let triangles = |plan: &FramePlan| {
        plan.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill { shape: Shape::Triangle(_), .. }))
            .count()
    };
    assert_eq!(triangles(&plan_for(&s, WIDE, TradeoffStage::Scrub, 0.3, &NoAssets)), 2);
    assert_eq!(triangles(&plan_for(&s, NARROW, TradeoffStage::Scrub, 0.3, &NoAssets)), 0);
}

#[test]
fn overlay_sits_on_the_histogram() {
    let s = seq();
    let plan = plan_for(&s, WIDE, TradeoffStage::Scrub, 0.3, &NoAssets);
    let o = plan.overlay("s_custom").unwrap();
    assert_eq!(o.position, Point::new(140.0 + 90.0 - 25.0, 160.0 + 2.0));
    assert_eq!(o.opacity, 1.0);
    assert_eq!(s.overlay_labels(), ["s_custom"]);
}

#[test]
fn prefetch_keeps_a_window_around_the_frame() {
    let s = seq();
    let mut store = PreparedAssetStore::new("unused");
    for i in 0..=40 {
        store.insert(&s.config().frame_key(i), tiny()).unwrap();
    }
    store.insert("assets/other.png", tiny()).unwrap();

    let available = s.prefetch(&mut store, 30);
    assert_eq!(available, 11);
    assert!(!store.contains(&s.config().frame_key(14)));
    assert!(store.contains(&s.config().frame_key(15)));
    assert!(store.contains(&s.config().frame_key(40)));
    assert!(store.contains("assets/other.png"));
    assert_eq!(store.len(), 26 + 1);
}

#[test]
fn config_rejects_empty_rewards() {
    assert!(TradeoffConfig::from_json_str(r#"{ "reward_names": [] }"#).is_err());
    assert!(TradeoffConfig::from_json_str(r#"{ "frame_count": 0 }"#).is_err());
    let cfg = TradeoffConfig::from_json_str(r#"{ "frame_count": 10, "frame_ms": 100 }"#).unwrap();
    let s = TradeoffSequence::new(cfg).unwrap();
    assert_eq!(s.timeline().total_ms(), 5000.0);
    assert_eq!(s.rewards().rewards(3), [0.5; 7]);
}
