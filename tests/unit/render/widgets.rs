use super::*;
use crate::render::plan::DrawCommand;

fn surface() -> Surface {
    Surface::new(400.0, 300.0).unwrap()
}

#[test]
fn bar_slots_tile_the_card_with_padding() {
    let layout = BarLayout {
        pad: 6.0,
        label_height: 20.0,
    };
    let rect = Rect::new(0.0, 0.0, 76.0, 100.0);
    let first = layout.slot(rect, 7, 0);
    let last = layout.slot(rect, 7, 6);
    assert!((first.x0 - 6.0).abs() < 1e-9);
    assert!((first.width() - 4.0).abs() < 1e-9);
    assert!((last.x1 - 70.0).abs() < 1e-9);
    assert!((first.y0 - 26.0).abs() < 1e-9);
    assert!((first.y1 - 94.0).abs() < 1e-9);
}

#[test]
fn bars_grow_from_the_bottom_and_skip_zero_values() {
    let layout = BarLayout {
        pad: 8.0,
        label_height: 16.0,
    };
    let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
    let mut out = FrameBuilder::new();
    reward_bars(
        &mut out,
        rect,
        &[0.5, 0.0, 2.0],
        &[Rgba8::WHITE],
        layout,
        1.0,
    );
    let plan = out.finish(surface(), "t");
    assert_eq!(plan.commands.len(), 2);
    let DrawCommand::Fill {
        shape: Shape::Rect { rect: half, .. },
        ..
    } = &plan.commands[0]
    else {
        panic!("expected a rect fill");
    };
    let slot = layout.slot(rect, 3, 0);
    assert!((half.y1 - slot.y1).abs() < 1e-9);
    assert!((half.height() - slot.height() / 2.0).abs() < 1e-9);
    let DrawCommand::Fill {
        shape: Shape::Rect { rect: full, .. },
        ..
    } = &plan.commands[1]
    else {
        panic!("expected a rect fill");
    };
    assert!((full.height() - slot.height()).abs() < 1e-9, "values clamp to 1");
}

#[test]
fn phase_label_depends_on_breakpoint() {
    let pal = Palette::default();
    let mut out = FrameBuilder::new();
    phase_label(&mut out, &pal, surface(), Breakpoint::Narrow, "n", 1.0);
    phase_label(&mut out, &pal, surface(), Breakpoint::Wide, "w", 0.5);
    let plan = out.finish(surface(), "t");
    let runs: Vec<_> = plan.texts().collect();
    assert_eq!(runs[0].origin, Point::new(200.0, 5.0));
    assert_eq!(runs[0].size, 13.0);
    assert_eq!(runs[1].origin, Point::new(200.0, 10.0));
    assert_eq!(runs[1].size, 16.0);
    assert_eq!(runs[1].style, FontStyle::Bold);
}

#[test]
fn caption_box_fades_as_a_group() {
    let pal = Palette::default();
    let mut out = FrameBuilder::new();
    caption_box(
        &mut out,
        &pal,
        &CaptionBox {
            rect: Rect::new(10.0, 10.0, 110.0, 50.0),
            text: "\"a scenic volcano\"",
            padding: 8.0,
            radius: 6.0,
            text_scale: 1.0,
        },
        0.5,
    );
    let plan = out.finish(surface(), "t");
    assert_eq!(plan.texts().count(), 3);
    assert!(plan.commands.iter().all(|c| c.alpha() <= 0.5 + 1e-12));
    let DrawCommand::Fill {
        shape: Shape::Rect { rect, .. },
        ..
    } = &plan.commands[0]
    else {
        panic!("expected background fill first");
    };
    assert_eq!(rect.x0, 2.0);
    assert_eq!(rect.x1, 118.0);
}

#[test]
fn model_box_has_accent_border_and_name() {
    let pal = Palette::default();
    let mut out = FrameBuilder::new();
    model_box(&mut out, &pal, Rect::new(0.0, 0.0, 180.0, 140.0), "MIRO", 1.0);
    let plan = out.finish(surface(), "t");
    assert!(plan.commands.iter().any(|c| matches!(
        c,
        DrawCommand::Stroke { style, .. } if style.color == pal.accent && style.width == 2.0
    )));
    let name = plan.texts().next().unwrap();
    assert_eq!(name.text, "MIRO");
    assert_eq!(name.origin, Point::new(90.0, 70.0));
}
