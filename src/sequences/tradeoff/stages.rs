use crate::{
    foundation::{
        core::{Point, Rect, Rgba8, Vec2},
        error::ChoreoResult,
    },
    render::{
        plan::{FontStyle, FrameBuilder, Shape, StrokeStyle, TextAlign, TextBaseline, TextRun},
        widgets::{BarLayout, card, model_box, reward_bars},
    },
    sequences::{
        StageInput,
        tradeoff::{TradeoffAnchor as A, TradeoffConfig, TradeoffStage},
    },
};

const BARS: BarLayout = BarLayout {
    pad: 8.0,
    label_height: 24.0,
};
const OUTPUT_RADIUS: f64 = 6.0;
const ARROW_HEAD: Vec2 = Vec2::new(8.0, 8.0);
const PLACEHOLDER: Rgba8 = Rgba8::gray(230);

pub(super) struct Ctx<'a, 'b> {
    pub cfg: &'a TradeoffConfig,
    pub input: &'a StageInput<'b, TradeoffStage, A>,
    /// Reward weights of the current frame.
    pub rewards: &'a [f64],
    pub frame_key: String,
}

pub(super) fn scene(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    let pal = ctx.input.palette;
    let anchors = ctx.input.anchors;
    let text = &ctx.cfg.text;

    let prompt = anchors.point(A::Prompt)?;
    out.text(
        TextRun::new(&text.prompt_label, prompt, 9.0, pal.muted)
            .align(TextAlign::Center, TextBaseline::Top),
        1.0,
    );
    out.text(
        TextRun::new(&text.caption, prompt + Vec2::new(0.0, 15.0), 11.0, pal.fg)
            .align(TextAlign::Center, TextBaseline::Top)
            .style(FontStyle::Italic),
        1.0,
    );

    let model = anchors.rect(A::Model)?;
    model_box(out, pal, model, &text.model_name, 1.0);

    let vector = anchors.rect(A::Vector)?;
    card(out, pal, vector, false, 1.0);
    reward_bars(out, vector, ctx.rewards, &ctx.cfg.reward_colors, BARS, 1.0);
    out.place(
        "s_custom",
        Point::new(vector.center().x - 25.0, vector.y0 + 2.0),
        1.0,
    );

    let output = anchors.rect(A::Output)?;
    output_box(ctx, out, output);

    if !ctx.input.is_narrow() {
        arrows(out, vector, model, output, pal.muted, pal.accent);
    }
    Ok(())
}

fn output_box(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder, rect: Rect) {
    let pal = ctx.input.palette;
    if ctx.input.assets.image(&ctx.frame_key).is_some() {
        out.image(&ctx.frame_key, rect, 1.0, 0.0);
    } else {
        out.fill(Shape::rounded(rect, OUTPUT_RADIUS), PLACEHOLDER, 1.0);
    }
    out.stroke(
        Shape::rounded(rect, OUTPUT_RADIUS),
        StrokeStyle::solid(pal.accent, 2.0),
        1.0,
    );
    out.text(
        TextRun::new(
            &ctx.cfg.text.output_label,
            Point::new(rect.center().x, rect.y0 - 8.0),
            11.0,
            pal.muted,
        )
        .align(TextAlign::Center, TextBaseline::Bottom),
        1.0,
    );
}

fn arrows(out: &mut FrameBuilder, vector: Rect, model: Rect, output: Rect, muted: Rgba8, accent: Rgba8) {
    out.arrow(
        Point::new(vector.x1, vector.center().y),
        Point::new(model.x0 - 5.0, model.center().y),
        StrokeStyle::solid(muted, 2.0),
        ARROW_HEAD,
        0.6,
    );
    out.arrow(
        Point::new(model.x1 + 5.0, model.center().y),
        Point::new(output.x0 - 5.0, output.center().y),
        StrokeStyle::solid(accent, 2.0),
        ARROW_HEAD,
        0.8,
    );
}
