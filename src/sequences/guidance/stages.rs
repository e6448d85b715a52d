use crate::{
    foundation::{
        core::{Palette, Point, Rect, Rgba8, Vec2},
        error::ChoreoResult,
        math::{lerp, lerp_point, lerp_rect, rect_xywh},
    },
    render::{
        plan::{
            FontStyle, FrameBuilder, GradientStop, Paint, Shape, StrokeStyle, TextRun,
        },
        widgets::{BarLayout, CaptionBox, caption_box, card, model_box, reward_bars},
    },
    sequences::{
        StageInput,
        guidance::{GuidanceAnchor as A, GuidanceConfig, GuidanceStage},
    },
};

const BARS: BarLayout = BarLayout {
    pad: 6.0,
    label_height: 20.0,
};
const HIGHLIGHT_PAD: f64 = 12.0;
const HIGHLIGHT_ALPHA: f64 = 0.15;
const ARROW_HEAD: Vec2 = Vec2::new(10.0, 10.0);
const GOLD: Rgba8 = Rgba8::rgb(255, 215, 0);

pub(super) struct Ctx<'a, 'b> {
    pub cfg: &'a GuidanceConfig,
    pub input: &'a StageInput<'b, GuidanceStage, A>,
}

impl Ctx<'_, '_> {
    fn rect(&self, key: A) -> ChoreoResult<Rect> {
        self.input.anchors.rect(key)
    }

    fn pal(&self) -> &Palette {
        self.input.palette
    }

    fn score_vector(&self, out: &mut FrameBuilder, rect: Rect, value: f64, alpha: f64) {
        let pal = self.pal();
        card(out, pal, rect, false, alpha);
        let values = vec![value; self.cfg.reward_count];
        reward_bars(out, rect, &values, &pal.reward_colors(), BARS, alpha);
    }

    fn caption(&self, out: &mut FrameBuilder, rect: Rect, alpha: f64) {
        caption_box(
            out,
            self.pal(),
            &CaptionBox {
                rect,
                text: &self.cfg.text.caption,
                padding: 8.0,
                radius: 6.0,
                text_scale: 1.0,
            },
            alpha,
        );
    }

    fn model(&self, out: &mut FrameBuilder) -> ChoreoResult<Rect> {
        let model = self.rect(A::Model)?;
        model_box(out, self.pal(), model, &self.cfg.text.model_name, 1.0);
        Ok(model)
    }

    /// Velocity image with its colored backdrop and formula label.
    fn velocity(
        &self,
        out: &mut FrameBuilder,
        label: &'static str,
        asset: &str,
        rect: Rect,
        tint: Rgba8,
        alpha: f64,
    ) {
        out.place(label, out_label_pos(rect), alpha);
        out.glow(
            Shape::rounded(
                Rect::new(rect.x0 - 5.0, rect.y0 - 45.0, rect.x1 + 5.0, rect.y1 + 5.0),
                8.0,
            ),
            tint,
            alpha * 0.3,
            20.0,
        );
        out.image(asset, rect, alpha, 0.0);
    }
}

fn s_label_pos(r: Rect) -> Point {
    Point::new(r.center().x - 15.0, r.y0 - 15.0)
}

fn out_label_pos(r: Rect) -> Point {
    Point::new(r.center().x - 50.0, r.y0 - 40.0)
}

/// `r` moved so that at `t = 1` it is centered on `center`.
fn converge(r: Rect, center: Point, t: f64) -> Rect {
    lerp_rect(r, Rect::from_center_size(center, r.size()), t)
}

/// Rect of `size` whose top-left travels from `from` to `to`.
fn travel(from: Point, to: Point, size: Rect, t: f64) -> Rect {
    let o = lerp_point(from, to, t);
    rect_xywh(o.x, o.y, size.width(), size.height())
}

fn processing_rings(out: &mut FrameBuilder, pal: &Palette, center: Point, p: f64) {
    let local = if p < 0.5 { p * 2.0 } else { (p - 0.5) * 2.0 };
    let r = lerp(10.0, 25.0, local);
    out.stroke(
        Shape::circle(center, r * 2.0),
        StrokeStyle::solid(pal.accent, 1.5),
        1.0 - local,
    );
}

#[derive(Clone, Copy)]
enum Operator {
    Minus,
    Plus,
}

fn operator_sign(out: &mut FrameBuilder, pal: &Palette, at: Point, op: Operator, alpha: f64) {
    let (diameter, bg, glyph, size, dy) = match op {
        Operator::Minus => (40.0, pal.muted, "-", 32.0, -2.0),
        Operator::Plus => (35.0, pal.green, "+", 24.0, 0.0),
    };
    out.fill(Shape::circle(at, diameter), bg, alpha * 0.4);
    out.text(
        TextRun::new(glyph, Point::new(at.x, at.y + dy), size, pal.fg).style(FontStyle::Bold),
        alpha,
    );
}

fn omega(out: &mut FrameBuilder, pal: &Palette, at: Point, alpha: f64) {
    out.fill(
        Shape::rounded(Rect::from_center_size(at, (36.0, 20.0)), 10.0),
        pal.accent,
        alpha * 0.35,
    );
    out.text(
        TextRun::new("\u{3c9}", at, 15.0, pal.fg).style(FontStyle::Italic),
        alpha,
    );
}

fn guidance_vector(out: &mut FrameBuilder, pal: &Palette, r: Rect, alpha: f64) {
    out.glow(
        Shape::rounded(Rect::new(r.x0 - 30.0, r.y0 - 45.0, r.x1 + 30.0, r.y1 + 5.0), 10.0),
        pal.accent,
        alpha * 0.3,
        25.0,
    );
    out.fill(
        Shape::rounded(r, 8.0),
        Paint::Linear {
            start: Point::new(r.x0, r.y0),
            end: Point::new(r.x0, r.y1),
            stops: vec![
                GradientStop::new(0.0, pal.green),
                GradientStop::new(0.5, pal.accent),
                GradientStop::new(1.0, pal.blue),
            ],
        },
        alpha,
    );
    out.fill(
        Shape::rounded(rect_xywh(r.x0, r.y0, r.width(), r.height() * 0.3), 8.0),
        Paint::Linear {
            start: Point::new(r.x0, r.y0),
            end: Point::new(r.x1, r.y0),
            stops: vec![
                GradientStop::new(0.0, Rgba8::WHITE.with_alpha(0)),
                GradientStop::new(0.5, Rgba8::WHITE.with_alpha(204)),
                GradientStop::new(1.0, Rgba8::WHITE.with_alpha(0)),
            ],
        },
        alpha * 0.2,
    );
    out.stroke(Shape::rounded(r, 8.0), StrokeStyle::solid(pal.fg, 1.5), alpha);
    out.text(TextRun::new("\u{394}v", r.center(), 10.0, pal.accent), alpha * 0.7);
}

pub(super) fn inputs(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    let cfg = ctx.cfg;
    let s = ctx.rect(A::SPlus)?;
    out.image(&cfg.images.input, ctx.rect(A::Input)?, 1.0, cfg.input_noise);
    ctx.caption(out, ctx.rect(A::Caption)?, 1.0);
    ctx.score_vector(out, s, cfg.s_plus_value, 1.0);
    out.place("s_plus", s_label_pos(s), 1.0);
    Ok(())
}

/// One model pass: inputs converge on the model, it processes, and the
/// output image emerges toward `out_key`.
struct Branch<'a> {
    score: A,
    score_value: f64,
    score_label: &'static str,
    out_key: A,
    out_label: &'static str,
    out_asset: &'a str,
}

fn converge_inputs(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder, b: &Branch<'_>) -> ChoreoResult<()> {
    let p = ctx.input.progress;
    let target = ctx.rect(A::Model)?.center();
    let s = converge(ctx.rect(b.score)?, target, p);
    let img = converge(ctx.rect(A::Input)?, target, p);
    let cap = converge(ctx.rect(A::Caption)?, target, p);

    ctx.score_vector(out, s, b.score_value, 1.0);
    out.place(b.score_label, s_label_pos(s), 1.0 - p);
    out.image(&ctx.cfg.images.input, img, 1.0, ctx.cfg.input_noise);
    ctx.caption(out, cap, 1.0 - p);
    ctx.model(out)?;
    Ok(())
}

fn emerge_output(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder, b: &Branch<'_>) -> ChoreoResult<()> {
    let p = ctx.input.progress;
    let model = ctx.model(out)?;
    let dest = ctx.rect(b.out_key)?;
    let cur = travel(model.center(), dest.origin(), dest, p);
    out.place(b.out_label, out_label_pos(cur), p);
    out.image(b.out_asset, cur, p, 0.0);
    Ok(())
}

pub(super) fn high_branch(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    let cfg = ctx.cfg;
    let branch = Branch {
        score: A::SPlus,
        score_value: cfg.s_plus_value,
        score_label: "s_plus",
        out_key: A::HighOut,
        out_label: "high_reward_out",
        out_asset: &cfg.images.high,
    };
    match ctx.input.stage {
        GuidanceStage::SPlusToModel => converge_inputs(ctx, out, &branch)?,
        GuidanceStage::ProcessSPlus => {
            let model = ctx.model(out)?;
            processing_rings(out, ctx.pal(), model.center(), ctx.input.progress);
        }
        GuidanceStage::HighOutput => {
            emerge_output(ctx, out, &branch)?;
            // The low-score inputs fade back in for the second pass.
            let p = ctx.input.progress;
            let s = ctx.rect(A::SMinus)?;
            ctx.score_vector(out, s, cfg.s_minus_value, p);
            out.place("s_minus", s_label_pos(s), p);
            out.image(&cfg.images.input, ctx.rect(A::Input)?, p, cfg.input_noise);
            ctx.caption(out, ctx.rect(A::Caption)?, p);
        }
        _ => {}
    }
    Ok(())
}

pub(super) fn low_branch(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    let cfg = ctx.cfg;
    let high = ctx.rect(A::HighOut)?;
    out.place("high_reward_out", out_label_pos(high), 1.0);
    out.image(&cfg.images.high, high, 1.0, 0.0);

    let branch = Branch {
        score: A::SMinus,
        score_value: cfg.s_minus_value,
        score_label: "s_minus",
        out_key: A::LowOut,
        out_label: "low_reward_out",
        out_asset: &cfg.images.low,
    };
    match ctx.input.stage {
        GuidanceStage::SMinusToModel => converge_inputs(ctx, out, &branch)?,
        GuidanceStage::ProcessSMinus => {
            let model = ctx.model(out)?;
            processing_rings(out, ctx.pal(), model.center(), ctx.input.progress);
        }
        GuidanceStage::LowOutput => emerge_output(ctx, out, &branch)?,
        _ => {}
    }
    Ok(())
}

pub(super) fn subtraction(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    let cfg = ctx.cfg;
    let win = &cfg.windows;
    let pal = ctx.pal();
    let p = ctx.input.progress;
    let narrow = ctx.input.is_narrow();
    let vec_rect = ctx.rect(A::SubtractVector)?;
    let sub_minus = ctx.rect(A::SubtractMinus)?;

    let (v_plus, v_minus, minus_a, vec_a, arrow_a) = if ctx.input.stage == GuidanceStage::Regroup {
        let t = win.regroup_move.progress(p);
        (
            lerp_rect(ctx.rect(A::HighOut)?, ctx.rect(A::RegroupPlus)?, t),
            lerp_rect(ctx.rect(A::LowOut)?, ctx.rect(A::RegroupMinus)?, t),
            0.0,
            0.0,
            0.0,
        )
    } else {
        let t = win.subtract_move.progress(p);
        let v_plus = lerp_rect(ctx.rect(A::RegroupPlus)?, ctx.rect(A::SubtractPlus)?, t);
        let v_minus = lerp_rect(ctx.rect(A::RegroupMinus)?, sub_minus, t);
        let vec_a = win.subtract_vector.progress(p);

        if p > win.subtract_highlight.start {
            let x0 = v_plus.x0 - HIGHLIGHT_PAD;
            let y0 = v_plus.y0 - 45.0;
            let bg = if narrow {
                let bottom = if vec_a > 0.0 { vec_rect.y1 } else { v_minus.y1 };
                Rect::new(x0, y0, v_plus.x1 + HIGHLIGHT_PAD, bottom + HIGHLIGHT_PAD)
            } else {
                let right = if vec_a > 0.0 { vec_rect.x1 + 30.0 } else { v_minus.x1 };
                Rect::new(x0, y0, right + HIGHLIGHT_PAD, v_plus.y1 + HIGHLIGHT_PAD)
            };
            out.fill(
                Shape::rounded(bg, 12.0),
                pal.accent,
                win.subtract_highlight.progress(p) * HIGHLIGHT_ALPHA,
            );
        }
        (
            v_plus,
            v_minus,
            win.subtract_minus.progress(p),
            vec_a,
            win.subtract_arrow.progress(p),
        )
    };

    ctx.velocity(out, "high_reward_out", &cfg.images.high, v_plus, pal.green, 1.0);
    ctx.velocity(out, "low_reward_out", &cfg.images.low, v_minus, pal.red, 1.0);

    if minus_a > 0.01 {
        let at = if narrow {
            Point::new(v_plus.center().x, (v_plus.center().y + v_minus.y0) / 2.0 + 1.0)
        } else {
            Point::new((v_plus.x1 + v_minus.x0) / 2.0, v_plus.center().y)
        };
        operator_sign(out, pal, at, Operator::Minus, minus_a);
    }

    if vec_a > 0.01 {
        guidance_vector(out, pal, vec_rect, vec_a);
        out.place(
            "guidance_vec",
            Point::new(vec_rect.center().x - 60.0, vec_rect.y0 - 40.0),
            vec_a,
        );
    }

    if arrow_a > 0.01 {
        let style = StrokeStyle::solid(pal.accent, 2.5).dashed(8.0, 6.0);
        let sub_plus = ctx.rect(A::SubtractPlus)?;
        let (from, to) = if narrow {
            let x = sub_plus.center().x;
            (Point::new(x, sub_minus.y1 + 10.0), Point::new(x, vec_rect.y0 - 45.0))
        } else {
            let y = sub_plus.center().y;
            (
                Point::new(sub_minus.x1 + 10.0, y),
                Point::new(vec_rect.x0 - vec_rect.width() / 2.0 - 10.0, y),
            )
        };
        out.arrow(from, to, style, ARROW_HEAD, arrow_a);
    }
    Ok(())
}

pub(super) fn guidance(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    let cfg = ctx.cfg;
    let win = &cfg.windows;
    let pal = ctx.pal();
    let p = ctx.input.progress;
    let narrow = ctx.input.is_narrow();
    let surface = ctx.input.surface();

    let apply_plus = ctx.rect(A::ApplyPlus)?;
    let apply_vec = ctx.rect(A::ApplyVector)?;
    let apply_out = ctx.rect(A::ApplyOutput)?;
    let final_out = ctx.rect(A::FinalOutput)?;

    // (v+, v+ alpha, guidance vector, its alpha, plus alpha, arrow alpha,
    //  output, output alpha, output noise)
    let (v_plus, plus_a, vec_r, vec_a, op_a, arrow_a, output, out_a, out_noise) =
        match ctx.input.stage {
            GuidanceStage::ApplyGuidance => {
                let t = win.apply_move.progress(p);
                let v_plus = lerp_rect(ctx.rect(A::SubtractPlus)?, apply_plus, t);
                let vec_r = lerp_rect(ctx.rect(A::SubtractVector)?, apply_vec, t);
                let fin = win.apply_output.progress(p);

                if p > win.apply_highlight.start {
                    let x0 = v_plus.x0 - HIGHLIGHT_PAD;
                    let y0 = v_plus.y0 - 45.0;
                    let bg = if narrow {
                        let bottom = if fin > 0.0 { apply_out.y1 } else { vec_r.y1 };
                        Rect::new(x0, y0, v_plus.x1 + HIGHLIGHT_PAD, bottom + HIGHLIGHT_PAD)
                    } else {
                        let right = if fin > 0.0 { apply_out.x1 } else { vec_r.x1 + 60.0 };
                        Rect::new(x0, y0, right + HIGHLIGHT_PAD, v_plus.y1 + HIGHLIGHT_PAD)
                    };
                    out.fill(
                        Shape::rounded(bg, 12.0),
                        pal.green,
                        win.apply_highlight.progress(p) * HIGHLIGHT_ALPHA,
                    );
                }
                (
                    v_plus,
                    1.0,
                    vec_r,
                    1.0,
                    win.apply_plus.progress(p),
                    win.apply_arrow.progress(p),
                    apply_out,
                    fin,
                    lerp(0.2, 0.0, fin),
                )
            }
            GuidanceStage::Final => {
                let fade = 1.0 - win.final_fade.progress(p);
                (
                    apply_plus,
                    fade,
                    apply_vec,
                    fade,
                    fade,
                    0.0,
                    lerp_rect(apply_out, final_out, p),
                    1.0,
                    0.0,
                )
            }
            _ => (
                apply_plus, 0.0, apply_vec, 0.0, 0.0, 0.0, final_out, 1.0, 0.0,
            ),
        };

    if plus_a > 0.01 {
        ctx.velocity(out, "high_reward_out", &cfg.images.high, v_plus, pal.green, plus_a);
    }

    if op_a > 0.01 {
        let center = if narrow {
            Point::new(v_plus.center().x, (v_plus.center().y + vec_r.y0) / 2.0)
        } else {
            Point::new(v_plus.x1 + (apply_vec.x0 - v_plus.x1) * 0.3, v_plus.center().y)
        };
        operator_sign(out, pal, Point::new(center.x - 30.0, center.y), Operator::Plus, op_a);
        omega(out, pal, Point::new(center.x + 30.0, center.y), op_a);
    }

    if vec_a > 0.01 {
        guidance_vector(out, pal, vec_r, vec_a);
        if ctx.input.stage == GuidanceStage::ApplyGuidance {
            out.place(
                "guidance_vec",
                Point::new(vec_r.center().x - 60.0, vec_r.y0 - 40.0),
                vec_a,
            );
        }
    }

    if arrow_a > 0.01 {
        let (from, to) = if narrow {
            let x = apply_plus.center().x;
            (Point::new(x, apply_vec.y1 + 10.0), Point::new(x, apply_out.y0 - 40.0))
        } else {
            let y = apply_plus.center().y;
            (Point::new(apply_vec.x1 + 10.0, y), Point::new(apply_out.x0 - 10.0, y))
        };
        out.stroke(
            Shape::Line { from, to },
            StrokeStyle::solid(pal.green, 9.0),
            arrow_a * 0.2,
        );
        out.arrow(from, to, StrokeStyle::solid(pal.green, 3.0), ARROW_HEAD, arrow_a);
    }

    if out_a > 0.01 {
        final_output(ctx, out, output, out_a, out_noise)?;
    }

    if ctx.input.stage == GuidanceStage::ApplyGuidance && p > win.apply_formula.start {
        let y = if narrow {
            apply_out.y1 + 30.0
        } else {
            apply_plus.y1 + 28.0
        };
        formula(out, pal, surface.width, narrow, y, win.apply_formula.progress(p));
    }
    Ok(())
}

fn final_output(
    ctx: &Ctx<'_, '_>,
    out: &mut FrameBuilder,
    r: Rect,
    alpha: f64,
    noise: f64,
) -> ChoreoResult<()> {
    let cfg = ctx.cfg;
    let pal = ctx.pal();
    let p = ctx.input.progress;
    let narrow = ctx.input.is_narrow();
    let (w, h) = (r.width(), r.height());
    let glow_center = Point::new(r.center().x, r.center().y);

    out.fill(
        Shape::Ellipse {
            center: Point::new(glow_center.x, glow_center.y + 15.0),
            radii: Vec2::new(w * 0.9, h * 1.2),
        },
        Paint::Radial {
            center: glow_center,
            r0: w * 0.4,
            r1: w * 1.2,
            stops: vec![
                GradientStop::new(0.0, GOLD.with_alpha(128)),
                GradientStop::new(1.0, GOLD.with_alpha(0)),
            ],
        },
        alpha * 0.3,
    );
    out.stroke(
        Shape::rounded(r.inflate(4.0, 4.0), 8.0),
        StrokeStyle::solid(pal.green, 2.0),
        alpha,
    );
    out.image(&cfg.images.final_output, r, alpha, noise);

    match ctx.input.stage {
        GuidanceStage::ApplyGuidance if alpha > 0.5 => {
            let label = (alpha - 0.5) / 0.5;
            out.fill(
                Shape::rounded(rect_xywh(r.x0, r.y0 - 35.0, w, 28.0), 6.0),
                pal.accent,
                label * 0.5,
            );
            out.text(
                TextRun::new(
                    cfg.text.guided_output.as_str(),
                    Point::new(r.center().x, r.y0 - 21.0),
                    11.0,
                    pal.fg,
                )
                .style(FontStyle::Bold),
                label,
            );
        }
        GuidanceStage::Final | GuidanceStage::Hold => {
            let label = if ctx.input.stage == GuidanceStage::Final {
                cfg.windows.final_label.progress(p)
            } else {
                1.0
            };
            let title = TextRun::new(
                cfg.text.final_title.as_str(),
                Point::new(r.center().x, r.y0 - 24.0),
                14.0,
                pal.fg,
            )
            .style(FontStyle::Bold);
            let tw = title.approx_width();
            out.fill(
                Shape::rounded(
                    rect_xywh(r.center().x - tw / 2.0 - 8.0, r.y0 - 40.0, tw + 16.0, 32.0),
                    8.0,
                ),
                pal.green,
                label * 0.5,
            );
            out.text(title, label);

            let y = if narrow {
                r.y1 + 30.0
            } else {
                ctx.rect(A::FinalOutput)?.y1 + 28.0
            };
            formula(out, pal, ctx.input.surface().width, narrow, y, label);
        }
        _ => {}
    }
    Ok(())
}

fn formula(out: &mut FrameBuilder, pal: &Palette, width: f64, narrow: bool, y: f64, alpha: f64) {
    let fw = if narrow { width - 40.0 } else { 310.0 };
    out.fill(
        Shape::rounded(rect_xywh(width / 2.0 - fw / 2.0, y, fw, 35.0), 8.0),
        pal.green,
        alpha * 0.3,
    );
    out.place("guidance_formula", Point::new(width / 2.0 - 110.0, y - 2.0), alpha);
}
