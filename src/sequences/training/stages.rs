use crate::{
    foundation::{
        core::{Palette, Point, Rect, Rgba8},
        error::ChoreoResult,
        math::{clamp01, lerp, lerp_point, lerp_rect, rect_xywh},
    },
    render::{
        plan::{FrameBuilder, Shape, StrokeStyle, TextAlign, TextBaseline, TextRun},
        widgets::{BarLayout, CaptionBox, caption_box, card, card_title, model_box, reward_bars},
    },
    sequences::{
        StageInput,
        training::{TrainingAnchor as A, TrainingConfig, TrainingStage},
    },
};

const BARS: BarLayout = BarLayout {
    pad: 8.0,
    label_height: 16.0,
};
const TITLE_TOP: f64 = 6.0;
/// Offset of the row end where a mini input collapses into its dot.
const ROW_END_INSET: f64 = 16.0;

pub(super) struct Ctx<'a, 'b> {
    pub cfg: &'a TrainingConfig,
    pub input: &'a StageInput<'b, TrainingStage, A>,
    pub scores: Vec<f64>,
}

impl Ctx<'_, '_> {
    fn rect(&self, key: A) -> ChoreoResult<Rect> {
        self.input.anchors.rect(key)
    }

    fn pal(&self) -> &Palette {
        self.input.palette
    }

    fn narrow(&self) -> bool {
        self.input.is_narrow()
    }

    fn rows(&self) -> ChoreoResult<Vec<Rect>> {
        (0..self.cfg.reward_count)
            .map(|i| self.rect(A::RewardRow(i)))
            .collect()
    }

    fn image(&self, out: &mut FrameBuilder, rect: Rect, alpha: f64, noise: f64) {
        out.image(&self.cfg.image, rect, alpha, noise);
    }

    /// Caption box whose padding and type scale with the box, so it can
    /// shrink along with the image it belongs to.
    fn caption(&self, out: &mut FrameBuilder, rect: Rect, alpha: f64) {
        caption_box(
            out,
            self.pal(),
            &CaptionBox {
                rect,
                text: &self.cfg.text.caption,
                padding: 8.0 * rect.width() / 100.0,
                radius: 6.0,
                text_scale: rect.height() / 40.0,
            },
            alpha,
        );
    }

    fn titled_card(&self, out: &mut FrameBuilder, rect: Rect, title: &str, alpha: f64) {
        card(out, self.pal(), rect, false, alpha);
        card_title(out, self.pal(), rect, title, TITLE_TOP, alpha);
    }

    fn model(&self, out: &mut FrameBuilder, alpha: f64) -> ChoreoResult<Rect> {
        let model = self.rect(A::Model)?;
        model_box(out, self.pal(), model, &self.cfg.text.model_name, alpha);
        Ok(model)
    }

    fn score_vector(&self, out: &mut FrameBuilder, rect: Rect, values: &[f64], alpha: f64) {
        self.titled_card(out, rect, &self.cfg.text.scores_label, alpha);
        reward_bars(out, rect, values, &self.cfg.reward_colors, BARS, alpha);
    }

    fn reward_panel(&self, out: &mut FrameBuilder, alpha: f64) -> ChoreoResult<()> {
        let rewards = self.rect(A::Rewards)?;
        let narrow = self.narrow();
        let fg = self.pal().fg;
        let rows = self.rows()?;
        out.with_alpha(alpha, |out| {
            self.titled_card(out, rewards, &self.cfg.text.rewards_label, 1.0);
            for (i, r) in rows.iter().enumerate() {
                out.fill(Shape::rounded(*r, 6.0), Rgba8::WHITE.with_alpha(8), 1.0);
                out.stroke(
                    Shape::rounded(r.inset(-0.5), 6.0),
                    StrokeStyle::solid(Rgba8::WHITE.with_alpha(26), 1.0),
                    1.0,
                );
                let label = format!("r{}", subscript(i + 1));
                let run = if narrow {
                    TextRun::new(label, Point::new(r.center().x, r.y0 + 4.0), 10.0, fg)
                        .align(TextAlign::Center, TextBaseline::Top)
                } else {
                    TextRun::new(label, Point::new(r.x0 + 8.0, r.center().y), 12.0, fg)
                        .align(TextAlign::Left, TextBaseline::Middle)
                };
                out.text(run, 1.0);
            }
        });
        Ok(())
    }

    /// Resting rect of the copy of the input shown in reward row `row`.
    fn mini(&self, row: Rect) -> Rect {
        let m = &self.cfg.motion;
        if self.narrow() {
            let w = (row.width() * m.mini_scale).min(m.mini_max_narrow);
            let h = w * self.cfg.narrow.aspect;
            rect_xywh(row.center().x - w / 2.0, row.y0 + m.mini_top, w, h)
        } else {
            let h = (row.height() * m.mini_scale).min(m.mini_max_wide);
            let w = h / self.cfg.wide.aspect;
            rect_xywh(row.x0 + m.mini_padding, row.center().y - h / 2.0, w, h)
        }
    }

    fn row_end(&self, row: Rect) -> Point {
        if self.narrow() {
            Point::new(row.center().x, row.y1 - ROW_END_INSET)
        } else {
            Point::new(row.x1 - ROW_END_INSET, row.center().y)
        }
    }

    /// Where the numeric score of `row` is printed, beside the panel.
    fn value_pos(&self, row: Rect, rewards: Rect) -> Point {
        if self.narrow() {
            Point::new(row.center().x, rewards.y1 + 18.0)
        } else {
            Point::new(rewards.x1 + 20.0, row.center().y)
        }
    }

    fn value_text(&self, out: &mut FrameBuilder, value: f64, at: Point, alpha: f64) {
        let size = if self.narrow() { 10.0 } else { 12.0 };
        out.text(
            TextRun::new(format!("{value:.2}"), at, size, Rgba8::WHITE.with_alpha(242)),
            alpha,
        );
    }

    fn row_progress(&self, p: f64, i: usize) -> f64 {
        let delay = i as f64 * self.cfg.motion.row_delay;
        clamp01((p - delay) / (1.0 - delay))
    }

    /// Image rect while parked inside the reward panel, and the smaller rect
    /// it shrinks to once the rows have their own copies.
    fn parked(&self) -> ChoreoResult<(Rect, Rect)> {
        let img = self.rect(A::Image)?;
        let rewards = self.rect(A::Rewards)?;
        let m = &self.cfg.motion;
        let (w, h) = (img.width() * m.img_in_rewards, img.height() * m.img_in_rewards);
        let slot = rect_xywh(rewards.center().x - w / 2.0, rewards.y0 + 28.0, w, h);
        let small = Rect::from_center_size(
            slot.center(),
            (w * m.img_small_in_rewards, h * m.img_small_in_rewards),
        );
        Ok((slot, small))
    }

    fn dot(&self, out: &mut FrameBuilder, i: usize, center: Point, diameter: f64, alpha: f64) {
        out.fill(Shape::circle(center, diameter), self.cfg.reward_color(i), alpha);
    }
}

/// `n` written with Unicode subscript digits.
fn subscript(n: usize) -> String {
    n.to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .filter_map(|d| char::from_u32(0x2080 + d))
        .collect()
}

fn scaled(r: Rect, origin: Point, s: f64) -> Rect {
    rect_xywh(origin.x, origin.y, r.width() * s, r.height() * s)
}

pub(super) fn intro(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    ctx.image(out, ctx.rect(A::Image)?, 1.0, 0.0);
    ctx.caption(out, ctx.rect(A::Caption)?, 1.0);
    Ok(())
}

pub(super) fn move_to_rewards(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    let p = ctx.input.progress;
    let img = ctx.rect(A::Image)?;
    let cap = ctx.rect(A::Caption)?;
    let (slot, _) = ctx.parked()?;
    let s = ctx.cfg.motion.img_in_rewards;
    let fade = 1.0 - 0.5 * p;

    ctx.image(out, lerp_rect(img, slot, p), fade, 0.0);
    let cap_dst = scaled(cap, Point::new(slot.x0, slot.y1 + 6.0), s);
    ctx.caption(out, lerp_rect(cap, cap_dst, p), fade);

    ctx.reward_panel(out, 1.0)?;

    let rewards = ctx.rect(A::Rewards)?;
    for (i, row) in ctx.rows()?.into_iter().enumerate() {
        let local = ctx.row_progress(p, i);
        let mini = ctx.mini(row);
        let start = if ctx.narrow() {
            Point::new(mini.x0, rewards.y0 - mini.height() - 12.0)
        } else {
            Point::new(rewards.x0 - mini.width() - 12.0, mini.y0)
        };
        let o = lerp_point(start, mini.origin(), local);
        ctx.image(out, rect_xywh(o.x, o.y, mini.width(), mini.height()), local, 0.0);
    }
    Ok(())
}

pub(super) fn fanout_inputs(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    let (_, small) = ctx.parked()?;
    ctx.image(out, small, 1.0, 0.0);
    ctx.reward_panel(out, 1.0)?;
    for row in ctx.rows()? {
        ctx.image(out, ctx.mini(row), 1.0, 0.0);
    }
    Ok(())
}

pub(super) fn emit_scores(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    let p = ctx.input.progress;
    let m = &ctx.cfg.motion;
    let (_, small) = ctx.parked()?;
    let rewards = ctx.rect(A::Rewards)?;
    let left = ctx.rect(A::LeftVector)?;
    let rows = ctx.rows()?;

    ctx.image(out, small, 0.6, 0.0);
    ctx.reward_panel(out, 1.0)?;

    // Row copies shrink toward the row end while a dot grows in their place.
    for (i, row) in rows.iter().enumerate() {
        let morph = clamp01(ctx.row_progress(p, i) / m.morph_end);
        let mini = ctx.mini(*row);
        let c = lerp_point(mini.center(), ctx.row_end(*row), morph);
        let s = lerp(1.0, m.dot_min_scale, morph);
        ctx.image(
            out,
            Rect::from_center_size(c, (mini.width() * s, mini.height() * s)),
            1.0,
            0.0,
        );
        if morph > 0.01 {
            ctx.dot(out, i, c, lerp(0.0, m.dot_diameter, morph).max(1.0), morph);
        }
    }

    // The empty score vector travels out of the panel to its resting slot.
    let start = Point::new(
        rewards.center().x - left.width() / 2.0,
        rewards.center().y - left.height() / 2.0,
    );
    let o = lerp_point(start, left.origin(), p);
    let empty = vec![0.0; ctx.cfg.reward_count];
    ctx.score_vector(out, rect_xywh(o.x, o.y, left.width(), left.height()), &empty, p);

    let (legend_at, legend_align) = if ctx.narrow() {
        (Point::new(rewards.center().x, rewards.y1 + 8.0), TextAlign::Center)
    } else {
        (Point::new(rewards.x1 + 18.0, rewards.y0 - 6.0), TextAlign::Left)
    };
    let legend = TextRun::new(
        ctx.cfg.text.scores_vector.as_str(),
        legend_at,
        11.0,
        Rgba8::WHITE.with_alpha(178),
    )
    .align(legend_align, TextBaseline::Bottom);
    out.text(legend, 1.0);

    for (i, row) in rows.iter().enumerate() {
        let appear = clamp01((ctx.row_progress(p, i) - m.vec_start) / (1.0 - m.vec_start));
        if appear <= 0.0 {
            continue;
        }
        let target = ctx.value_pos(*row, rewards);
        let c = lerp_point(ctx.row_end(*row), Point::new(target.x - 10.0, target.y), appear);
        ctx.dot(out, i, c, m.dot_diameter, 1.0 - appear);
        ctx.value_text(out, ctx.scores[i], target, appear);
    }
    Ok(())
}

pub(super) fn rewards_disappear(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    let p = ctx.input.progress;
    let rewards = ctx.rect(A::Rewards)?;
    let left = ctx.rect(A::LeftVector)?;

    ctx.reward_panel(out, 1.0 - p)?;

    let filling: Vec<f64> = ctx.scores.iter().map(|v| v * p).collect();
    ctx.titled_card(out, left, &ctx.cfg.text.scores_label, 1.0);
    reward_bars(out, left, &filling, &ctx.cfg.reward_colors, BARS, 1.0);

    let n = ctx.cfg.reward_count;
    for (i, row) in ctx.rows()?.into_iter().enumerate() {
        let from = ctx.value_pos(row, rewards);
        let slot = BARS.slot(left, n, i);
        let to = Point::new(slot.center().x, slot.y1 - 6.0);
        ctx.dot(out, i, lerp_point(from, to, p), ctx.cfg.motion.dot_diameter, 1.0);
        ctx.value_text(out, ctx.scores[i], from, 1.0 - p);
    }
    Ok(())
}

pub(super) fn scores_back(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    let alpha = (ctx.input.progress * 1.2).min(1.0);
    ctx.image(out, ctx.rect(A::Image)?, alpha, 0.0);
    ctx.caption(out, ctx.rect(A::Caption)?, alpha);
    ctx.score_vector(out, ctx.rect(A::LeftVector)?, &ctx.scores, 1.0);
    Ok(())
}

/// Input, caption and filled score vector at rest; the input carries `noise`.
fn conditioned_input(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder, noise: f64) -> ChoreoResult<()> {
    ctx.image(out, ctx.rect(A::Image)?, 1.0, noise);
    ctx.caption(out, ctx.rect(A::Caption)?, 1.0);
    ctx.score_vector(out, ctx.rect(A::LeftVector)?, &ctx.scores, 1.0);
    Ok(())
}

pub(super) fn noise_input(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    conditioned_input(ctx, out, ctx.input.progress)
}

pub(super) fn denoiser_appear(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    conditioned_input(ctx, out, 1.0)?;
    ctx.model(out, ctx.input.progress)?;
    Ok(())
}

pub(super) fn to_denoiser(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    let p = ctx.input.progress;
    let img = ctx.rect(A::Image)?;
    let cap = ctx.rect(A::Caption)?;
    let left = ctx.rect(A::LeftVector)?;
    let model = ctx.rect(A::Model)?;
    let s = ctx.cfg.motion.img_in_model;
    let fade = 1.0 - p;

    let img_dst = scaled(
        img,
        Point::new(model.center().x - img.width() * s / 2.0, model.y0 + 30.0),
        s,
    );
    ctx.image(out, lerp_rect(img, img_dst, p), fade, 1.0);
    let cap_dst = scaled(cap, Point::new(img_dst.x0, img_dst.y1 + 6.0), s);
    ctx.caption(out, lerp_rect(cap, cap_dst, p), fade);

    let vec_dst = Rect::from_center_size(model.center(), left.size());
    ctx.score_vector(out, lerp_rect(left, vec_dst, p), &ctx.scores, fade);

    ctx.model(out, 1.0)?;
    Ok(())
}

pub(super) fn clean_output(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    let p = ctx.input.progress;
    let model = ctx.model(out, 1.0)?;
    let output = ctx.rect(A::Output)?;
    let start = Rect::from_center_size(model.center(), output.size());
    ctx.image(out, lerp_rect(start, output, p), p, 0.0);
    Ok(())
}

pub(super) fn pause(ctx: &Ctx<'_, '_>, out: &mut FrameBuilder) -> ChoreoResult<()> {
    ctx.model(out, 1.0)?;
    let output = ctx.rect(A::Output)?;
    ctx.image(out, output, 1.0, 0.0);
    let gap = if ctx.narrow() { 18.0 } else { 22.0 };
    out.text(
        TextRun::new(
            ctx.cfg.text.denoised_image.as_str(),
            Point::new(output.center().x, output.y0 - gap),
            11.0,
            ctx.pal().muted,
        )
        .align(TextAlign::Center, TextBaseline::Top),
        1.0,
    );
    Ok(())
}
