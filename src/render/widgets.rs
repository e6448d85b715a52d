//! Composite pieces shared by several sequences: caption boxes, cards,
//! reward bars and the phase banner.

use crate::{
    foundation::core::{Breakpoint, Palette, Point, Rect, Rgba8, Surface},
    foundation::math::clamp01,
    render::plan::{FontStyle, FrameBuilder, Shape, StrokeStyle, TextAlign, TextBaseline, TextRun},
};

const CARD_RADIUS: f64 = 10.0;
const BAR_RADIUS: f64 = 3.0;

/// Quoted caption box; `rect` is the text column, the box extends `padding`
/// to either side.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CaptionBox<'a> {
    pub rect: Rect,
    pub text: &'a str,
    pub padding: f64,
    pub radius: f64,
    /// Multiplier for font sizes and line spacing.
    pub text_scale: f64,
}

pub(crate) fn caption_box(out: &mut FrameBuilder, pal: &Palette, cb: &CaptionBox<'_>, alpha: f64) {
    let r = cb.rect;
    let bg = Rect::new(r.x0 - cb.padding, r.y0, r.x1 + cb.padding, r.y1);
    let mid = r.y0 + r.height() / 2.0;
    let text_x = bg.x0 + 20.0;
    let spacing = 7.0 * cb.text_scale;

    out.with_alpha(alpha, |out| {
        out.fill(
            Shape::rounded(bg, cb.radius),
            Rgba8::WHITE.with_alpha(8),
            1.0,
        );
        out.stroke(
            Shape::rounded(bg, cb.radius),
            StrokeStyle::solid(Rgba8::WHITE.with_alpha(31), 1.0),
            1.0,
        );
        out.text(
            TextRun::new("\u{275d}", Point::new(bg.x0 + 6.0, mid), 12.0 * cb.text_scale, pal.muted)
                .align(TextAlign::Left, TextBaseline::Middle)
                .style(FontStyle::Bold),
            1.0,
        );
        out.text(
            TextRun::new("caption", Point::new(text_x, mid - spacing), 9.0 * cb.text_scale, pal.muted)
                .align(TextAlign::Left, TextBaseline::Middle),
            1.0,
        );
        out.text(
            TextRun::new(cb.text, Point::new(text_x, mid + spacing), 11.0 * cb.text_scale, pal.fg)
                .align(TextAlign::Left, TextBaseline::Middle)
                .style(FontStyle::Italic),
            1.0,
        );
    });
}

/// Rounded card with a faint border, or an accent border for the model box.
pub(crate) fn card(out: &mut FrameBuilder, pal: &Palette, rect: Rect, accent_border: bool, alpha: f64) {
    out.with_alpha(alpha, |out| {
        out.fill(Shape::rounded(rect, CARD_RADIUS), pal.card, 1.0);
        if accent_border {
            out.stroke(
                Shape::rounded(rect.inset(-1.0), CARD_RADIUS),
                StrokeStyle::solid(pal.accent, 2.0),
                1.0,
            );
        } else {
            out.stroke(
                Shape::rounded(rect.inset(-0.5), CARD_RADIUS),
                StrokeStyle::solid(Rgba8::WHITE.with_alpha(15), 1.0),
                1.0,
            );
        }
    });
}

/// Small title centered at the top of a card.
pub(crate) fn card_title(
    out: &mut FrameBuilder,
    pal: &Palette,
    rect: Rect,
    title: &str,
    top: f64,
    alpha: f64,
) {
    out.text(
        TextRun::new(title, Point::new(rect.center().x, rect.y0 + top), 12.0, pal.fg)
            .align(TextAlign::Center, TextBaseline::Top),
        alpha,
    );
}

/// Accent-bordered model card with its bold name in the middle.
pub(crate) fn model_box(out: &mut FrameBuilder, pal: &Palette, rect: Rect, name: &str, alpha: f64) {
    card(out, pal, rect, true, alpha);
    out.text(
        TextRun::new(name, rect.center(), 22.0, pal.accent).style(FontStyle::Bold),
        alpha,
    );
}

/// Inner spacing of a bar chart drawn inside a card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BarLayout {
    pub pad: f64,
    /// Space reserved above the bars for the card title.
    pub label_height: f64,
}

impl BarLayout {
    /// Full-height slot of bar `i` out of `n` inside `rect`.
    pub fn slot(self, rect: Rect, n: usize, i: usize) -> Rect {
        let n_f = n.max(1) as f64;
        let bar_w = (rect.width() - self.pad * (n_f + 1.0)) / n_f;
        let x = rect.x0 + self.pad + i as f64 * (bar_w + self.pad);
        let top = rect.y0 + self.pad + self.label_height;
        let area_h = rect.height() - (self.pad * 2.0 + self.label_height);
        Rect::new(x, top, x + bar_w.max(0.0), top + area_h.max(0.0))
    }
}

/// Bottom-aligned bars, one per value in `[0, 1]`, tinted by `colors`.
pub(crate) fn reward_bars(
    out: &mut FrameBuilder,
    rect: Rect,
    values: &[f64],
    colors: &[Rgba8],
    layout: BarLayout,
    alpha: f64,
) {
    if colors.is_empty() {
        return;
    }
    for (i, v) in values.iter().enumerate() {
        let slot = layout.slot(rect, values.len(), i);
        let h = slot.height() * clamp01(*v);
        if h <= 0.0 {
            continue;
        }
        out.fill(
            Shape::rounded(Rect::new(slot.x0, slot.y1 - h, slot.x1, slot.y1), BAR_RADIUS),
            colors[i % colors.len()],
            alpha,
        );
    }
}

/// Bold banner text centered at the top of the surface.
pub(crate) fn phase_label(
    out: &mut FrameBuilder,
    pal: &Palette,
    surface: Surface,
    breakpoint: Breakpoint,
    text: &str,
    alpha: f64,
) {
    let (y, size) = if breakpoint.is_narrow() {
        (5.0, 13.0)
    } else {
        (10.0, 16.0)
    };
    out.text(
        TextRun::new(text, Point::new(surface.width / 2.0, y), size, pal.fg)
            .align(TextAlign::Center, TextBaseline::Top)
            .style(FontStyle::Bold),
        alpha,
    );
}

#[cfg(test)]
#[path = "../../tests/unit/render/widgets.rs"]
mod tests;
