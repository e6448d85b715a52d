use crate::foundation::core::{Point, Rect, Rgba8, Surface, Vec2};

/// Alpha below which draw commands are dropped instead of recorded.
pub const MIN_VISIBLE_ALPHA: f64 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba8,
}

impl GradientStop {
    pub const fn new(offset: f64, color: Rgba8) -> Self {
        Self { offset, color }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba8),
    Linear {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
    Radial {
        center: Point,
        r0: f64,
        r1: f64,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    /// Channel-wise mean of the paint's colors; backends without gradient
    /// support fill with this.
    pub fn mean_color(&self) -> Rgba8 {
        let stops = match self {
            Self::Solid(c) => return *c,
            Self::Linear { stops, .. } | Self::Radial { stops, .. } => stops,
        };
        if stops.is_empty() {
            return Rgba8::TRANSPARENT;
        }
        let n = stops.len() as u32;
        let avg = |f: fn(&Rgba8) -> u8| {
            (stops.iter().map(|s| u32::from(f(&s.color))).sum::<u32>() / n) as u8
        };
        Rgba8::rgba(avg(|c| c.r), avg(|c| c.g), avg(|c| c.b), avg(|c| c.a))
    }
}

impl From<Rgba8> for Paint {
    fn from(c: Rgba8) -> Self {
        Self::Solid(c)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba8,
    pub width: f64,
    /// `[on, off]` dash lengths.
    pub dash: Option<[f64; 2]>,
}

impl StrokeStyle {
    pub fn solid(color: Rgba8, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(self, on: f64, off: f64) -> Self {
        Self {
            dash: Some([on, off]),
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Rect { rect: Rect, radius: f64 },
    Ellipse { center: Point, radii: Vec2 },
    Line { from: Point, to: Point },
    Triangle([Point; 3]),
}

impl Shape {
    pub fn rect(rect: Rect) -> Self {
        Self::Rect { rect, radius: 0.0 }
    }

    pub fn rounded(rect: Rect, radius: f64) -> Self {
        Self::Rect { rect, radius }
    }

    /// Circle of the given diameter.
    pub fn circle(center: Point, diameter: f64) -> Self {
        Self::Ellipse {
            center,
            radii: Vec2::new(diameter / 2.0, diameter / 2.0),
        }
    }

    pub fn bounds(&self) -> Rect {
        match *self {
            Self::Rect { rect, .. } => rect,
            Self::Ellipse { center, radii } => {
                Rect::from_center_size(center, (radii.x * 2.0, radii.y * 2.0))
            }
            Self::Line { from, to } => Rect::from_points(from, to),
            Self::Triangle([a, b, c]) => Rect::from_points(a, b).union_pt(c),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub origin: Point,
    pub size: f64,
    pub color: Rgba8,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    pub style: FontStyle,
}

impl TextRun {
    pub fn new(text: impl Into<String>, origin: Point, size: f64, color: Rgba8) -> Self {
        Self {
            text: text.into(),
            origin,
            size,
            color,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
            style: FontStyle::Normal,
        }
    }

    pub fn align(mut self, align: TextAlign, baseline: TextBaseline) -> Self {
        self.align = align;
        self.baseline = baseline;
        self
    }

    pub fn style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    /// Rough advance width, good enough for sizing backgrounds behind text.
    pub fn approx_width(&self) -> f64 {
        let per_char = match self.style {
            FontStyle::Bold => 0.62,
            FontStyle::Normal | FontStyle::Italic => 0.56,
        };
        self.text.chars().count() as f64 * self.size * per_char
    }
}

/// One recorded drawing primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Fill {
        shape: Shape,
        paint: Paint,
        alpha: f64,
        /// Soft halo radius around the shape, if any.
        glow: Option<f64>,
    },
    Stroke {
        shape: Shape,
        style: StrokeStyle,
        alpha: f64,
    },
    Text {
        run: TextRun,
        alpha: f64,
    },
    Image {
        asset: String,
        rect: Rect,
        alpha: f64,
        /// Grain mix weight in `[0, 1]`; zero draws the image untouched.
        noise: f64,
    },
}

impl DrawCommand {
    pub fn alpha(&self) -> f64 {
        match self {
            Self::Fill { alpha, .. }
            | Self::Stroke { alpha, .. }
            | Self::Text { alpha, .. }
            | Self::Image { alpha, .. } => *alpha,
        }
    }
}

/// Where a host-owned overlay label should sit this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayPlacement {
    pub label: &'static str,
    pub position: Point,
    pub opacity: f64,
}

/// Everything one frame draws, in painter's order.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    pub surface: Surface,
    pub stage: &'static str,
    pub commands: Vec<DrawCommand>,
    pub overlays: Vec<OverlayPlacement>,
}

impl FramePlan {
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { run, .. } => Some(run),
            _ => None,
        })
    }

    pub fn overlay(&self, label: &str) -> Option<&OverlayPlacement> {
        self.overlays.iter().rev().find(|o| o.label == label)
    }
}

/// Records draw commands for one frame.
///
/// Group alpha scopes multiply into every command recorded inside them, so
/// composite widgets can be faded as a unit.
#[derive(Debug)]
pub struct FrameBuilder {
    commands: Vec<DrawCommand>,
    overlays: Vec<OverlayPlacement>,
    alpha: f64,
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            overlays: Vec::new(),
            alpha: 1.0,
        }
    }

    pub fn with_alpha<R>(&mut self, alpha: f64, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.alpha;
        self.alpha *= alpha.clamp(0.0, 1.0);
        let out = f(self);
        self.alpha = saved;
        out
    }

    fn effective(&self, alpha: f64) -> Option<f64> {
        let a = self.alpha * alpha.clamp(0.0, 1.0);
        (a > MIN_VISIBLE_ALPHA).then_some(a)
    }

    pub fn fill(&mut self, shape: Shape, paint: impl Into<Paint>, alpha: f64) {
        if let Some(alpha) = self.effective(alpha) {
            self.commands.push(DrawCommand::Fill {
                shape,
                paint: paint.into(),
                alpha,
                glow: None,
            });
        }
    }

    pub fn glow(&mut self, shape: Shape, color: Rgba8, alpha: f64, radius: f64) {
        if let Some(alpha) = self.effective(alpha) {
            self.commands.push(DrawCommand::Fill {
                shape,
                paint: Paint::Solid(color),
                alpha,
                glow: Some(radius),
            });
        }
    }

    pub fn stroke(&mut self, shape: Shape, style: StrokeStyle, alpha: f64) {
        if let Some(alpha) = self.effective(alpha) {
            self.commands
                .push(DrawCommand::Stroke { shape, style, alpha });
        }
    }

    pub fn text(&mut self, run: TextRun, alpha: f64) {
        if run.text.is_empty() {
            return;
        }
        if let Some(alpha) = self.effective(alpha) {
            self.commands.push(DrawCommand::Text { run, alpha });
        }
    }

    pub fn image(&mut self, asset: &str, rect: Rect, alpha: f64, noise: f64) {
        if let Some(alpha) = self.effective(alpha) {
            self.commands.push(DrawCommand::Image {
                asset: asset.to_owned(),
                rect,
                alpha,
                noise: noise.clamp(0.0, 1.0),
            });
        }
    }

    /// Line from `from` to `to` with a filled triangular head at `to`.
    pub fn arrow(&mut self, from: Point, to: Point, style: StrokeStyle, head: Vec2, alpha: f64) {
        self.stroke(Shape::Line { from, to }, style, alpha);
        let angle = (to - from).atan2();
        self.fill(
            Shape::Triangle(arrow_head(to, angle, head)),
            style.color,
            alpha,
        );
    }

    /// Position a host overlay label. Group alpha does not apply; overlays
    /// carry their own opacity.
    pub fn place(&mut self, label: &'static str, position: Point, opacity: f64) {
        self.overlays.push(OverlayPlacement {
            label,
            position,
            opacity: opacity.clamp(0.0, 1.0),
        });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn finish(self, surface: Surface, stage: &'static str) -> FramePlan {
        FramePlan {
            surface,
            stage,
            commands: self.commands,
            overlays: self.overlays,
        }
    }
}

/// Triangle with its tip at `tip`, pointing along `angle`; `size` is
/// `(length, width)`.
pub fn arrow_head(tip: Point, angle: f64, size: Vec2) -> [Point; 3] {
    let (sin, cos) = angle.sin_cos();
    let rot = |dx: f64, dy: f64| Point::new(tip.x + dx * cos - dy * sin, tip.y + dx * sin + dy * cos);
    [
        tip,
        rot(-size.x, -size.y / 2.0),
        rot(-size.x, size.y / 2.0),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
