use std::{collections::HashMap, sync::Arc};

use kurbo::{PathEl, Shape as _};

use crate::{
    assets::{decode::premultiply_rgba8_in_place, store::AssetProvider},
    effects::noise::{NoiseCompositor, NoiseParams},
    foundation::{
        core::{Rgba8, Surface},
        error::{ChoreoError, ChoreoResult},
    },
    render::{
        plan::{DrawCommand, Shape},
        surface::{DrawSurface, FrameRgba},
    },
};

const TOLERANCE: f64 = 0.1;
const IMAGE_CACHE_LIMIT: usize = 64;
const HALO_RINGS: u32 = 3;

/// CPU raster surface backed by `vello_cpu`.
///
/// Gradients fill with the mean of their stops, glows become a few stacked
/// translucent rings and text is skipped (hosts typeset text themselves).
pub struct CpuSurface {
    surface: Surface,
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    noise: NoiseCompositor,
    image_cache: HashMap<String, vello_cpu::Image>,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("cached_images", &self.image_cache.len())
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    pub fn new(surface: Surface, noise: NoiseParams) -> ChoreoResult<Self> {
        let (width, height) = pixel_dims(surface)?;
        Ok(Self {
            surface,
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            noise: NoiseCompositor::new(noise, 0x00C0_FFEE),
            image_cache: HashMap::new(),
        })
    }

    fn image_paint(
        &mut self,
        key: &str,
        rgba: &image::RgbaImage,
        noise: f64,
    ) -> ChoreoResult<vello_cpu::Image> {
        if noise > 0.0 {
            // Grain is re-rolled every draw, so noisy paints are never cached.
            let grained = self.noise.blend(rgba, None, noise);
            return rgba_to_image(&grained);
        }
        if let Some(paint) = self.image_cache.get(key) {
            return Ok(paint.clone());
        }
        let paint = rgba_to_image(rgba)?;
        if self.image_cache.len() >= IMAGE_CACHE_LIMIT {
            self.image_cache.clear();
        }
        self.image_cache.insert(key.to_owned(), paint.clone());
        Ok(paint)
    }
}

impl DrawSurface for CpuSurface {
    fn size(&self) -> Surface {
        self.surface
    }

    fn resize(&mut self, surface: Surface) -> ChoreoResult<()> {
        let (width, height) = pixel_dims(surface)?;
        self.surface = surface;
        self.width = width;
        self.height = height;
        self.ctx = vello_cpu::RenderContext::new(width, height);
        Ok(())
    }

    fn clear(&mut self, color: Rgba8) {
        self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
        self.ctx.set_paint(cpu_color(color));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
    }

    fn draw(&mut self, cmd: &DrawCommand, assets: &dyn AssetProvider) -> ChoreoResult<()> {
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match cmd {
            DrawCommand::Fill {
                shape,
                paint,
                alpha,
                glow,
            } => {
                let color = paint.mean_color();
                if let (Some(radius), Shape::Rect { rect, radius: r }) = (glow, shape) {
                    for ring in (1..=HALO_RINGS).rev() {
                        let grow = radius * f64::from(ring) / f64::from(HALO_RINGS);
                        let halo = Shape::rounded(rect.abs().inflate(grow, grow), r + grow);
                        fill_path(&mut self.ctx, &shape_path(&halo), color, alpha * 0.12);
                    }
                }
                fill_path(&mut self.ctx, &shape_path(shape), color, *alpha);
            }
            DrawCommand::Stroke {
                shape,
                style,
                alpha,
            } => {
                let mut stroke = kurbo::Stroke::new(style.width);
                if let Some([on, off]) = style.dash {
                    stroke = stroke.with_dashes(0.0, [on, off]);
                }
                let outline = kurbo::stroke(
                    shape_path(shape),
                    &stroke,
                    &kurbo::StrokeOpts::default(),
                    TOLERANCE,
                );
                fill_path(&mut self.ctx, &outline, style.color, *alpha);
            }
            DrawCommand::Text { run, .. } => {
                tracing::trace!(text = %run.text, "text left to the host; skipped in raster");
            }
            DrawCommand::Image {
                asset,
                rect,
                alpha,
                noise,
            } => {
                let Some(img) = assets.image(asset) else {
                    tracing::trace!(asset = %asset, "image not loaded; drawing placeholder");
                    return Ok(());
                };
                if img.width == 0 || img.height == 0 {
                    return Ok(());
                }
                let rgba = Arc::clone(&img.rgba);
                let paint = self.image_paint(asset, &rgba, *noise)?;
                let (w, h) = (f64::from(img.width), f64::from(img.height));
                let rect = rect.abs();

                self.ctx.set_transform(vello_cpu::kurbo::Affine::new([
                    rect.width() / w,
                    0.0,
                    0.0,
                    rect.height() / h,
                    rect.x0,
                    rect.y0,
                ]));
                self.ctx.set_paint(paint);
                with_opacity(&mut self.ctx, *alpha, |ctx| {
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
                });
            }
        }
        Ok(())
    }

    fn read_frame(&mut self) -> ChoreoResult<FrameRgba> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRgba {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn pixel_dims(surface: Surface) -> ChoreoResult<(u16, u16)> {
    let (w, h) = surface.pixel_size();
    let width: u16 = w
        .try_into()
        .map_err(|_| ChoreoError::validation("surface width exceeds u16"))?;
    let height: u16 = h
        .try_into()
        .map_err(|_| ChoreoError::validation("surface height exceeds u16"))?;
    Ok((width, height))
}

fn cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn with_opacity(
    ctx: &mut vello_cpu::RenderContext,
    alpha: f64,
    f: impl FnOnce(&mut vello_cpu::RenderContext),
) {
    let layered = alpha < 1.0;
    if layered {
        ctx.push_opacity_layer(alpha.clamp(0.0, 1.0) as f32);
    }
    f(ctx);
    if layered {
        ctx.pop_layer();
    }
}

fn fill_path(ctx: &mut vello_cpu::RenderContext, path: &kurbo::BezPath, color: Rgba8, alpha: f64) {
    ctx.set_paint(cpu_color(color));
    let cpu_path = bezpath_to_cpu(path);
    with_opacity(ctx, alpha, |ctx| ctx.fill_path(&cpu_path));
}

fn shape_path(shape: &Shape) -> kurbo::BezPath {
    match *shape {
        Shape::Rect { rect, radius } if radius > 0.0 => {
            kurbo::RoundedRect::from_rect(rect.abs(), radius).to_path(TOLERANCE)
        }
        Shape::Rect { rect, .. } => rect.abs().to_path(TOLERANCE),
        Shape::Ellipse { center, radii } => {
            kurbo::Ellipse::new(center, radii, 0.0).to_path(TOLERANCE)
        }
        Shape::Line { from, to } => kurbo::Line::new(from, to).to_path(TOLERANCE),
        Shape::Triangle([a, b, c]) => {
            let mut path = kurbo::BezPath::new();
            path.move_to(a);
            path.line_to(b);
            path.line_to(c);
            path.close_path();
            path
        }
    }
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn rgba_to_image(rgba: &image::RgbaImage) -> ChoreoResult<vello_cpu::Image> {
    let (width, height) = rgba.dimensions();
    let w: u16 = width
        .try_into()
        .map_err(|_| ChoreoError::asset("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ChoreoError::asset("image height exceeds u16"))?;

    let mut premul = rgba.as_raw().clone();
    premultiply_rgba8_in_place(&mut premul);

    let mut may_have_opacities = false;
    let pixels = premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
