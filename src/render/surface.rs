use crate::{
    assets::store::AssetProvider,
    foundation::{
        core::{Rgba8, Surface},
        error::ChoreoResult,
    },
    render::plan::{DrawCommand, FramePlan},
};

/// RGBA8 pixels read back from a drawing surface.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRgba {
    /// Straight-alpha copy of the pixels, e.g. for PNG encoding.
    pub fn to_straight(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            for px in out.chunks_exact_mut(4) {
                let a = u16::from(px[3]);
                if a == 0 || a == 255 {
                    continue;
                }
                for c in &mut px[..3] {
                    *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
        out
    }
}

/// A resizable pixel surface that executes recorded draw commands.
pub trait DrawSurface {
    fn size(&self) -> Surface;

    fn resize(&mut self, surface: Surface) -> ChoreoResult<()>;

    /// Start a new frame filled with `color`.
    fn clear(&mut self, color: Rgba8);

    /// Execute one command. Unknown or unloaded assets draw nothing.
    fn draw(&mut self, cmd: &DrawCommand, assets: &dyn AssetProvider) -> ChoreoResult<()>;

    /// Finish the frame and read back its pixels.
    fn read_frame(&mut self) -> ChoreoResult<FrameRgba>;
}

/// Resize if needed, clear, draw every command of `plan` and read back.
#[tracing::instrument(skip_all, fields(stage = plan.stage, commands = plan.commands.len()))]
pub fn render_plan(
    surface: &mut dyn DrawSurface,
    plan: &FramePlan,
    background: Rgba8,
    assets: &dyn AssetProvider,
) -> ChoreoResult<FrameRgba> {
    if surface.size() != plan.surface {
        surface.resize(plan.surface)?;
    }
    surface.clear(background);
    for cmd in &plan.commands {
        surface.draw(cmd, assets)?;
    }
    surface.read_frame()
}
