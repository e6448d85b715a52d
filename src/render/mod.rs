//! Frame plans, shared widgets, overlay positioning and the CPU raster surface.

/// `vello_cpu` implementation of [`surface::DrawSurface`].
pub mod cpu;
/// Host overlay-label positioning.
pub mod overlay;
/// Draw commands and the per-frame recorder.
pub mod plan;
/// The drawing-surface seam.
pub mod surface;
pub(crate) mod widgets;
