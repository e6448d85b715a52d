//! Concrete stage-based sequences.
//!
//! Each sequence bundles a timeline, a layout calculator for both
//! breakpoints and one render handler per group of stages. Handlers are pure:
//! everything they draw is recomputed from the sampled stage, its eased
//! progress and the current anchor set.

pub mod guidance;
pub mod training;
pub mod tradeoff;

use crate::{
    animation::ease::Ease,
    assets::store::AssetProvider,
    foundation::{
        core::{Breakpoint, Palette, Surface},
        error::{ChoreoError, ChoreoResult},
    },
    layout::anchors::{AnchorKey, AnchorSet, LayoutCalculator},
    render::plan::FrameBuilder,
    timeline::stage::{StageId, Timeline},
};

/// Everything a stage handler may read for one frame.
#[derive(Clone, Copy)]
pub struct StageInput<'a, S, K: AnchorKey> {
    pub stage: S,
    /// Eased progress within the stage.
    pub progress: f64,
    pub raw_progress: f64,
    /// Completed loops so far.
    pub lap: u64,
    pub anchors: &'a AnchorSet<K>,
    pub palette: &'a Palette,
    pub assets: &'a dyn AssetProvider,
}

impl<S, K: AnchorKey> StageInput<'_, S, K> {
    pub fn breakpoint(&self) -> Breakpoint {
        self.anchors.breakpoint()
    }

    pub fn is_narrow(&self) -> bool {
        self.anchors.breakpoint().is_narrow()
    }

    pub fn surface(&self) -> Surface {
        self.anchors.surface()
    }
}

/// Banner text describing the current phase, with its opacity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseLabel<'a> {
    pub text: &'a str,
    pub alpha: f64,
}

/// A looping, stage-based animation.
pub trait Sequence {
    type Stage: StageId;
    type Anchor: AnchorKey;
    /// Render strategy; several stages may share one value.
    type Handler: Copy + std::fmt::Debug;

    fn name(&self) -> &'static str;

    fn timeline(&self) -> &Timeline<Self::Stage>;

    fn easing(&self) -> Ease;

    fn layout(&self) -> &dyn LayoutCalculator<Key = Self::Anchor>;

    /// Surface size and breakpoint for a host container of the given width.
    fn surface_for_container(&self, container_width: f64) -> ChoreoResult<(Surface, Breakpoint)>;

    fn handler_for(&self, stage: Self::Stage) -> Self::Handler;

    fn render(
        &self,
        handler: Self::Handler,
        input: &StageInput<'_, Self::Stage, Self::Anchor>,
        out: &mut FrameBuilder,
    ) -> ChoreoResult<()>;

    fn phase_label(&self, _input: &StageInput<'_, Self::Stage, Self::Anchor>) -> Option<PhaseLabel<'_>> {
        None
    }

    /// Host overlay labels this sequence positions; all are hidden at the
    /// start of every frame.
    fn overlay_labels(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Breakpoint of a host container; rejects non-positive widths.
pub(crate) fn classify(container_width: f64, threshold: f64) -> ChoreoResult<Breakpoint> {
    if !(container_width.is_finite() && container_width > 0.0) {
        return Err(ChoreoError::validation(format!(
            "container width must be finite and positive, got {container_width}"
        )));
    }
    Ok(Breakpoint::from_width(container_width, threshold))
}
