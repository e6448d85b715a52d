use crate::{
    assets::store::AssetProvider,
    foundation::{
        core::{Breakpoint, Palette, Surface},
        error::ChoreoResult,
    },
    layout::anchors::AnchorSet,
    playback::config::PlaybackConfig,
    render::{
        overlay::{OverlayPositioner, apply_overlays},
        plan::{FrameBuilder, FramePlan},
        widgets,
    },
    sequences::{Sequence, StageInput},
    timeline::{
        clock::PlaybackClock,
        dispatch::DispatchTable,
        stage::{StageId, StageSample},
    },
};

/// Drives one sequence from host signals: visibility, clicks, resizes and
/// frame ticks.
///
/// The controller owns the only mutable playback state (the clock); each
/// frame is recomputed from the sampled stage and the current anchor set.
pub struct PlaybackController<Q: Sequence> {
    sequence: Q,
    config: PlaybackConfig,
    dispatch: DispatchTable<Q::Handler>,
    clock: Option<PlaybackClock>,
    last_tick_ms: Option<f64>,
    last_stage: Option<usize>,
    surface: Surface,
    anchors: AnchorSet<Q::Anchor>,
}

impl<Q: Sequence> PlaybackController<Q> {
    /// Set up for a host container of `container_width`. Playback stays
    /// stopped until the first visibility or click signal.
    pub fn new(sequence: Q, config: PlaybackConfig, container_width: f64) -> ChoreoResult<Self> {
        let config = config.validate()?;
        let dispatch = DispatchTable::build(sequence.timeline(), |s| sequence.handler_for(s));
        let (surface, breakpoint) = sequence.surface_for_container(container_width)?;
        let anchors = sequence.layout().compute_anchors(surface, breakpoint);
        tracing::debug!(
            sequence = sequence.name(),
            stages = dispatch.len(),
            width = surface.width,
            height = surface.height,
            ?breakpoint,
            "playback controller ready"
        );
        Ok(Self {
            sequence,
            config,
            dispatch,
            clock: None,
            last_tick_ms: None,
            last_stage: None,
            surface,
            anchors,
        })
    }

    pub fn sequence(&self) -> &Q {
        &self.sequence
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.anchors.breakpoint()
    }

    pub fn anchors(&self) -> &AnchorSet<Q::Anchor> {
        &self.anchors
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_some_and(|c| c.is_playing())
    }

    /// Elapsed loop time at `now_ms`; zero before playback ever started.
    pub fn elapsed(&self, now_ms: f64) -> f64 {
        self.clock.map_or(0.0, |c| c.elapsed(now_ms))
    }

    fn period(&self) -> f64 {
        self.sequence.timeline().total_ms()
    }

    /// Viewport intersection changed. Entering restarts the sequence from
    /// its first stage; leaving pauses it.
    pub fn on_visibility(&mut self, ratio: f64, now_ms: f64) {
        if ratio >= self.config.visibility_threshold {
            if !self.is_playing() {
                tracing::debug!(sequence = self.sequence.name(), ratio, "visible; restarting");
                self.clock = Some(PlaybackClock::started_at(now_ms));
                self.last_tick_ms = None;
                self.last_stage = None;
            }
        } else if let Some(clock) = self.clock.as_mut() {
            if clock.is_playing() {
                tracing::debug!(sequence = self.sequence.name(), ratio, "hidden; pausing");
            }
            clock.pause(now_ms);
            self.last_tick_ms = None;
        }
    }

    /// Play/pause toggle. Resuming keeps the wrapped position in the loop.
    pub fn on_click(&mut self, now_ms: f64) {
        let period = self.period();
        match self.clock.as_mut() {
            Some(clock) => clock.toggle(now_ms, period),
            None => self.clock = Some(PlaybackClock::started_at(now_ms)),
        }
        self.last_tick_ms = None;
        tracing::debug!(
            sequence = self.sequence.name(),
            playing = self.is_playing(),
            "toggled"
        );
    }

    /// Host container resized. The anchor set is always recomputed; returns
    /// whether the breakpoint flipped.
    pub fn on_resize(&mut self, container_width: f64) -> ChoreoResult<bool> {
        let (surface, breakpoint) = self.sequence.surface_for_container(container_width)?;
        let flipped = breakpoint != self.breakpoint();
        if flipped {
            tracing::debug!(
                sequence = self.sequence.name(),
                from = ?self.breakpoint(),
                to = ?breakpoint,
                container_width,
                "breakpoint flip"
            );
        }
        self.surface = surface;
        self.anchors = self.sequence.layout().compute_anchors(surface, breakpoint);
        Ok(flipped)
    }

    /// Advance to `now_ms` and plan one frame, or `None` while stopped.
    pub fn tick(
        &mut self,
        now_ms: f64,
        palette: &Palette,
        assets: &dyn AssetProvider,
    ) -> ChoreoResult<Option<FramePlan>> {
        let max_step = self.config.max_step_ms;
        let Some(clock) = self.clock.as_mut().filter(|c| c.is_playing()) else {
            return Ok(None);
        };
        if let Some(last) = self.last_tick_ms {
            let delta = now_ms - last;
            if delta > max_step {
                tracing::debug!(delta, max_step, "clamping stalled frame step");
                clock.shift_origin(delta - max_step);
            }
        }
        self.last_tick_ms = Some(now_ms);

        let sample = self.sequence.timeline().sample(clock.elapsed(now_ms));
        if self.last_stage != Some(sample.index) {
            tracing::debug!(
                sequence = self.sequence.name(),
                stage = sample.stage.name(),
                lap = sample.lap,
                "stage change"
            );
            self.last_stage = Some(sample.index);
        }
        self.render_sample(sample, palette, assets).map(Some)
    }

    /// Plan the frame at `elapsed_ms` without touching playback state.
    pub fn render_at(
        &self,
        elapsed_ms: f64,
        palette: &Palette,
        assets: &dyn AssetProvider,
    ) -> ChoreoResult<FramePlan> {
        let sample = self.sequence.timeline().sample(elapsed_ms);
        self.render_sample(sample, palette, assets)
    }

    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(sequence = self.sequence.name(), stage = sample.stage.name())
    )]
    fn render_sample(
        &self,
        sample: StageSample<Q::Stage>,
        palette: &Palette,
        assets: &dyn AssetProvider,
    ) -> ChoreoResult<FramePlan> {
        let handler = self.dispatch.get(sample.index)?;
        let input = StageInput {
            stage: sample.stage,
            progress: self.sequence.easing().apply(sample.raw_progress),
            raw_progress: sample.raw_progress,
            lap: sample.lap,
            anchors: &self.anchors,
            palette,
            assets,
        };
        let mut out = FrameBuilder::new();
        self.sequence.render(handler, &input, &mut out)?;
        if let Some(label) = self.sequence.phase_label(&input) {
            widgets::phase_label(
                &mut out,
                palette,
                self.surface,
                self.breakpoint(),
                label.text,
                label.alpha,
            );
        }
        Ok(out.finish(self.surface, sample.stage.name()))
    }

    /// Hide every overlay label this sequence owns, then apply the frame's
    /// placements.
    pub fn present(&self, plan: &FramePlan, overlay: &mut dyn OverlayPositioner) {
        apply_overlays(overlay, self.sequence.overlay_labels(), &plan.overlays);
    }
}

impl<Q: Sequence + std::fmt::Debug> std::fmt::Debug for PlaybackController<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("sequence", &self.sequence)
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("surface", &self.surface)
            .field("breakpoint", &self.breakpoint())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/controller.rs"]
mod tests;
