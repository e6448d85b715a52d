//! Reward trade-off scrubber: a reward-weight histogram read from a CSV row
//! per frame drives a pre-rendered image sequence, held on its first and last
//! frame.

pub mod config;
pub mod layout;
mod stages;

use std::path::Path;

use crate::{
    animation::ease::Ease,
    assets::{
        rewards::{RewardTable, frame_window},
        store::PreparedAssetStore,
    },
    foundation::{
        core::{Breakpoint, Surface},
        error::ChoreoResult,
    },
    layout::anchors::LayoutCalculator,
    render::plan::FrameBuilder,
    sequences::{PhaseLabel, Sequence, StageInput, classify},
    timeline::stage::{StageId, Timeline},
};

pub use config::TradeoffConfig;
pub use layout::{TradeoffAnchor, TradeoffLayout};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TradeoffStage {
    HoldStart,
    Scrub,
    HoldEnd,
}

impl StageId for TradeoffStage {
    fn name(self) -> &'static str {
        match self {
            Self::HoldStart => "hold_start",
            Self::Scrub => "scrub",
            Self::HoldEnd => "hold_end",
        }
    }
}

pub const OVERLAY_LABELS: &[&str] = &["s_custom"];

#[derive(Clone, Debug)]
pub struct TradeoffSequence {
    config: TradeoffConfig,
    timeline: Timeline<TradeoffStage>,
    layout: TradeoffLayout,
    rewards: RewardTable,
}

impl TradeoffSequence {
    /// Sequence with no reward data; every bar sits at the neutral value
    /// until a table is attached.
    pub fn new(config: TradeoffConfig) -> ChoreoResult<Self> {
        let config = config.validate()?;
        let timeline = Timeline::new(config.stages())?;
        let layout = TradeoffLayout {
            narrow: config.narrow,
            wide: config.wide,
        };
        let rewards = RewardTable::neutral(config.reward_count());
        Ok(Self {
            config,
            timeline,
            layout,
            rewards,
        })
    }

    pub fn with_rewards(mut self, rewards: RewardTable) -> Self {
        self.rewards = rewards;
        self
    }

    /// Read the configured CSV relative to `root`.
    pub fn load_rewards(&mut self, root: &Path) -> ChoreoResult<()> {
        let path = root.join(&self.config.rewards_csv);
        self.rewards = RewardTable::from_path(&path, self.config.reward_count())?;
        tracing::debug!(
            path = %path.display(),
            frames = self.rewards.frame_count(),
            "loaded reward table"
        );
        Ok(())
    }

    pub fn config(&self) -> &TradeoffConfig {
        &self.config
    }

    pub fn rewards(&self) -> &RewardTable {
        &self.rewards
    }

    /// Frame shown at `raw_progress` through `stage`.
    pub fn frame_for(&self, stage: TradeoffStage, raw_progress: f64) -> usize {
        let last = self.config.frame_count - 1;
        match stage {
            TradeoffStage::HoldStart => 0,
            TradeoffStage::Scrub => {
                let f = (raw_progress * self.config.frame_count as f64).floor();
                (f.max(0.0) as usize).min(last)
            }
            TradeoffStage::HoldEnd => last,
        }
    }

    /// Frame shown at `elapsed_ms` since the loop started.
    pub fn frame_at(&self, elapsed_ms: f64) -> usize {
        let s = self.timeline.sample(elapsed_ms);
        self.frame_for(s.stage, s.raw_progress)
    }

    /// Load the frames around `frame` into `store` and drop scrubber frames
    /// well outside that window. Other assets in the store are untouched.
    /// Returns how many frames of the window are available.
    pub fn prefetch(&self, store: &mut PreparedAssetStore, frame: usize) -> usize {
        let c = &self.config;
        let Some(window) = frame_window(frame, c.prefetch_radius, c.frame_count) else {
            return 0;
        };
        let lo = window.start().saturating_sub(c.evict_margin);
        let hi = window.end() + c.evict_margin;
        let prefix = format!("{}/frame_", c.frames_dir.trim_end_matches('/'));
        store.retain(|key| match frame_index(key, &prefix) {
            Some(i) => (lo..=hi).contains(&i),
            None => true,
        });
        let keys: Vec<String> = window.map(|i| c.frame_key(i)).collect();
        store.preload(keys.iter().map(String::as_str))
    }
}

fn frame_index(key: &str, prefix: &str) -> Option<usize> {
    key.strip_prefix(prefix)?.strip_suffix(".jpg")?.parse().ok()
}

impl Sequence for TradeoffSequence {
    type Stage = TradeoffStage;
    type Anchor = TradeoffAnchor;
    /// Every stage draws the same scene; only the frame differs.
    type Handler = TradeoffStage;

    fn name(&self) -> &'static str {
        "tradeoff"
    }

    fn timeline(&self) -> &Timeline<TradeoffStage> {
        &self.timeline
    }

    fn easing(&self) -> Ease {
        self.config.easing
    }

    fn layout(&self) -> &dyn LayoutCalculator<Key = TradeoffAnchor> {
        &self.layout
    }

    fn surface_for_container(&self, container_width: f64) -> ChoreoResult<(Surface, Breakpoint)> {
        let bp = classify(container_width, self.config.breakpoint_width)?;
        let (w, h) = self.layout.canvas(container_width, bp);
        Ok((Surface::new(w, h)?, bp))
    }

    fn handler_for(&self, stage: TradeoffStage) -> TradeoffStage {
        stage
    }

    fn render(
        &self,
        handler: TradeoffStage,
        input: &StageInput<'_, TradeoffStage, TradeoffAnchor>,
        out: &mut FrameBuilder,
    ) -> ChoreoResult<()> {
        let frame = self.frame_for(handler, input.raw_progress);
        let ctx = stages::Ctx {
            cfg: &self.config,
            input,
            rewards: self.rewards.rewards(frame),
            frame_key: self.config.frame_key(frame),
        };
        stages::scene(&ctx, out)
    }

    fn phase_label(
        &self,
        _input: &StageInput<'_, TradeoffStage, TradeoffAnchor>,
    ) -> Option<PhaseLabel<'_>> {
        Some(PhaseLabel {
            text: &self.config.text.phase,
            alpha: 1.0,
        })
    }

    fn overlay_labels(&self) -> &'static [&'static str] {
        OVERLAY_LABELS
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/sequences/tradeoff.rs"]
mod tests;
