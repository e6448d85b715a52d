//! Reward-conditioned training: an input is scored by every reward model, the
//! scores are collected into a vector, and the noised input plus its scores
//! are fed to the denoiser which emits a clean image.
//!
//! Scores are re-rolled once per loop from value noise keyed by the lap.

pub mod config;
pub mod layout;
mod stages;

use crate::{
    animation::ease::Ease,
    foundation::{
        core::{Breakpoint, Surface},
        error::ChoreoResult,
        math::value_noise,
    },
    layout::anchors::LayoutCalculator,
    render::plan::FrameBuilder,
    sequences::{PhaseLabel, Sequence, StageInput, classify},
    timeline::stage::{StageId, Timeline},
};

pub use config::TrainingConfig;
pub use layout::{TrainingAnchor, TrainingLayout};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStage {
    Intro,
    MoveToRewards,
    FanoutInputs,
    EmitScores,
    RewardsDisappear,
    ScoresBack,
    NoiseInput,
    DenoiserAppear,
    ToDenoiser,
    CleanOutput,
    Pause,
}

impl StageId for TrainingStage {
    fn name(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::MoveToRewards => "move_to_rewards",
            Self::FanoutInputs => "fanout_inputs",
            Self::EmitScores => "emit_scores",
            Self::RewardsDisappear => "rewards_disappear",
            Self::ScoresBack => "scores_back",
            Self::NoiseInput => "noise_input",
            Self::DenoiserAppear => "denoiser_appear",
            Self::ToDenoiser => "to_denoiser",
            Self::CleanOutput => "clean_output",
            Self::Pause => "pause",
        }
    }
}

#[derive(Clone, Debug)]
pub struct TrainingSequence {
    config: TrainingConfig,
    timeline: Timeline<TrainingStage>,
    layout: TrainingLayout,
}

impl TrainingSequence {
    pub fn new(config: TrainingConfig) -> ChoreoResult<Self> {
        let config = config.validate()?;
        let timeline = Timeline::new(config.stages.clone())?;
        let layout = TrainingLayout {
            narrow: config.narrow,
            wide: config.wide,
            reward_count: config.reward_count,
        };
        Ok(Self {
            config,
            timeline,
            layout,
        })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Scores of every reward for loop number `lap`, each in `[0, 1]`.
    pub fn scores(&self, lap: u64) -> Vec<f64> {
        (0..self.config.reward_count)
            .map(|i| value_noise(self.config.score_seed, lap as f64 * 97.123 + i as f64 * 17.77))
            .collect()
    }
}

impl Sequence for TrainingSequence {
    type Stage = TrainingStage;
    type Anchor = TrainingAnchor;
    /// Every stage has its own handler.
    type Handler = TrainingStage;

    fn name(&self) -> &'static str {
        "training"
    }

    fn timeline(&self) -> &Timeline<TrainingStage> {
        &self.timeline
    }

    fn easing(&self) -> Ease {
        self.config.easing
    }

    fn layout(&self) -> &dyn LayoutCalculator<Key = TrainingAnchor> {
        &self.layout
    }

    fn surface_for_container(&self, container_width: f64) -> ChoreoResult<(Surface, Breakpoint)> {
        let bp = classify(container_width, self.config.breakpoint_width)?;
        let (w, h) = self.layout.canvas(container_width, bp);
        Ok((Surface::new(w, h)?, bp))
    }

    fn handler_for(&self, stage: TrainingStage) -> TrainingStage {
        stage
    }

    fn render(
        &self,
        handler: TrainingStage,
        input: &StageInput<'_, TrainingStage, TrainingAnchor>,
        out: &mut FrameBuilder,
    ) -> ChoreoResult<()> {
        let ctx = stages::Ctx {
            cfg: &self.config,
            input,
            scores: self.scores(input.lap),
        };
        use TrainingStage::*;
        match handler {
            Intro => stages::intro(&ctx, out),
            MoveToRewards => stages::move_to_rewards(&ctx, out),
            FanoutInputs => stages::fanout_inputs(&ctx, out),
            EmitScores => stages::emit_scores(&ctx, out),
            RewardsDisappear => stages::rewards_disappear(&ctx, out),
            ScoresBack => stages::scores_back(&ctx, out),
            NoiseInput => stages::noise_input(&ctx, out),
            DenoiserAppear => stages::denoiser_appear(&ctx, out),
            ToDenoiser => stages::to_denoiser(&ctx, out),
            CleanOutput => stages::clean_output(&ctx, out),
            Pause => stages::pause(&ctx, out),
        }
    }

    fn phase_label(
        &self,
        input: &StageInput<'_, TrainingStage, TrainingAnchor>,
    ) -> Option<PhaseLabel<'_>> {
        use TrainingStage::*;
        let p = input.progress;
        let text = &self.config.text;
        let (label, alpha) = match input.stage {
            Intro => (&text.scoring_phase, (p * 2.0).min(1.0)),
            MoveToRewards | FanoutInputs | EmitScores => (&text.scoring_phase, 1.0),
            RewardsDisappear => (&text.scoring_phase, 1.0 - p),
            ScoresBack => (&text.training_phase, (p * 2.0).min(1.0)),
            NoiseInput | DenoiserAppear | ToDenoiser | CleanOutput | Pause => {
                (&text.training_phase, 1.0)
            }
        };
        Some(PhaseLabel {
            text: label,
            alpha: alpha.max(0.0),
        })
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/sequences/training.rs"]
mod tests;
