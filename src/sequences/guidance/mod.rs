//! Reward-guided sampling: the model is run once with high target scores and
//! once with low ones, the two velocities are subtracted, and the difference
//! is applied as guidance to produce the final denoising step.

pub mod config;
pub mod layout;
mod stages;

use crate::{
    animation::ease::Ease,
    foundation::{
        core::{Breakpoint, Surface},
        error::ChoreoResult,
    },
    layout::anchors::LayoutCalculator,
    render::plan::FrameBuilder,
    sequences::{PhaseLabel, Sequence, StageInput, classify},
    timeline::stage::{StageId, Timeline},
};

pub use config::GuidanceConfig;
pub use layout::{GuidanceAnchor, GuidanceLayout};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GuidanceStage {
    SPlusInput,
    SMinusInput,
    ImageCaptionInput,
    SPlusToModel,
    ProcessSPlus,
    HighOutput,
    SMinusToModel,
    ProcessSMinus,
    LowOutput,
    Regroup,
    Subtraction,
    ApplyGuidance,
    Final,
    Hold,
}

impl StageId for GuidanceStage {
    fn name(self) -> &'static str {
        match self {
            Self::SPlusInput => "s_plus_input",
            Self::SMinusInput => "s_minus_input",
            Self::ImageCaptionInput => "image_caption_input",
            Self::SPlusToModel => "s_plus_to_model",
            Self::ProcessSPlus => "process_s_plus",
            Self::HighOutput => "high_output",
            Self::SMinusToModel => "s_minus_to_model",
            Self::ProcessSMinus => "process_s_minus",
            Self::LowOutput => "low_output",
            Self::Regroup => "regroup",
            Self::Subtraction => "subtraction",
            Self::ApplyGuidance => "apply_guidance",
            Self::Final => "final",
            Self::Hold => "hold",
        }
    }
}

/// Render strategies; each covers a run of visually continuous stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuidanceHandler {
    Inputs,
    HighBranch,
    LowBranch,
    Subtraction,
    Guidance,
}

pub const OVERLAY_LABELS: &[&str] = &[
    "high_reward_out",
    "low_reward_out",
    "guidance_vec",
    "guidance_formula",
    "s_plus",
    "s_minus",
];

#[derive(Clone, Debug)]
pub struct GuidanceSequence {
    config: GuidanceConfig,
    timeline: Timeline<GuidanceStage>,
    layout: GuidanceLayout,
}

impl GuidanceSequence {
    pub fn new(config: GuidanceConfig) -> ChoreoResult<Self> {
        let config = config.validate()?;
        let timeline = Timeline::new(config.stages.clone())?;
        let layout = GuidanceLayout {
            narrow: config.narrow,
            wide: config.wide,
        };
        Ok(Self {
            config,
            timeline,
            layout,
        })
    }

    pub fn config(&self) -> &GuidanceConfig {
        &self.config
    }
}

impl Sequence for GuidanceSequence {
    type Stage = GuidanceStage;
    type Anchor = GuidanceAnchor;
    type Handler = GuidanceHandler;

    fn name(&self) -> &'static str {
        "guidance"
    }

    fn timeline(&self) -> &Timeline<GuidanceStage> {
        &self.timeline
    }

    fn easing(&self) -> Ease {
        self.config.easing
    }

    fn layout(&self) -> &dyn LayoutCalculator<Key = GuidanceAnchor> {
        &self.layout
    }

    fn surface_for_container(&self, container_width: f64) -> ChoreoResult<(Surface, Breakpoint)> {
        let bp = classify(container_width, self.config.breakpoint_width)?;
        let (w, h) = self.layout.canvas(container_width, bp);
        Ok((Surface::new(w, h)?, bp))
    }

    fn handler_for(&self, stage: GuidanceStage) -> GuidanceHandler {
        use GuidanceStage::*;
        match stage {
            SPlusInput | SMinusInput | ImageCaptionInput => GuidanceHandler::Inputs,
            SPlusToModel | ProcessSPlus | HighOutput => GuidanceHandler::HighBranch,
            SMinusToModel | ProcessSMinus | LowOutput => GuidanceHandler::LowBranch,
            Regroup | Subtraction => GuidanceHandler::Subtraction,
            ApplyGuidance | Final | Hold => GuidanceHandler::Guidance,
        }
    }

    fn render(
        &self,
        handler: GuidanceHandler,
        input: &StageInput<'_, GuidanceStage, GuidanceAnchor>,
        out: &mut FrameBuilder,
    ) -> ChoreoResult<()> {
        let ctx = stages::Ctx {
            cfg: &self.config,
            input,
        };
        match handler {
            GuidanceHandler::Inputs => stages::inputs(&ctx, out),
            GuidanceHandler::HighBranch => stages::high_branch(&ctx, out),
            GuidanceHandler::LowBranch => stages::low_branch(&ctx, out),
            GuidanceHandler::Subtraction => stages::subtraction(&ctx, out),
            GuidanceHandler::Guidance => stages::guidance(&ctx, out),
        }
    }

    fn phase_label(
        &self,
        input: &StageInput<'_, GuidanceStage, GuidanceAnchor>,
    ) -> Option<PhaseLabel<'_>> {
        use GuidanceStage::*;
        let p = input.progress;
        let text = &self.config.text;
        let (label, alpha) = match input.stage {
            SPlusInput | SMinusInput | ImageCaptionInput => return None,
            SPlusToModel => (&text.compute_high, (p * 2.0).min(1.0)),
            HighOutput if p > 0.5 => (&text.compute_high, 1.0 - (p - 0.5) * 2.0),
            ProcessSPlus | HighOutput => (&text.compute_high, 1.0),
            SMinusToModel => (&text.compute_low, (p * 2.0).min(1.0)),
            LowOutput if p > 0.5 => (&text.compute_low, 1.0 - (p - 0.5) * 2.0),
            ProcessSMinus | LowOutput => (&text.compute_low, 1.0),
            Regroup => (&text.compute_guidance, (p * 2.0).min(1.0)),
            Subtraction if p > 0.8 => (&text.compute_guidance, 1.0 - (p - 0.8) * 5.0),
            Subtraction => (&text.compute_guidance, 1.0),
            ApplyGuidance => (&text.update_velocity, (p * 2.0).min(1.0)),
            Final | Hold => (&text.update_velocity, 1.0),
        };
        Some(PhaseLabel {
            text: label,
            alpha: alpha.max(0.0),
        })
    }

    fn overlay_labels(&self) -> &'static [&'static str] {
        OVERLAY_LABELS
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/sequences/guidance.rs"]
mod tests;
