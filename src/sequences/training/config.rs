use crate::{
    animation::ease::Ease,
    effects::noise::NoiseParams,
    foundation::{
        core::Rgba8,
        error::{ChoreoError, ChoreoResult},
    },
    sequences::training::TrainingStage,
    timeline::stage::Stage,
};

/// Tunables of the training sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub breakpoint_width: f64,
    pub stages: Vec<Stage<TrainingStage>>,
    pub easing: Ease,
    pub noise: NoiseParams,
    pub reward_count: usize,
    /// Seed of the value noise that rolls the per-lap scores.
    pub score_seed: u64,
    /// Per-reward tints, cycled when there are more rewards than colors.
    pub reward_colors: Vec<Rgba8>,
    pub image: String,
    pub text: TrainingText,
    pub motion: TrainingMotion,
    pub narrow: NarrowLayout,
    pub wide: WideLayout,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        use TrainingStage::*;
        Self {
            breakpoint_width: 700.0,
            stages: vec![
                Stage::new(Intro, 2000.0),
                Stage::new(MoveToRewards, 1600.0),
                Stage::new(FanoutInputs, 100.0),
                Stage::new(EmitScores, 3200.0),
                Stage::new(RewardsDisappear, 1000.0),
                Stage::new(ScoresBack, 1800.0),
                Stage::new(NoiseInput, 1400.0),
                Stage::new(DenoiserAppear, 1000.0),
                Stage::new(ToDenoiser, 1600.0),
                Stage::new(CleanOutput, 2200.0),
                Stage::new(Pause, 1200.0),
            ],
            easing: Ease::InOutCubic,
            noise: NoiseParams::default(),
            reward_count: 7,
            score_seed: 0x7EA1,
            reward_colors: vec![
                Rgba8::rgb(255, 150, 220),
                Rgba8::rgb(105, 200, 105),
                Rgba8::rgb(100, 150, 255),
                Rgba8::rgb(80, 210, 200),
                Rgba8::rgb(255, 105, 120),
                Rgba8::rgb(200, 105, 230),
                Rgba8::rgb(230, 210, 80),
            ],
            image: "assets/images/miro_placeholder.jpg".to_owned(),
            text: TrainingText::default(),
            motion: TrainingMotion::default(),
            narrow: NarrowLayout::default(),
            wide: WideLayout::default(),
        }
    }
}

impl TrainingConfig {
    pub fn from_json_str(s: &str) -> ChoreoResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()
    }

    pub fn validate(self) -> ChoreoResult<Self> {
        if !(self.breakpoint_width.is_finite() && self.breakpoint_width > 0.0) {
            return Err(ChoreoError::validation("breakpoint_width must be positive"));
        }
        if self.reward_count == 0 {
            return Err(ChoreoError::validation("reward_count must be at least 1"));
        }
        if self.reward_colors.is_empty() {
            return Err(ChoreoError::validation("reward_colors must not be empty"));
        }
        let m = &self.motion;
        for (name, v) in [
            ("row_delay", m.row_delay),
            ("morph_end", m.morph_end),
            ("vec_start", m.vec_start),
        ] {
            if !(v.is_finite() && (0.0..1.0).contains(&v)) {
                return Err(ChoreoError::validation(format!("{name} must be in [0, 1)")));
            }
        }
        if m.morph_end == 0.0 {
            return Err(ChoreoError::validation("morph_end must be positive"));
        }
        if m.row_delay * (self.reward_count as f64 - 1.0) >= 1.0 {
            return Err(ChoreoError::validation(format!(
                "row_delay {} leaves no time for the last of {} rows",
                m.row_delay, self.reward_count
            )));
        }
        self.noise.validate()?;
        Ok(self)
    }

    pub fn reward_color(&self, index: usize) -> Rgba8 {
        self.reward_colors[index % self.reward_colors.len()]
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrainingText {
    pub caption: String,
    pub model_name: String,
    pub rewards_label: String,
    pub scores_label: String,
    pub scores_vector: String,
    pub denoised_image: String,
    pub scoring_phase: String,
    pub training_phase: String,
}

impl Default for TrainingText {
    fn default() -> Self {
        Self {
            caption: "\"a scenic volcano\"".to_owned(),
            model_name: "MIRO".to_owned(),
            rewards_label: "Rewards r\u{2081},...,r\u{2099}".to_owned(),
            scores_label: "scores \u{15d}".to_owned(),
            scores_vector: "scores vector".to_owned(),
            denoised_image: "denoised image".to_owned(),
            scoring_phase: "Scoring the dataset with all the rewards".to_owned(),
            training_phase: "Flow matching training".to_owned(),
        }
    }
}

/// Pacing and scaling of moving elements.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrainingMotion {
    /// Per-row stagger as a fraction of the stage.
    pub row_delay: f64,
    /// Row progress at which a mini input has fully shrunk into its dot.
    pub morph_end: f64,
    /// Row progress at which the dot leaves for the score column.
    pub vec_start: f64,
    /// Image scale while it sits inside the reward panel.
    pub img_in_rewards: f64,
    /// Further shrink of the centered image once the rows fan out.
    pub img_small_in_rewards: f64,
    pub img_in_model: f64,
    pub dot_diameter: f64,
    pub dot_min_scale: f64,
    pub mini_scale: f64,
    pub mini_max_narrow: f64,
    pub mini_max_wide: f64,
    pub mini_top: f64,
    pub mini_padding: f64,
}

impl Default for TrainingMotion {
    fn default() -> Self {
        Self {
            row_delay: 0.12,
            morph_end: 0.6,
            vec_start: 0.8,
            img_in_rewards: 0.55,
            img_small_in_rewards: 0.6,
            img_in_model: 0.5,
            dot_diameter: 8.0,
            dot_min_scale: 0.25,
            mini_scale: 0.65,
            mini_max_narrow: 24.0,
            mini_max_wide: 20.0,
            mini_top: 20.0,
            mini_padding: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NarrowLayout {
    pub img_scale: f64,
    pub img_max: f64,
    pub aspect: f64,
    pub start_y: f64,
    pub caption_height: f64,
    pub rewards_scale: f64,
    pub rewards_max: f64,
    pub rewards_height: f64,
    pub vector_scale: f64,
    pub vector_max: f64,
    pub vector_height: f64,
    pub model_scale: f64,
    pub model_max: f64,
    pub model_height: f64,
    pub img_to_caption: f64,
    pub caption_to_rewards: f64,
    pub rewards_to_vector: f64,
    pub vector_to_model: f64,
    pub model_to_output: f64,
    pub min_height: f64,
    pub height_multiplier: f64,
}

impl Default for NarrowLayout {
    fn default() -> Self {
        Self {
            img_scale: 0.55,
            img_max: 180.0,
            aspect: 0.66,
            start_y: 40.0,
            caption_height: 40.0,
            rewards_scale: 0.7,
            rewards_max: 200.0,
            rewards_height: 100.0,
            vector_scale: 0.65,
            vector_max: 170.0,
            vector_height: 60.0,
            model_scale: 0.7,
            model_max: 200.0,
            model_height: 85.0,
            img_to_caption: 8.0,
            caption_to_rewards: 25.0,
            rewards_to_vector: 20.0,
            vector_to_model: 25.0,
            model_to_output: 25.0,
            min_height: 650.0,
            height_multiplier: 1.8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WideLayout {
    pub margin: f64,
    pub img_scale: f64,
    pub max_img_width: f64,
    pub aspect: f64,
    /// Image top as a fraction of the height.
    pub img_y: f64,
    pub caption_height: f64,
    pub caption_spacing: f64,
    pub rewards_offset_x: f64,
    pub rewards_offset_y: f64,
    pub rewards_min_width: f64,
    pub rewards_scale: f64,
    pub vector_offset_x: f64,
    pub vector_min_width: f64,
    pub vector_scale: f64,
    pub model_offset_x: f64,
    pub model_min_width: f64,
    pub model_scale: f64,
    pub output_offset_x: f64,
    pub left_vector_scale: f64,
    pub left_vector_height: f64,
    pub left_vector_gap: f64,
    pub min_height: f64,
    pub height_multiplier: f64,
}

impl Default for WideLayout {
    fn default() -> Self {
        Self {
            margin: 20.0,
            img_scale: 0.22,
            max_img_width: 240.0,
            aspect: 0.66,
            img_y: 0.38,
            caption_height: 45.0,
            caption_spacing: 12.0,
            rewards_offset_x: 100.0,
            rewards_offset_y: -12.0,
            rewards_min_width: 160.0,
            rewards_scale: 0.16,
            vector_offset_x: 50.0,
            vector_min_width: 120.0,
            vector_scale: 0.12,
            model_offset_x: 60.0,
            model_min_width: 200.0,
            model_scale: 0.19,
            output_offset_x: 60.0,
            left_vector_scale: 0.85,
            left_vector_height: 65.0,
            left_vector_gap: 50.0,
            min_height: 400.0,
            height_multiplier: 0.45,
        }
    }
}
