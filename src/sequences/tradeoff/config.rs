use crate::{
    animation::ease::Ease,
    foundation::{
        core::Rgba8,
        error::{ChoreoError, ChoreoResult},
    },
    sequences::tradeoff::TradeoffStage,
    timeline::stage::Stage,
};

/// Tunables of the reward trade-off scrubber.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TradeoffConfig {
    pub breakpoint_width: f64,
    /// Pause on the first frame, and again on the last one.
    pub hold_ms: f64,
    pub frame_ms: f64,
    pub frame_count: usize,
    pub easing: Ease,
    /// Reward names in CSV column order; their count is the bar count.
    pub reward_names: Vec<String>,
    pub reward_colors: Vec<Rgba8>,
    /// Directory holding `frame_NNNN.jpg`, relative to the asset root.
    pub frames_dir: String,
    pub rewards_csv: String,
    /// Frames kept loaded on each side of the current one.
    pub prefetch_radius: usize,
    /// Loaded frames further than this outside the prefetch window are dropped.
    pub evict_margin: usize,
    pub text: TradeoffText,
    pub narrow: NarrowLayout,
    pub wide: WideLayout,
}

impl Default for TradeoffConfig {
    fn default() -> Self {
        let dir = "assets/images/random_walk_output";
        Self {
            breakpoint_width: 700.0,
            hold_ms: 2000.0,
            frame_ms: 200.0,
            frame_count: 200,
            easing: Ease::Linear,
            reward_names: ["CLIP", "Aesthetic", "ImageReward", "PickScore", "HPSv2", "VQA", "SciScore"]
                .map(str::to_owned)
                .to_vec(),
            reward_colors: vec![
                Rgba8::rgb(80, 210, 200),
                Rgba8::rgb(105, 200, 105),
                Rgba8::rgb(255, 105, 120),
                Rgba8::rgb(255, 150, 220),
                Rgba8::rgb(100, 150, 255),
                Rgba8::rgb(230, 210, 80),
                Rgba8::rgb(200, 105, 230),
            ],
            frames_dir: dir.to_owned(),
            rewards_csv: format!("{dir}/uncoherence_values.csv"),
            prefetch_radius: 5,
            evict_margin: 10,
            text: TradeoffText::default(),
            narrow: NarrowLayout::default(),
            wide: WideLayout::default(),
        }
    }
}

impl TradeoffConfig {
    pub fn from_json_str(s: &str) -> ChoreoResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()
    }

    pub fn validate(self) -> ChoreoResult<Self> {
        if !(self.breakpoint_width.is_finite() && self.breakpoint_width > 0.0) {
            return Err(ChoreoError::validation("breakpoint_width must be positive"));
        }
        if self.frame_count == 0 {
            return Err(ChoreoError::validation("frame_count must be at least 1"));
        }
        if self.reward_names.is_empty() {
            return Err(ChoreoError::validation("reward_names must not be empty"));
        }
        if self.reward_colors.is_empty() {
            return Err(ChoreoError::validation("reward_colors must not be empty"));
        }
        Ok(self)
    }

    pub fn reward_count(&self) -> usize {
        self.reward_names.len()
    }

    /// Hold, scrub through every frame, hold.
    pub fn stages(&self) -> Vec<Stage<TradeoffStage>> {
        vec![
            Stage::new(TradeoffStage::HoldStart, self.hold_ms),
            Stage::new(TradeoffStage::Scrub, self.frame_ms * self.frame_count as f64),
            Stage::new(TradeoffStage::HoldEnd, self.hold_ms),
        ]
    }

    /// Asset key of scrubber frame `index`.
    pub fn frame_key(&self, index: usize) -> String {
        format!(
            "{}/{}",
            self.frames_dir.trim_end_matches('/'),
            crate::assets::rewards::frame_file_name(index)
        )
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TradeoffText {
    pub prompt_label: String,
    pub caption: String,
    pub model_name: String,
    pub output_label: String,
    pub phase: String,
}

impl Default for TradeoffText {
    fn default() -> Self {
        Self {
            prompt_label: "prompt".to_owned(),
            caption: "\"a scenic volcano\"".to_owned(),
            model_name: "MIRO".to_owned(),
            output_label: "Generated Output".to_owned(),
            phase: "Adjusting reward weights in real-time".to_owned(),
        }
    }
}

/// Stacked layout: prompt, histogram, model, output.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NarrowLayout {
    pub margin: f64,
    pub prompt_height: f64,
    pub model_width: f64,
    pub model_height: f64,
    pub vector_width: f64,
    pub vector_height: f64,
    pub output_size: f64,
    pub prompt_to_vector: f64,
    pub vector_to_model: f64,
    pub model_to_output: f64,
    pub min_height: f64,
    pub height_multiplier: f64,
}

impl Default for NarrowLayout {
    fn default() -> Self {
        Self {
            margin: 20.0,
            prompt_height: 50.0,
            model_width: 160.0,
            model_height: 100.0,
            vector_width: 140.0,
            vector_height: 120.0,
            output_size: 140.0,
            prompt_to_vector: 30.0,
            vector_to_model: 50.0,
            model_to_output: 50.0,
            min_height: 600.0,
            height_multiplier: 2.0,
        }
    }
}

/// Side-by-side layout: histogram, model, output around the vertical center.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WideLayout {
    pub margin: f64,
    pub model_width: f64,
    pub model_height: f64,
    pub vector_width: f64,
    pub vector_height: f64,
    pub output_size: f64,
    pub spacing: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub height_ratio: f64,
}

impl Default for WideLayout {
    fn default() -> Self {
        Self {
            margin: 40.0,
            model_width: 200.0,
            model_height: 120.0,
            vector_width: 180.0,
            vector_height: 180.0,
            output_size: 200.0,
            spacing: 80.0,
            max_width: 1200.0,
            min_height: 400.0,
            height_ratio: 0.5,
        }
    }
}
