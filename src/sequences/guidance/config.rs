use crate::{
    animation::{ease::Ease, window::Window},
    effects::noise::NoiseParams,
    foundation::error::{ChoreoError, ChoreoResult},
    sequences::guidance::GuidanceStage,
    timeline::stage::Stage,
};

/// Tunables of the guidance sequence. Every field has a default, so a JSON
/// file only needs the values it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    /// Containers narrower than this use the stacked layout.
    pub breakpoint_width: f64,
    pub stages: Vec<Stage<GuidanceStage>>,
    pub easing: Ease,
    pub noise: NoiseParams,
    /// Grain mix weight of the noisy input image.
    pub input_noise: f64,
    pub reward_count: usize,
    /// Bar height of every channel in the high-score vector.
    pub s_plus_value: f64,
    /// Bar height of every channel in the low-score vector.
    pub s_minus_value: f64,
    pub text: GuidanceText,
    pub images: GuidanceImages,
    pub narrow: NarrowLayout,
    pub wide: WideLayout,
    pub windows: GuidanceWindows,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        use GuidanceStage::*;
        Self {
            breakpoint_width: 700.0,
            stages: vec![
                Stage::new(SPlusInput, 300.0),
                Stage::new(SMinusInput, 300.0),
                Stage::new(ImageCaptionInput, 300.0),
                Stage::new(SPlusToModel, 1500.0),
                Stage::new(ProcessSPlus, 1500.0),
                Stage::new(HighOutput, 1000.0),
                Stage::new(SMinusToModel, 1500.0),
                Stage::new(ProcessSMinus, 1500.0),
                Stage::new(LowOutput, 1000.0),
                Stage::new(Regroup, 1000.0),
                Stage::new(Subtraction, 2500.0),
                Stage::new(ApplyGuidance, 3000.0),
                Stage::new(Final, 1500.0),
                Stage::new(Hold, 5000.0),
            ],
            easing: Ease::InOutCubic,
            noise: NoiseParams::default(),
            input_noise: 0.9,
            reward_count: 7,
            s_plus_value: 1.0,
            s_minus_value: 0.1,
            text: GuidanceText::default(),
            images: GuidanceImages::default(),
            narrow: NarrowLayout::default(),
            wide: WideLayout::default(),
            windows: GuidanceWindows::default(),
        }
    }
}

impl GuidanceConfig {
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
        if !(0.0..=1.0).contains(&self.input_noise) {
            return Err(ChoreoError::validation("input_noise must be in [0, 1]"));
        }
        self.noise.validate()?;
        self.windows.validate()?;
        Ok(self)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GuidanceText {
    pub caption: String,
    pub model_name: String,
    pub guided_output: String,
    pub final_title: String,
    pub compute_high: String,
    pub compute_low: String,
    pub compute_guidance: String,
    pub update_velocity: String,
}

impl Default for GuidanceText {
    fn default() -> Self {
        Self {
            caption: "\"a scenic volcano\"".to_owned(),
            model_name: "MIRO".to_owned(),
            guided_output: "Guided Output".to_owned(),
            final_title: "\u{2713} Guided Denoising Step".to_owned(),
            compute_high: "Computing the velocity for high scores".to_owned(),
            compute_low: "Computing the velocity for low scores".to_owned(),
            compute_guidance: "Computing the higher reward guidance direction".to_owned(),
            update_velocity: "Updating the next step velocity".to_owned(),
        }
    }
}

/// Asset keys, relative to the asset root.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GuidanceImages {
    pub input: String,
    pub high: String,
    pub low: String,
    pub final_output: String,
}

impl Default for GuidanceImages {
    fn default() -> Self {
        let dir = "assets/images/inference_pipeline_animation";
        Self {
            input: format!("{dir}/previous_aesthetics.jpg"),
            high: format!("{dir}/high_aesthetics.jpg"),
            low: format!("{dir}/low_aesthetic.jpg"),
            final_output: format!("{dir}/next_aesthetics.jpg"),
        }
    }
}

impl GuidanceImages {
    pub fn keys(&self) -> [&str; 4] {
        [&self.input, &self.high, &self.low, &self.final_output]
    }
}

/// Stacked layout constants; scales are fractions of the surface width.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NarrowLayout {
    pub img_scale: f64,
    pub caption_scale: f64,
    pub caption_height: f64,
    pub s_vector_scale: f64,
    pub s_vector_height: f64,
    pub model_scale: f64,
    pub model_height: f64,
    pub start_y: f64,
    pub img_to_caption: f64,
    pub caption_to_vector: f64,
    pub vector_to_model: f64,
    pub model_to_output: f64,
    pub between_outputs: f64,
    pub min_height: f64,
    pub height_multiplier: f64,
    pub guidance_scale: f64,
    pub guidance_start_y: f64,
    pub label_space: f64,
    pub subtraction_spacing: f64,
    pub apply_spacing_top: f64,
    pub apply_spacing_bottom: f64,
    pub final_center_offset: f64,
}

impl Default for NarrowLayout {
    fn default() -> Self {
        Self {
            img_scale: 0.35,
            caption_scale: 0.7,
            caption_height: 40.0,
            s_vector_scale: 0.45,
            s_vector_height: 50.0,
            model_scale: 0.6,
            model_height: 100.0,
            start_y: 40.0,
            img_to_caption: 15.0,
            caption_to_vector: 15.0,
            vector_to_model: 50.0,
            model_to_output: 50.0,
            between_outputs: 70.0,
            min_height: 500.0,
            height_multiplier: 3.0,
            guidance_scale: 0.7,
            guidance_start_y: 60.0,
            label_space: 50.0,
            subtraction_spacing: 50.0,
            apply_spacing_top: 70.0,
            apply_spacing_bottom: 80.0,
            final_center_offset: -60.0,
        }
    }
}

/// Side-by-side layout constants.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WideLayout {
    pub max_width: f64,
    pub height_ratio: f64,
    pub min_height: f64,
    pub model_width: f64,
    pub model_height: f64,
    pub img_size: f64,
    /// Input column center as a fraction of the width.
    pub input_x: f64,
    /// Input top as a fraction of the height.
    pub start_y: f64,
    pub caption_spacing: f64,
    pub caption_height: f64,
    pub s_vector_width: f64,
    pub s_vector_height: f64,
    pub s_vector_spacing: f64,
    pub output_offset_x: f64,
    pub output_offset_y: f64,
    pub guidance_scale: f64,
    pub margin: f64,
    /// Gap between the regrouped outputs as a fraction of the width.
    pub regroup_spacing: f64,
    pub subtraction_spacing: f64,
}

impl Default for WideLayout {
    fn default() -> Self {
        Self {
            max_width: 1200.0,
            height_ratio: 0.4,
            min_height: 450.0,
            model_width: 180.0,
            model_height: 140.0,
            img_size: 100.0,
            input_x: 0.15,
            start_y: 0.2,
            caption_spacing: 12.0,
            caption_height: 40.0,
            s_vector_width: 110.0,
            s_vector_height: 50.0,
            s_vector_spacing: 15.0,
            output_offset_x: 30.0,
            output_offset_y: 35.0,
            guidance_scale: 0.8,
            margin: 20.0,
            regroup_spacing: 0.45,
            subtraction_spacing: 0.22,
        }
    }
}

/// Progress sub-windows of the subtraction and guidance stages.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GuidanceWindows {
    pub regroup_move: Window,
    pub subtract_move: Window,
    pub subtract_minus: Window,
    pub subtract_highlight: Window,
    pub subtract_arrow: Window,
    pub subtract_vector: Window,
    pub apply_move: Window,
    pub apply_plus: Window,
    pub apply_highlight: Window,
    pub apply_arrow: Window,
    pub apply_output: Window,
    pub apply_formula: Window,
    pub final_fade: Window,
    pub final_label: Window,
}

impl Default for GuidanceWindows {
    fn default() -> Self {
        Self {
            regroup_move: Window::new(0.0, 0.5),
            subtract_move: Window::new(0.0, 0.3),
            subtract_minus: Window::new(0.0, 0.3),
            subtract_highlight: Window::new(0.2, 0.5),
            subtract_arrow: Window::new(0.3, 0.7),
            subtract_vector: Window::new(0.5, 1.0),
            apply_move: Window::new(0.0, 0.25),
            apply_plus: Window::new(0.15, 0.45),
            apply_highlight: Window::new(0.15, 0.45),
            apply_arrow: Window::new(0.4, 0.7),
            apply_output: Window::new(0.5, 1.0),
            apply_formula: Window::new(0.7, 1.0),
            final_fade: Window::new(0.0, 0.3),
            final_label: Window::new(0.3, 1.0),
        }
    }
}

impl GuidanceWindows {
    pub fn validate(self) -> ChoreoResult<Self> {
        for w in [
            self.regroup_move,
            self.subtract_move,
            self.subtract_minus,
            self.subtract_highlight,
            self.subtract_arrow,
            self.subtract_vector,
            self.apply_move,
            self.apply_plus,
            self.apply_highlight,
            self.apply_arrow,
            self.apply_output,
            self.apply_formula,
            self.final_fade,
            self.final_label,
        ] {
            w.validate()?;
        }
        Ok(self)
    }
}
