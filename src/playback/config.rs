use crate::foundation::error::{ChoreoError, ChoreoResult};

/// Options controlling how a [`super::controller::PlaybackController`]
/// reacts to host signals.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Visible fraction of the element at or above which playback starts.
    pub visibility_threshold: f64,
    /// Largest wall-clock step a single tick may advance; longer gaps (a
    /// stalled tab) are absorbed by shifting the clock origin.
    pub max_step_ms: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: 0.35,
            max_step_ms: 250.0,
        }
    }
}

impl PlaybackConfig {
    pub fn from_json_str(s: &str) -> ChoreoResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()
    }

    pub fn validate(self) -> ChoreoResult<Self> {
        if !(self.visibility_threshold > 0.0 && self.visibility_threshold <= 1.0) {
            return Err(ChoreoError::validation(
                "visibility_threshold must be in (0, 1]",
            ));
        }
        if !(self.max_step_ms.is_finite() && self.max_step_ms > 0.0) {
            return Err(ChoreoError::validation("max_step_ms must be positive"));
        }
        Ok(self)
    }
}
