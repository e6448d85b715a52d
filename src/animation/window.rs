use crate::foundation::error::{ChoreoError, ChoreoResult};

/// A `[start, end]` slice of a stage's progress.
///
/// Several elements animate inside one stage by each reading its own window
/// from the single shared progress value, which keeps them synchronized
/// without per-element timers.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Window {
    pub start: f64,
    pub end: f64,
}

impl Window {
    pub const FULL: Self = Self::new(0.0, 1.0);

    /// Unchecked constructor for compile-time constants; see [`Window::validate`].
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Window that starts at `start` and lasts `len`.
    pub const fn span(start: f64, len: f64) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub fn validate(self) -> ChoreoResult<Self> {
        if !(self.start.is_finite() && self.end.is_finite()) || self.start >= self.end {
            return Err(ChoreoError::validation(format!(
                "sub-window must satisfy start < end, got [{}, {}]",
                self.start, self.end
            )));
        }
        Ok(self)
    }

    /// `clamp((p - start) / (end - start), 0, 1)`.
    pub fn progress(self, p: f64) -> f64 {
        let v = (p - self.start) / (self.end - self.start);
        if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
    }

    pub fn contains(self, p: f64) -> bool {
        self.start <= p && p <= self.end
    }
}

/// `min(1, p * rate)`: a fade-in that completes after `1 / rate` of the stage.
pub fn fade_in(p: f64, rate: f64) -> f64 {
    (p * rate).clamp(0.0, 1.0)
}

/// Fade-out that starts at `start` and falls at `rate` per unit of progress.
pub fn fade_out_after(p: f64, start: f64, rate: f64) -> f64 {
    (1.0 - (p - start).max(0.0) * rate).clamp(0.0, 1.0)
}

/// Fade in over the first half, hold, fade out over the second half.
pub fn fade_in_out(p: f64) -> f64 {
    if p < 0.5 {
        fade_in(p, 2.0)
    } else {
        fade_out_after(p, 0.5, 2.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/window.rs"]
mod tests;
