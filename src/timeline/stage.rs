use crate::foundation::error::{ChoreoError, ChoreoResult};

/// Identifier of one stage in a sequence.
///
/// Sequences use small `Copy` enums; `&'static str` works for ad-hoc timelines.
pub trait StageId: Copy + Eq + std::fmt::Debug + 'static {
    fn name(self) -> &'static str;
}

impl StageId for &'static str {
    fn name(self) -> &'static str {
        self
    }
}

/// A named, fixed-duration segment of a looping timeline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stage<S> {
    pub id: S,
    pub duration_ms: f64,
}

impl<S> Stage<S> {
    pub const fn new(id: S, duration_ms: f64) -> Self {
        Self { id, duration_ms }
    }
}

/// Where a wrapped elapsed time falls inside the timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageSample<S> {
    /// Position of the stage in declaration order.
    pub index: usize,
    pub stage: S,
    /// Linear progress within the stage, in `[0, 1)`.
    pub raw_progress: f64,
    /// Number of completed loops before this sample.
    pub lap: u64,
}

const PROGRESS_MAX: f64 = 1.0 - f64::EPSILON;

/// Ordered, non-empty list of stages with strictly positive durations.
#[derive(Clone, Debug)]
pub struct Timeline<S> {
    stages: Vec<Stage<S>>,
    total_ms: f64,
}

impl<S: StageId> Timeline<S> {
    pub fn new(stages: Vec<Stage<S>>) -> ChoreoResult<Self> {
        if stages.is_empty() {
            return Err(ChoreoError::timeline("timeline must contain at least one stage"));
        }
        for s in &stages {
            if !s.duration_ms.is_finite() || s.duration_ms <= 0.0 {
                return Err(ChoreoError::timeline(format!(
                    "stage {:?} must have a finite positive duration, got {}",
                    s.id, s.duration_ms
                )));
            }
        }
        let total_ms = stages.iter().map(|s| s.duration_ms).sum();
        Ok(Self { stages, total_ms })
    }

    pub fn total_ms(&self) -> f64 {
        self.total_ms
    }

    pub fn stages(&self) -> &[Stage<S>] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Start offset of the stage at `index` within one loop.
    pub fn start_of(&self, index: usize) -> Option<f64> {
        (index < self.stages.len())
            .then(|| self.stages[..index].iter().map(|s| s.duration_ms).sum())
    }

    /// Map elapsed time onto `(stage, progress)`, looping unconditionally.
    pub fn sample(&self, elapsed_ms: f64) -> StageSample<S> {
        let lap = if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            (elapsed_ms / self.total_ms).floor() as u64
        } else {
            0
        };
        let t = elapsed_ms.rem_euclid(self.total_ms);

        let mut acc = 0.0;
        for (index, s) in self.stages.iter().enumerate() {
            if t < acc + s.duration_ms {
                let raw = ((t - acc) / s.duration_ms).clamp(0.0, PROGRESS_MAX);
                return StageSample {
                    index,
                    stage: s.id,
                    raw_progress: raw,
                    lap,
                };
            }
            acc += s.duration_ms;
        }

        // Drift past the last interval (or a non-finite input) heals to the start.
        StageSample {
            index: 0,
            stage: self.stages[0].id,
            raw_progress: 0.0,
            lap,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/stage.rs"]
mod tests;
