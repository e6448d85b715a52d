use std::{collections::BTreeMap, ops::RangeInclusive};

use crate::foundation::error::{ChoreoError, ChoreoResult};

/// Per-frame reward weights loaded from `frame,r1,..,rN` CSV text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RewardTable {
    rows: BTreeMap<usize, Vec<f64>>,
    fallback: Vec<f64>,
}

impl RewardTable {
    /// Neutral value returned for every reward of a frame with no row.
    pub const NEUTRAL: f64 = 0.5;

    /// Empty table: every lookup yields `num_rewards` neutral values.
    pub fn neutral(num_rewards: usize) -> Self {
        Self {
            rows: BTreeMap::new(),
            fallback: vec![Self::NEUTRAL; num_rewards],
        }
    }

    /// Parse CSV text. The first line is a header and is skipped; blank lines
    /// are ignored. Rows may appear in any order but must carry exactly
    /// `num_rewards` values.
    pub fn parse(text: &str, num_rewards: usize) -> ChoreoResult<Self> {
        let mut table = Self::neutral(num_rewards);
        for (line_no, line) in text.trim().lines().enumerate().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut cells = line.split(',').map(str::trim);
            let frame: usize = cells
                .next()
                .and_then(|c| c.parse().ok())
                .ok_or_else(|| {
                    ChoreoError::asset(format!("reward csv line {}: bad frame index", line_no + 1))
                })?;
            let values = cells
                .map(|c| {
                    c.parse::<f64>().map_err(|_| {
                        ChoreoError::asset(format!(
                            "reward csv line {}: bad value {c:?}",
                            line_no + 1
                        ))
                    })
                })
                .collect::<ChoreoResult<Vec<_>>>()?;
            if values.len() != num_rewards {
                return Err(ChoreoError::asset(format!(
                    "reward csv line {}: expected {num_rewards} values, got {}",
                    line_no + 1,
                    values.len()
                )));
            }
            table.rows.insert(frame, values);
        }
        Ok(table)
    }

    pub fn from_path(path: &std::path::Path, num_rewards: usize) -> ChoreoResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ChoreoError::asset(format!("read {}: {e}", path.display())))?;
        Self::parse(&text, num_rewards)
    }

    /// Rewards for `frame`, or the neutral row when the frame is absent.
    pub fn rewards(&self, frame: usize) -> &[f64] {
        self.rows.get(&frame).map_or(&self.fallback, Vec::as_slice)
    }

    /// Number of frames with a row.
    pub fn frame_count(&self) -> usize {
        self.rows.len()
    }
}

/// Frames to keep loaded around `center`: `radius` on each side, clipped to
/// `[0, total)`. Returns `None` for an empty sequence.
pub fn frame_window(center: usize, radius: usize, total: usize) -> Option<RangeInclusive<usize>> {
    if total == 0 {
        return None;
    }
    let center = center.min(total - 1);
    Some(center.saturating_sub(radius)..=(center + radius).min(total - 1))
}

/// File name of scrubber frame `index`, e.g. `frame_0042.jpg`.
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{index:04}.jpg")
}

#[cfg(test)]
#[path = "../../tests/unit/assets/rewards.rs"]
mod tests;
