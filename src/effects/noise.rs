use rayon::prelude::*;

use crate::foundation::{
    core::Rect,
    error::{ChoreoError, ChoreoResult},
    math::{Rng64, clamp01},
};

/// Gaussian grain parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Standard deviation of the per-channel perturbation, in channel units.
    pub std_dev: f64,
    /// Largest share `k` of the output taken by noise (reached at mix weight 1).
    pub max_weight: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            std_dev: 80.0,
            max_weight: 0.4,
        }
    }
}

impl NoiseParams {
    pub fn validate(self) -> ChoreoResult<Self> {
        if !(self.std_dev.is_finite() && self.std_dev >= 0.0) {
            return Err(ChoreoError::validation("noise std_dev must be finite and >= 0"));
        }
        if !(0.0..=1.0).contains(&self.max_weight) {
            return Err(ChoreoError::validation("noise max_weight must be in [0, 1]"));
        }
        Ok(self)
    }
}

/// Blends images with freshly sampled Gaussian grain.
///
/// `out = (1 - k*m) * src + k*m * N(0, std_dev)` per RGB channel, clamped to
/// `[0, 255]`; alpha is left untouched. Every call draws new noise so a
/// sequence of frames reads as animated grain.
#[derive(Clone, Debug)]
pub struct NoiseCompositor {
    params: NoiseParams,
    rng: Rng64,
}

impl NoiseCompositor {
    pub fn new(params: NoiseParams, seed: u64) -> Self {
        Self {
            params,
            rng: Rng64::new(seed),
        }
    }

    pub fn params(&self) -> NoiseParams {
        self.params
    }

    /// Weight of the source image for a given mix weight.
    pub fn image_weight(&self, mix_weight: f64) -> f64 {
        1.0 - self.params.max_weight * clamp01(mix_weight)
    }

    /// Composite grain over `region` (image pixel space, `None` for all of it).
    pub fn blend(
        &mut self,
        src: &image::RgbaImage,
        region: Option<Rect>,
        mix_weight: f64,
    ) -> image::RgbaImage {
        let mut out = src.clone();
        let noise_weight = self.params.max_weight * clamp01(mix_weight);
        if noise_weight <= 0.0 || out.width() == 0 || out.height() == 0 {
            return out;
        }
        let image_weight = 1.0 - noise_weight;
        let std_dev = self.params.std_dev;

        let (w, h) = out.dimensions();
        let bounds = Rect::new(0.0, 0.0, f64::from(w), f64::from(h));
        let r = region.map_or(bounds, |r| r.intersect(bounds));
        let (x0, x1) = (r.x0.floor() as usize, r.x1.ceil() as usize);
        let (y0, y1) = (r.y0.floor() as usize, r.y1.ceil() as usize);
        if x0 >= x1 || y0 >= y1 {
            return out;
        }

        let frame_seed = self.rng.next_u64();
        let stride = w as usize * 4;
        let rows: &mut [u8] = &mut out;
        rows.par_chunks_mut(stride)
            .enumerate()
            .skip(y0)
            .take(y1 - y0)
            .for_each(|(y, row)| {
                let mut rng = Rng64::new(frame_seed ^ (y as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
                for px in row[x0 * 4..x1 * 4].chunks_exact_mut(4) {
                    for c in &mut px[..3] {
                        let n = rng.next_gaussian() * std_dev;
                        let v = image_weight * f64::from(*c) + noise_weight * n;
                        *c = v.round().clamp(0.0, 255.0) as u8;
                    }
                }
            });
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/noise.rs"]
mod tests;
