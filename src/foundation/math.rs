use crate::foundation::core::{Point, Rect, Vec2};

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

pub fn lerp_point(a: Point, b: Point, t: f64) -> Point {
    Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Interpolates origin and size independently.
pub fn lerp_rect(a: Rect, b: Rect, t: f64) -> Rect {
    Rect::from_origin_size(
        lerp_point(a.origin(), b.origin(), t),
        (lerp(a.width(), b.width(), t), lerp(a.height(), b.height(), t)),
    )
}

/// Rect from its top-left corner and size, without normalizing.
pub fn rect_xywh(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x, y, x + w, y + h)
}

/// Rect of `size` centered on `center`.
pub fn rect_centered(center: Point, size: Vec2) -> Rect {
    Rect::from_center_size(center, (size.x, size.y))
}

/// Rect scaled by `s` around its own center.
pub fn scale_about_center(r: Rect, s: f64) -> Rect {
    Rect::from_center_size(r.center(), (r.width() * s, r.height() * s))
}

#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        // SplitMix64
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Standard normal sample (Box-Muller).
    pub fn next_gaussian(&mut self) -> f64 {
        let u1 = self.next_f64_01().max(f64::MIN_POSITIVE);
        let u2 = self.next_f64_01();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

fn lattice01(seed: u64, x: u64) -> f64 {
    let mut rng = Rng64::new(seed ^ x.wrapping_mul(0xD6E8_FEB8_6659_FD93));
    rng.next_f64_01()
}

/// Smooth 1-D value noise in `[0, 1]`; `x` is expected to be non-negative.
pub fn value_noise(seed: u64, x: f64) -> f64 {
    let x = x.max(0.0);
    let i0 = x.floor();
    let t = x - i0;
    let s = t * t * (3.0 - 2.0 * t);
    let i0u = i0 as u64;
    lerp(lattice01(seed, i0u), lattice01(seed, i0u + 1), s)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
