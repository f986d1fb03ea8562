//! Smooth 2D noise normalized to `[0, 1]`.

use noise::{NoiseFn, Perlin, Seedable};

/// Seeded coherent-noise sampler.
///
/// Perlin output is roughly `[-1, 1]`; it is remapped and clamped so callers
/// can treat samples as a blend weight.
#[derive(Clone)]
pub struct NoiseField {
    perlin: Perlin,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(1).set_seed(seed),
        }
    }

    /// Sample at `(x, y)`, returning a value in `[0, 1]`.
    #[inline]
    pub fn sample01(&self, x: f64, y: f64) -> f64 {
        (self.perlin.get([x, y]) * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    /// Sample remapped to `[-1, 1]`.
    #[inline]
    pub fn sample_signed(&self, x: f64, y: f64) -> f64 {
        (self.sample01(x, y) - 0.5) * 2.0
    }
}
