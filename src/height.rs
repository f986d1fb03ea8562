//! Height field synthesis and slope limiting.
//!
//! Land cells get gentle rolling terrain from a single octave of coherent
//! noise; the safe core is flattened further and void cells sit at exactly
//! zero. A fixed number of Gauss-Seidel relaxation passes then pulls
//! neighboring land cells to within `max_neighbor_delta` of each other.
//! The relaxation is a heuristic: with too few passes some pairs can keep a
//! larger delta, which [`slope_violations`] reports.

use rand::Rng;

use crate::biome::BiomeKind;
use crate::noise_field::NoiseField;
use crate::params::WorldParams;
use crate::seeds::WorldSeeds;
use crate::tilemap::Tilemap;

/// Elevation multiplier applied inside the safe core.
pub const SAFE_FLATTEN: f64 = 0.35;
/// Range of the random noise-space offset drawn per run.
const OFFSET_RANGE: f64 = 10_000.0;

/// Fill a fresh height field from noise. Void cells are exactly zero.
pub fn synthesize_heights(
    biomes: &Tilemap<BiomeKind>,
    params: &WorldParams,
    seeds: &WorldSeeds,
) -> Tilemap<f64> {
    let mut rng = WorldSeeds::rng(seeds.terrain);
    let field = NoiseField::new(WorldSeeds::noise_seed(seeds.terrain));
    let ox = rng.gen_range(-OFFSET_RANGE..OFFSET_RANGE);
    let oz = rng.gen_range(-OFFSET_RANGE..OFFSET_RANGE);

    let mut heights = Tilemap::new_with(biomes.width, biomes.height, 0.0f64);
    for (x, z, h) in heights.iter_mut() {
        let kind = *biomes.get(x, z);
        if kind.is_void() {
            *h = 0.0;
            continue;
        }

        let wx = (x as f64 * params.cell_size + ox) / params.noise_scale;
        let wz = (z as f64 * params.cell_size + oz) / params.noise_scale;
        let mut elevation = field.sample_signed(wx, wz) * params.height_amplitude;

        if kind == BiomeKind::Safe {
            elevation *= SAFE_FLATTEN;
        }
        *h = elevation;
    }

    heights
}

/// Relax the height field so adjacent land cells differ by at most
/// `max_delta`.
///
/// Each pass walks every land cell and clamps its four land neighbors
/// toward it. Writes land immediately, so later cells in the same pass see
/// already-relaxed values. Void cells are never touched.
pub fn limit_slopes(
    biomes: &Tilemap<BiomeKind>,
    heights: &mut Tilemap<f64>,
    max_delta: f64,
    iterations: u32,
) {
    for _ in 0..iterations {
        for z in 0..heights.height {
            for x in 0..heights.width {
                if biomes.get(x, z).is_void() {
                    continue;
                }
                let h = *heights.get(x, z);
                let neighbors: [(i32, i32); 4] = [
                    (x as i32 - 1, z as i32),
                    (x as i32 + 1, z as i32),
                    (x as i32, z as i32 - 1),
                    (x as i32, z as i32 + 1),
                ];
                for (nx, nz) in neighbors {
                    clamp_neighbor(biomes, heights, nx, nz, h, max_delta);
                }
            }
        }
    }
}

fn clamp_neighbor(
    biomes: &Tilemap<BiomeKind>,
    heights: &mut Tilemap<f64>,
    nx: i32,
    nz: i32,
    h: f64,
    max_delta: f64,
) {
    if !heights.in_bounds(nx, nz) {
        return;
    }
    let (nx, nz) = (nx as usize, nz as usize);
    if biomes.get(nx, nz).is_void() {
        return;
    }
    let nh = heights.get_mut(nx, nz);
    *nh = nh.clamp(h - max_delta, h + max_delta);
}

/// Residual slope violations left after relaxation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlopeReport {
    /// Adjacent land pairs checked
    pub pairs_checked: usize,
    /// Pairs whose delta exceeds the bound by more than epsilon
    pub violations: usize,
    /// Largest amount by which any pair exceeds the bound
    pub max_excess: f64,
}

impl SlopeReport {
    pub fn is_clean(&self) -> bool {
        self.violations == 0
    }
}

/// Count adjacent land pairs whose height delta exceeds `max_delta + epsilon`.
pub fn slope_violations(
    biomes: &Tilemap<BiomeKind>,
    heights: &Tilemap<f64>,
    max_delta: f64,
    epsilon: f64,
) -> SlopeReport {
    let mut report = SlopeReport::default();

    for z in 0..heights.height {
        for x in 0..heights.width {
            if biomes.get(x, z).is_void() {
                continue;
            }
            let h = *heights.get(x, z);
            // right and up neighbors only, so each pair is visited once
            for (nx, nz) in [(x + 1, z), (x, z + 1)] {
                if nx >= heights.width || nz >= heights.height || biomes.get(nx, nz).is_void() {
                    continue;
                }
                report.pairs_checked += 1;
                let excess = (h - *heights.get(nx, nz)).abs() - max_delta;
                if excess > epsilon {
                    report.violations += 1;
                }
                report.max_excess = report.max_excess.max(excess);
            }
        }
    }

    report
}

/// Largest absolute height delta between a cell and its four neighbors,
/// with neighbors clamped onto the grid at the edges.
pub fn local_slope(heights: &Tilemap<f64>, x: usize, z: usize) -> f64 {
    let h = *heights.get(x, z);
    let (x, z) = (x as i32, z as i32);
    [(x - 1, z), (x + 1, z), (x, z - 1), (x, z + 1)]
        .into_iter()
        .map(|(nx, nz)| (heights.get_clamped(nx, nz) - h).abs())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn land(width: usize, height: usize) -> Tilemap<BiomeKind> {
        Tilemap::new_with(width, height, BiomeKind::Neutral)
    }

    #[test]
    fn test_void_cells_are_zero() {
        let mut biomes = land(32, 32);
        for x in 0..32 {
            biomes.set(x, 0, BiomeKind::Void);
            biomes.set(x, 31, BiomeKind::Void);
        }
        let params = WorldParams { height_amplitude: 10.0, noise_scale: 10.0, ..Default::default() };
        let heights = synthesize_heights(&biomes, &params, &WorldSeeds::from_master(3));

        for (x, z, &b) in biomes.iter() {
            if b.is_void() {
                assert_eq!(*heights.get(x, z), 0.0);
            } else {
                assert!(heights.get(x, z).abs() <= params.height_amplitude);
            }
        }
    }

    #[test]
    fn test_safe_cells_are_flattened() {
        let params = WorldParams { height_amplitude: 5.0, noise_scale: 20.0, ..Default::default() };
        let seeds = WorldSeeds::from_master(8);
        let neutral = synthesize_heights(&land(16, 16), &params, &seeds);
        let safe = synthesize_heights(&Tilemap::new_with(16, 16, BiomeKind::Safe), &params, &seeds);

        for (x, z, &h) in neutral.iter() {
            assert!((safe.get(x, z) - h * SAFE_FLATTEN).abs() < 1e-12);
        }
    }

    #[test]
    fn test_limit_slopes_flattens_a_spike() {
        let biomes = land(9, 9);
        let mut heights = Tilemap::new_with(9, 9, 0.0f64);
        heights.set(4, 4, 10.0);

        limit_slopes(&biomes, &mut heights, 0.5, 6);

        let report = slope_violations(&biomes, &heights, 0.5, 1e-9);
        assert!(report.is_clean(), "{:?}", report);
        assert!(report.pairs_checked == 2 * 8 * 9);
    }

    #[test]
    fn test_limit_slopes_ignores_void() {
        let mut biomes = land(3, 1);
        biomes.set(1, 0, BiomeKind::Void);
        let mut heights = Tilemap::new_with(3, 1, 0.0f64);
        heights.set(0, 0, 5.0);

        limit_slopes(&biomes, &mut heights, 0.1, 6);
        assert_eq!(*heights.get(0, 0), 5.0);
        assert_eq!(*heights.get(1, 0), 0.0);
        assert_eq!(*heights.get(2, 0), 0.0);
    }

    #[test]
    fn test_residuals_reported_until_relaxed() {
        let biomes = land(12, 1);
        let mut heights = Tilemap::new_with(12, 1, 0.0f64);
        for x in 0..12 {
            heights.set(x, 0, -(x as f64) * 2.0);
        }

        limit_slopes(&biomes, &mut heights, 0.1, 0);
        let before = slope_violations(&biomes, &heights, 0.1, 1e-9);
        assert_eq!(before.violations, 11);
        assert!((before.max_excess - 1.9).abs() < 1e-9);

        // a forward sweep settles a 1D ramp in one pass
        limit_slopes(&biomes, &mut heights, 0.1, 1);
        let after = slope_violations(&biomes, &heights, 0.1, 1e-9);
        assert!(after.is_clean(), "{:?}", after);
        assert!((*heights.get(11, 0) + 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_local_slope_clamps_at_edges() {
        let mut heights = Tilemap::new_with(3, 3, 1.0f64);
        heights.set(1, 0, 1.25);
        assert!((local_slope(&heights, 0, 0) - 0.25).abs() < 1e-12);
        assert!((local_slope(&heights, 2, 2)).abs() < 1e-12);
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let params = WorldParams::small();
        let biomes = land(params.width, params.height);
        let a = synthesize_heights(&biomes, &params, &WorldSeeds::from_master(77));
        let b = synthesize_heights(&biomes, &params, &WorldSeeds::from_master(77));
        assert_eq!(a, b);
    }
}
