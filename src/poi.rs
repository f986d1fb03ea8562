//! Point-of-interest placement inside the combat zone.
//!
//! Rejection sampling: each requested slot draws random cells until one
//! passes every predicate or the slot's try budget runs out. Accepted cells
//! immediately count for the spacing of later slots. A slot that runs out
//! of tries is skipped, never retried with looser constraints.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::biome::BiomeKind;
use crate::height::local_slope;
use crate::params::WorldParams;
use crate::seeds::WorldSeeds;
use crate::tilemap::Tilemap;

/// Candidates keep this many cells away from the grid edge.
const SAMPLE_MARGIN: usize = 2;

/// One accepted POI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiCell {
    pub x: usize,
    pub z: usize,
    /// Prop variant chosen for the spawner
    pub variant: u32,
}

/// Outcome of a placement run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoiReport {
    pub requested: u32,
    /// Accepted cells in acceptance order
    pub placed: Vec<PoiCell>,
    /// Slot indices whose try budget ran out
    pub failed_slots: Vec<u32>,
}

impl PoiReport {
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    /// Requested slots that could not be placed.
    pub fn shortfall(&self) -> usize {
        self.requested as usize - self.placed.len()
    }
}

/// Constraints a candidate cell must satisfy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoiRules {
    pub min_spacing: u32,
    pub min_void_distance: u32,
    pub max_slope: f64,
}

impl PoiRules {
    pub fn from_params(params: &WorldParams) -> Self {
        Self {
            min_spacing: params.poi_min_distance_cells,
            min_void_distance: params.poi_min_distance_to_void_cells,
            max_slope: params.poi_max_slope,
        }
    }

    /// Whether `(x, z)` passes every predicate given the POIs accepted so far.
    pub fn accepts(
        &self,
        biomes: &Tilemap<BiomeKind>,
        heights: &Tilemap<f64>,
        placed: &[PoiCell],
        x: usize,
        z: usize,
    ) -> bool {
        *biomes.get(x, z) == BiomeKind::Combat
            && !(self.min_void_distance > 0 && is_near_void(biomes, x, z, self.min_void_distance))
            && local_slope(heights, x, z) <= self.max_slope
            && is_far_from_pois(placed, x, z, self.min_spacing)
    }
}

/// Place up to `combat_poi_count` POIs.
pub fn place_pois(
    biomes: &Tilemap<BiomeKind>,
    heights: &Tilemap<f64>,
    params: &WorldParams,
    seeds: &WorldSeeds,
) -> PoiReport {
    let mut rng = WorldSeeds::rng(seeds.pois);
    let rules = PoiRules::from_params(params);
    let mut report = PoiReport {
        requested: params.combat_poi_count,
        ..Default::default()
    };

    for slot in 0..params.combat_poi_count {
        let found = find_cell(biomes, heights, &rules, &report.placed, params.poi_tries_per_poi, &mut rng);
        match found {
            Some((x, z)) => {
                let variant = if params.poi_variant_count > 0 {
                    rng.gen_range(0..params.poi_variant_count)
                } else {
                    0
                };
                report.placed.push(PoiCell { x, z, variant });
            }
            None => {
                log::warn!(
                    "POI placement failed for slot {}; increase tries or relax constraints",
                    slot
                );
                report.failed_slots.push(slot);
            }
        }
    }

    log::info!("Placed {}/{} combat POIs", report.placed_count(), report.requested);
    report
}

fn find_cell(
    biomes: &Tilemap<BiomeKind>,
    heights: &Tilemap<f64>,
    rules: &PoiRules,
    placed: &[PoiCell],
    tries: u32,
    rng: &mut ChaCha8Rng,
) -> Option<(usize, usize)> {
    let x_max = biomes.width.checked_sub(SAMPLE_MARGIN)?;
    let z_max = biomes.height.checked_sub(SAMPLE_MARGIN)?;
    if x_max <= SAMPLE_MARGIN || z_max <= SAMPLE_MARGIN {
        return None;
    }

    (0..tries).find_map(|_| {
        let x = rng.gen_range(SAMPLE_MARGIN..x_max);
        let z = rng.gen_range(SAMPLE_MARGIN..z_max);
        rules.accepts(biomes, heights, placed, x, z).then_some((x, z))
    })
}

/// Whether any void cell lies in the square window of half-size `radius`.
pub fn is_near_void(biomes: &Tilemap<BiomeKind>, x: usize, z: usize, radius: u32) -> bool {
    biomes.window(x, z, radius).any(|(nx, nz)| biomes.get(nx, nz).is_void())
}

/// Whether `(x, z)` is at least `min_distance` cells from every placed POI.
pub fn is_far_from_pois(placed: &[PoiCell], x: usize, z: usize, min_distance: u32) -> bool {
    let min_d2 = min_distance as i64 * min_distance as i64;
    placed.iter().all(|p| {
        let dx = x as i64 - p.x as i64;
        let dz = z as i64 - p.z as i64;
        dx * dx + dz * dz >= min_d2
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combat_island(size: usize, margin: usize) -> Tilemap<BiomeKind> {
        let mut grid = Tilemap::new_with(size, size, BiomeKind::Void);
        for z in margin..size - margin {
            for x in margin..size - margin {
                grid.set(x, z, BiomeKind::Combat);
            }
        }
        grid
    }

    fn poi_params() -> WorldParams {
        WorldParams {
            combat_poi_count: 5,
            poi_min_distance_cells: 5,
            poi_min_distance_to_void_cells: 3,
            poi_max_slope: 0.1,
            poi_tries_per_poi: 500,
            ..Default::default()
        }
    }

    #[test]
    fn test_near_void_scan() {
        let grid = combat_island(20, 4);
        assert!(is_near_void(&grid, 5, 5, 2));
        assert!(!is_near_void(&grid, 10, 10, 5));
        assert!(is_near_void(&grid, 10, 10, 6));
        assert!(is_near_void(&grid, 10, 10, u32::MAX));
    }

    #[test]
    fn test_spacing_is_inclusive() {
        let placed = [PoiCell { x: 10, z: 10, variant: 0 }];
        assert!(is_far_from_pois(&placed, 13, 14, 5));
        assert!(!is_far_from_pois(&placed, 13, 13, 5));
        assert!(is_far_from_pois(&[], 0, 0, 100));
    }

    #[test]
    fn test_placed_pois_satisfy_rules() {
        let biomes = combat_island(40, 6);
        let heights = Tilemap::new_with(40, 40, 0.0f64);
        let params = poi_params();
        let report = place_pois(&biomes, &heights, &params, &WorldSeeds::from_master(21));

        assert!(report.placed_count() > 0);
        assert_eq!(report.placed_count() + report.failed_slots.len(), 5);
        for (i, p) in report.placed.iter().enumerate() {
            assert_eq!(*biomes.get(p.x, p.z), BiomeKind::Combat);
            assert!(!is_near_void(&biomes, p.x, p.z, 3));
            assert!(p.variant < params.poi_variant_count);
            assert!(is_far_from_pois(&report.placed[..i], p.x, p.z, 5));
            assert!(is_far_from_pois(&report.placed[i + 1..], p.x, p.z, 5));
        }
    }

    #[test]
    fn test_steep_terrain_rejects_everything() {
        let biomes = combat_island(30, 4);
        let mut heights = Tilemap::new_with(30, 30, 0.0f64);
        for (x, z, h) in heights.iter_mut() {
            *h = if (x + z) % 2 == 0 { 1.0 } else { 0.0 };
        }
        let report = place_pois(&biomes, &heights, &poi_params(), &WorldSeeds::from_master(4));
        assert_eq!(report.placed_count(), 0);
        assert_eq!(report.shortfall(), 5);
        assert_eq!(report.failed_slots, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_tiny_grid_places_nothing() {
        let biomes = Tilemap::new_with(4, 4, BiomeKind::Combat);
        let heights = Tilemap::new_with(4, 4, 0.0f64);
        let params = WorldParams { poi_min_distance_to_void_cells: 0, ..poi_params() };
        let report = place_pois(&biomes, &heights, &params, &WorldSeeds::from_master(1));
        assert_eq!(report.placed_count(), 0);
    }

    #[test]
    fn test_no_variants_means_variant_zero() {
        let biomes = combat_island(40, 6);
        let heights = Tilemap::new_with(40, 40, 0.0f64);
        let params = WorldParams { poi_variant_count: 0, ..poi_params() };
        let report = place_pois(&biomes, &heights, &params, &WorldSeeds::from_master(2));
        assert!(report.placed.iter().all(|p| p.variant == 0));
    }

    #[test]
    fn test_placement_is_deterministic() {
        let biomes = combat_island(40, 6);
        let heights = Tilemap::new_with(40, 40, 0.0f64);
        let params = poi_params();
        let a = place_pois(&biomes, &heights, &params, &WorldSeeds::from_master(13));
        let b = place_pois(&biomes, &heights, &params, &WorldSeeds::from_master(13));
        assert_eq!(a, b);
    }
}
