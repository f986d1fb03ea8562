//! Sea carving around the painted landmass.
//!
//! Three passes run in order: a void ring along the world border, a sea
//! buffer carved around the combat continent, and a protected land corridor
//! around the core so the spawn area is never cut off by the sea. An
//! optional gap filler afterwards closes single-cell water pockets.

use crate::biome::BiomeKind;
use crate::core_zone::CoreEllipse;
use crate::params::WorldParams;
use crate::tilemap::Tilemap;

/// Run the border ring, combat sea and core corridor passes.
pub fn carve_void(biomes: &mut Tilemap<BiomeKind>, params: &WorldParams, core: &CoreEllipse) {
    let ring = carve_border_ring(biomes, params.void_ring_thickness);
    let sea = carve_combat_sea(biomes, params.void_buffer_around_combat);
    let corridor = protect_core_corridor(biomes, core, params.void_buffer_around_combat);
    log::debug!(
        "void: ring {} cells, sea {} cells, corridor restored {} cells",
        ring, sea, corridor
    );
}

/// Turn every non-safe cell within `thickness` of a grid edge into void.
pub fn carve_border_ring(biomes: &mut Tilemap<BiomeKind>, thickness: u32) -> usize {
    if thickness == 0 {
        return 0;
    }
    let t = thickness as usize;
    let (w, h) = (biomes.width, biomes.height);
    let mut carved = 0;

    for (x, z, cell) in biomes.iter_mut() {
        let border = x < t || z < t || x + t >= w || z + t >= h;
        if border && *cell != BiomeKind::Safe && *cell != BiomeKind::Void {
            *cell = BiomeKind::Void;
            carved += 1;
        }
    }
    carved
}

/// Carve a square sea buffer of half-size `buffer` around every combat cell.
///
/// Combat cells are read from a snapshot taken before carving; the live grid
/// decides what may be carved, so neither `Safe` nor `Combat` is ever eaten.
pub fn carve_combat_sea(biomes: &mut Tilemap<BiomeKind>, buffer: u32) -> usize {
    if buffer == 0 {
        return 0;
    }
    let snapshot = biomes.clone();
    let mut carved = 0;

    for (x, z, &kind) in snapshot.iter() {
        if kind != BiomeKind::Combat {
            continue;
        }
        for (nx, nz) in snapshot.window(x, z, buffer) {
            let cell = biomes.get_mut(nx, nz);
            if *cell == BiomeKind::Neutral {
                *cell = BiomeKind::Void;
                carved += 1;
            }
        }
    }
    carved
}

/// Size of the protected window around the center for a given sea buffer.
pub fn corridor_half_size(buffer: u32) -> u32 {
    (buffer.min(1_000) + 2).clamp(4, 20)
}

/// Restore void cells near the center to neutral land.
///
/// Within a square window around the core center, sized from the sea buffer,
/// void becomes neutral. Cells inside the core ellipse (grown by one cell)
/// are left alone.
pub fn protect_core_corridor(biomes: &mut Tilemap<BiomeKind>, core: &CoreEllipse, buffer: u32) -> usize {
    let protect = corridor_half_size(buffer);
    let keep_out = core.expanded(1.0);
    let (cx, cz) = core.center;
    let mut restored = 0;

    let window: Vec<(usize, usize)> = biomes.window(cx, cz, protect).collect();
    for (x, z) in window {
        if keep_out.contains(x as i32, z as i32) {
            continue;
        }
        let cell = biomes.get_mut(x, z);
        if *cell == BiomeKind::Void {
            *cell = BiomeKind::Neutral;
            restored += 1;
        }
    }
    restored
}

/// Refill interior void cells that have at least three land neighbors.
///
/// Neighbor counts come from a snapshot so fills never cascade within a pass.
pub fn fill_gaps(biomes: &mut Tilemap<BiomeKind>) -> usize {
    if biomes.width < 3 || biomes.height < 3 {
        return 0;
    }
    let snapshot = biomes.clone();
    let mut filled = 0;

    for z in 1..snapshot.height - 1 {
        for x in 1..snapshot.width - 1 {
            if !snapshot.get(x, z).is_void() {
                continue;
            }
            let land = snapshot
                .neighbors(x, z)
                .filter(|&(nx, nz)| snapshot.get(nx, nz).is_land())
                .count();
            if land >= 3 {
                biomes.set(x, z, BiomeKind::Neutral);
                filled += 1;
            }
        }
    }

    log::debug!("gap fill: {} void pockets closed", filled);
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&str]) -> Tilemap<BiomeKind> {
        let mut grid = Tilemap::new(rows[0].len(), rows.len());
        for (z, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let kind = match ch {
                    'S' => BiomeKind::Safe,
                    '.' => BiomeKind::Neutral,
                    '#' => BiomeKind::Combat,
                    _ => BiomeKind::Void,
                };
                grid.set(x, z, kind);
            }
        }
        grid
    }

    #[test]
    fn test_border_ring_spares_safe() {
        let mut grid = grid_from(&[
            "S....",
            ".....",
            "..#..",
            ".....",
            ".....",
        ]);
        carve_border_ring(&mut grid, 1);
        assert_eq!(*grid.get(0, 0), BiomeKind::Safe);
        assert_eq!(*grid.get(1, 0), BiomeKind::Void);
        assert_eq!(*grid.get(4, 2), BiomeKind::Void);
        assert_eq!(*grid.get(1, 1), BiomeKind::Neutral);
        assert_eq!(*grid.get(2, 2), BiomeKind::Combat);
    }

    #[test]
    fn test_combat_sea_carves_only_neutral() {
        let mut grid = grid_from(&[
            ".......",
            ".......",
            "..S#...",
            ".......",
            ".......",
            ".......",
        ]);
        carve_combat_sea(&mut grid, 2);
        assert_eq!(*grid.get(2, 2), BiomeKind::Safe);
        assert_eq!(*grid.get(3, 2), BiomeKind::Combat);
        assert_eq!(*grid.get(5, 4), BiomeKind::Void);
        assert_eq!(*grid.get(1, 0), BiomeKind::Void);
        assert_eq!(*grid.get(6, 2), BiomeKind::Neutral);
        assert_eq!(*grid.get(3, 5), BiomeKind::Neutral);
    }

    #[test]
    fn test_combat_sea_isolates_combat() {
        let mut grid = grid_from(&[
            "..........",
            "..##......",
            "..##......",
            "......#...",
            "..........",
            "..........",
        ]);
        let buffer = 2;
        carve_combat_sea(&mut grid, buffer);
        for (x, z, &b) in grid.iter() {
            if b != BiomeKind::Combat {
                continue;
            }
            for (nx, nz) in grid.window(x, z, buffer) {
                assert_ne!(*grid.get(nx, nz), BiomeKind::Neutral);
            }
        }
    }

    #[test]
    fn test_unbounded_sea_buffer_clears_all_neutral() {
        let mut grid = grid_from(&[
            "........",
            ".S......",
            "......#.",
            "........",
        ]);
        let carved = carve_combat_sea(&mut grid, u32::MAX);
        assert_eq!(carved, 30);
        assert_eq!(*grid.get(1, 1), BiomeKind::Safe);
        assert_eq!(*grid.get(6, 2), BiomeKind::Combat);
        assert!(grid.iter().all(|(_, _, b)| *b != BiomeKind::Neutral));
    }

    #[test]
    fn test_corridor_restores_land_outside_core() {
        let mut grid = Tilemap::new_with(41, 41, BiomeKind::Void);
        let core = CoreEllipse::new((20, 20), 2.0);
        crate::core_zone::paint_safe_core(&mut grid, &core);

        let restored = protect_core_corridor(&mut grid, &core, 0);
        assert_eq!(corridor_half_size(0), 4);
        assert!(restored > 0);
        assert_eq!(*grid.get(20, 20), BiomeKind::Safe);
        assert_eq!(*grid.get(24, 24), BiomeKind::Neutral);
        assert_eq!(*grid.get(25, 20), BiomeKind::Void);
        assert_eq!(corridor_half_size(100), 20);
    }

    #[test]
    fn test_fill_gaps_closes_pockets_without_cascading() {
        let mut grid = grid_from(&[
            ".....",
            ".~...",
            "..~~.",
            ".....",
        ]);
        let filled = fill_gaps(&mut grid);
        // (1,1): all four neighbors land; (2,2) and (3,2) each have three
        assert_eq!(filled, 3);
        assert!(grid.iter().all(|(_, _, b)| b.is_land()));

        let mut lake = grid_from(&[
            ".....",
            ".~~~.",
            ".~~~.",
            ".~~~.",
            ".....",
        ]);
        fill_gaps(&mut lake);
        assert_eq!(*lake.get(2, 2), BiomeKind::Void);
        assert_eq!(*lake.get(1, 1), BiomeKind::Void);
    }
}
