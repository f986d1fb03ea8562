//! Central safe zone.

use crate::biome::BiomeKind;
use crate::tilemap::Tilemap;

/// Vertical radius of the core ellipse relative to its horizontal radius.
pub const CORE_ASPECT: f64 = 0.9;

/// Axis-scaled ellipse around the world center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoreEllipse {
    pub center: (usize, usize),
    pub radius: f64,
}

impl CoreEllipse {
    pub fn new(center: (usize, usize), radius: f64) -> Self {
        Self { center, radius }
    }

    /// The same ellipse grown (or shrunk) by `extra` cells.
    pub fn expanded(&self, extra: f64) -> Self {
        Self { center: self.center, radius: self.radius + extra }
    }

    /// Whether the cell lies inside the ellipse (boundary included).
    pub fn contains(&self, x: i32, z: i32) -> bool {
        let rx = self.radius;
        let rz = self.radius * CORE_ASPECT;
        let dx = (x as f64 - self.center.0 as f64) / rx;
        let dz = (z as f64 - self.center.1 as f64) / rz;
        dx * dx + dz * dz <= 1.0
    }
}

/// Reset the grid: cells inside the core ellipse become `Safe`, every other
/// cell becomes `Void`. Runs first; nothing after it may overwrite the core.
pub fn paint_safe_core(biomes: &mut Tilemap<BiomeKind>, core: &CoreEllipse) -> usize {
    let mut safe = 0;
    for (x, z, cell) in biomes.iter_mut() {
        *cell = if core.contains(x as i32, z as i32) {
            safe += 1;
            BiomeKind::Safe
        } else {
            BiomeKind::Void
        };
    }
    log::debug!("core: {} safe cells (radius {})", safe, core.radius);
    safe
}
