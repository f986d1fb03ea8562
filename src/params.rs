//! World generation parameters.
//!
//! A single immutable record drives a whole generation run. Defaults match
//! the tuned values of the reference layout (160x160 cells, four arms).
//! Parameters persist as JSON; missing fields fall back to defaults so
//! hand-written config files only need the values they change.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldGenError};

/// Immutable configuration for one generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    // =========================================================================
    // World extent
    // =========================================================================
    /// World width in cells
    pub width: usize,
    /// World height (depth along z) in cells
    pub height: usize,
    /// Cells per side of a mesh chunk
    pub chunk_size: usize,
    /// World units per cell
    pub cell_size: f64,

    /// Master seed; all randomness derives from it
    pub seed: u64,

    // =========================================================================
    // Layout
    // =========================================================================
    /// Radius (cells) of the central safe ellipse
    pub safe_core_radius: u32,
    /// Number of curved arms grown from the core
    pub stream_count: u32,
    /// Steps walked by each arm
    pub stream_length: u32,
    /// Base brush radius (cells)
    pub stream_thickness: f64,
    /// How strongly the arms curve
    pub stream_wander: f64,
    /// Blend weight of noise on the brush edge (0 = perfect discs)
    pub edge_noise: f64,
    /// Steps painted neutral before an arm turns into combat
    pub neutral_band_length: u32,

    // =========================================================================
    // Band thickness
    // =========================================================================
    pub neutral_width_multiplier: f64,
    pub combat_width_multiplier: f64,
    /// Extra combat brush growth reached at the tip of an arm
    pub combat_outward_growth: f64,

    // =========================================================================
    // Void ring / combat sea
    // =========================================================================
    /// Border band forced to void (cells)
    pub void_ring_thickness: u32,
    /// Square radius of sea carved around combat cells
    pub void_buffer_around_combat: u32,
    /// Refill isolated void pockets with neutral land
    pub gap_fill: bool,

    // =========================================================================
    // Height
    // =========================================================================
    /// Peak elevation magnitude (meters)
    pub height_amplitude: f64,
    /// Noise period in world units
    pub noise_scale: f64,
    /// Target bound on elevation change between adjacent cells (meters)
    pub max_neighbor_delta: f64,
    /// Relaxation passes of the slope limiter
    pub slope_iterations: u32,

    // =========================================================================
    // Points of interest
    // =========================================================================
    pub combat_poi_count: u32,
    /// Minimum distance between two POIs (cells)
    pub poi_min_distance_cells: u32,
    /// Keep POIs this many cells away from any void cell
    pub poi_min_distance_to_void_cells: u32,
    /// Reject cells whose max neighbor delta exceeds this (meters)
    pub poi_max_slope: f64,
    /// Random samples tried per POI slot
    pub poi_tries_per_poi: u32,
    /// Number of prop variants a POI may be assigned
    pub poi_variant_count: u32,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            width: 160,
            height: 160,
            chunk_size: 32,
            cell_size: 2.0,
            seed: 12345,

            safe_core_radius: 22,
            stream_count: 4,
            stream_length: 140,
            stream_thickness: 10.0,
            stream_wander: 1.2,
            edge_noise: 0.35,
            neutral_band_length: 30,

            neutral_width_multiplier: 0.65,
            combat_width_multiplier: 1.65,
            combat_outward_growth: 0.6,

            void_ring_thickness: 12,
            void_buffer_around_combat: 6,
            gap_fill: false,

            height_amplitude: 3.0,
            noise_scale: 75.0,
            max_neighbor_delta: 0.14,
            slope_iterations: 6,

            combat_poi_count: 6,
            poi_min_distance_cells: 16,
            poi_min_distance_to_void_cells: 10,
            poi_max_slope: 0.12,
            poi_tries_per_poi: 700,
            poi_variant_count: 4,
        }
    }
}

impl WorldParams {
    /// Quick 64x64 preview layout.
    pub fn small() -> Self {
        Self {
            width: 64,
            height: 64,
            safe_core_radius: 10,
            stream_count: 3,
            stream_length: 24,
            stream_thickness: 4.0,
            neutral_band_length: 8,
            void_ring_thickness: 4,
            void_buffer_around_combat: 2,
            combat_poi_count: 3,
            poi_min_distance_cells: 6,
            poi_min_distance_to_void_cells: 2,
            poi_max_slope: 0.3,
            ..Default::default()
        }
    }

    /// Large map with more arms and POIs.
    pub fn large() -> Self {
        Self {
            width: 320,
            height: 320,
            safe_core_radius: 30,
            stream_count: 6,
            stream_length: 260,
            stream_thickness: 12.0,
            neutral_band_length: 45,
            void_ring_thickness: 16,
            combat_poi_count: 20,
            poi_min_distance_cells: 20,
            ..Default::default()
        }
    }

    /// Center cell of the world; the safe core is painted around it.
    pub fn center(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    /// Reject structurally invalid configuration.
    ///
    /// Extreme but well-formed combinations (huge sea buffers, impossible
    /// POI spacing) are accepted and simply produce degenerate layouts.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(WorldGenError::invalid("width", "must be at least 1"));
        }
        if self.height == 0 {
            return Err(WorldGenError::invalid("height", "must be at least 1"));
        }
        if self.width > i32::MAX as usize || self.height > i32::MAX as usize {
            return Err(WorldGenError::invalid("width", "world extent does not fit signed cell coordinates"));
        }
        if self.chunk_size == 0 {
            return Err(WorldGenError::invalid("chunk_size", "must be at least 1"));
        }
        if self.safe_core_radius == 0 {
            return Err(WorldGenError::invalid("safe_core_radius", "must be at least 1"));
        }

        let positive = [
            ("cell_size", self.cell_size),
            ("stream_thickness", self.stream_thickness),
            ("noise_scale", self.noise_scale),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(WorldGenError::invalid(field, format!("must be positive, got {}", value)));
            }
        }

        let non_negative = [
            ("stream_wander", self.stream_wander),
            ("edge_noise", self.edge_noise),
            ("neutral_width_multiplier", self.neutral_width_multiplier),
            ("combat_width_multiplier", self.combat_width_multiplier),
            ("combat_outward_growth", self.combat_outward_growth),
            ("height_amplitude", self.height_amplitude),
            ("max_neighbor_delta", self.max_neighbor_delta),
            ("poi_max_slope", self.poi_max_slope),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(WorldGenError::invalid(field, format!("must be finite and >= 0, got {}", value)));
            }
        }

        if self.edge_noise > 1.0 {
            return Err(WorldGenError::invalid("edge_noise", format!("must be in [0, 1], got {}", self.edge_noise)));
        }

        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load parameters from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Save parameters as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(WorldParams::default().validate().is_ok());
        assert!(WorldParams::small().validate().is_ok());
        assert!(WorldParams::large().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let params = WorldParams { width: 0, ..Default::default() };
        match params.validate() {
            Err(WorldGenError::InvalidParams { field, .. }) => assert_eq!(field, "width"),
            other => panic!("expected invalid width, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_positive_noise_scale() {
        let params = WorldParams { noise_scale: 0.0, ..Default::default() };
        assert!(params.validate().is_err());

        let params = WorldParams { cell_size: f64::NAN, ..Default::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_degenerate_buffer_is_accepted() {
        let params = WorldParams { void_buffer_around_combat: 10_000, ..Default::default() };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params = WorldParams::from_json_str(r#"{ "seed": 7, "stream_count": 2 }"#).unwrap();
        assert_eq!(params.seed, 7);
        assert_eq!(params.stream_count, 2);
        assert_eq!(params.width, WorldParams::default().width);
    }

    #[test]
    fn test_json_round_trip() {
        let params = WorldParams { gap_fill: true, ..WorldParams::small() };
        let json = params.to_json_string().unwrap();
        assert_eq!(WorldParams::from_json_str(&json).unwrap(), params);
    }
}
