//! Stream world layout generator
//!
//! Builds a bounded cell grid with a safe core, winding neutral-to-combat
//! arms, a carved void sea, a relaxed height field and combat POIs.
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod biome;
pub mod core_zone;
pub mod error;
pub mod height;
pub mod map_export;
pub mod noise_field;
pub mod params;
pub mod poi;
pub mod seeds;
pub mod streams;
pub mod tilemap;
pub mod void_carver;
pub mod world;

pub use biome::BiomeKind;
pub use error::{Result, WorldGenError};
pub use params::WorldParams;
pub use world::{generate, generate_with_progress, GenStage, WorldLayout};
