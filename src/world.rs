//! Generation pipeline and its output.
//!
//! `generate` runs every stage in order over freshly allocated grids:
//! core, streams, void carving, optional gap fill, heights, slope limiting
//! and POI placement. Each stage borrows the grids for its duration and
//! returns; nothing is kept between runs, so two calls with the same
//! parameters produce identical layouts.

use serde::Serialize;

use crate::biome::BiomeKind;
use crate::core_zone::{paint_safe_core, CoreEllipse};
use crate::error::Result;
use crate::height::{limit_slopes, slope_violations, synthesize_heights, SlopeReport};
use crate::params::WorldParams;
use crate::poi::{place_pois, PoiReport};
use crate::seeds::WorldSeeds;
use crate::streams::{paint_streams, ArmTrace};
use crate::tilemap::Tilemap;
use crate::void_carver::{carve_void, fill_gaps};

/// Tolerance used when checking the relaxed height field.
pub const SLOPE_EPSILON: f64 = 1e-6;

/// Stages of the generation pipeline, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenStage {
    Core,
    Streams,
    Void,
    GapFill,
    Heights,
    Slopes,
    Pois,
}

impl GenStage {
    pub fn description(&self) -> &'static str {
        match self {
            GenStage::Core => "Painting safe core",
            GenStage::Streams => "Growing biome streams",
            GenStage::Void => "Carving void ring and combat sea",
            GenStage::GapFill => "Filling void pockets",
            GenStage::Heights => "Synthesizing heights",
            GenStage::Slopes => "Limiting slopes",
            GenStage::Pois => "Placing combat POIs",
        }
    }
}

/// Receives a callback as each stage starts.
pub trait GenProgress {
    fn on_stage(&mut self, stage: GenStage);
}

struct NoopProgress;

impl GenProgress for NoopProgress {
    fn on_stage(&mut self, _stage: GenStage) {}
}

impl<F> GenProgress for F
where
    F: FnMut(GenStage),
{
    fn on_stage(&mut self, stage: GenStage) {
        self(stage);
    }
}

/// Everything one generation run produced.
#[derive(Clone, Debug)]
pub struct WorldLayout {
    pub params: WorldParams,
    pub seeds: WorldSeeds,
    pub biomes: Tilemap<BiomeKind>,
    pub heights: Tilemap<f64>,
    pub arms: Vec<ArmTrace>,
    /// Residual slope violations after relaxation
    pub slope_report: SlopeReport,
    pub pois: PoiReport,
}

/// Generate a world layout.
pub fn generate(params: &WorldParams) -> Result<WorldLayout> {
    generate_with_progress(params, NoopProgress)
}

/// Generate a world layout, reporting each stage to `progress`.
pub fn generate_with_progress(params: &WorldParams, mut progress: impl GenProgress) -> Result<WorldLayout> {
    params.validate()?;

    let seeds = WorldSeeds::from_master(params.seed);
    let core = CoreEllipse::new(params.center(), params.safe_core_radius as f64);
    let mut biomes = Tilemap::new(params.width, params.height);

    progress.on_stage(GenStage::Core);
    paint_safe_core(&mut biomes, &core);

    progress.on_stage(GenStage::Streams);
    let arms = paint_streams(&mut biomes, params, &core, &seeds);

    progress.on_stage(GenStage::Void);
    carve_void(&mut biomes, params, &core);

    if params.gap_fill {
        progress.on_stage(GenStage::GapFill);
        fill_gaps(&mut biomes);
    }

    progress.on_stage(GenStage::Heights);
    let mut heights = synthesize_heights(&biomes, params, &seeds);

    progress.on_stage(GenStage::Slopes);
    limit_slopes(&biomes, &mut heights, params.max_neighbor_delta, params.slope_iterations);
    let slope_report = slope_violations(&biomes, &heights, params.max_neighbor_delta, SLOPE_EPSILON);
    if !slope_report.is_clean() {
        log::warn!(
            "{} of {} neighbor pairs still exceed the slope bound after {} passes (worst by {:.4})",
            slope_report.violations,
            slope_report.pairs_checked,
            params.slope_iterations,
            slope_report.max_excess
        );
    }

    progress.on_stage(GenStage::Pois);
    let pois = place_pois(&biomes, &heights, params, &seeds);

    let layout = WorldLayout {
        params: params.clone(),
        seeds,
        biomes,
        heights,
        arms,
        slope_report,
        pois,
    };
    log::info!("Generated {}x{} world (seed {})", params.width, params.height, params.seed);
    Ok(layout)
}

/// Cell range of one mesh chunk; `end` is exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ChunkBounds {
    pub chunk_x: usize,
    pub chunk_z: usize,
    pub start: (usize, usize),
    pub end: (usize, usize),
}

impl WorldLayout {
    pub fn width(&self) -> usize {
        self.biomes.width
    }

    pub fn height(&self) -> usize {
        self.biomes.height
    }

    /// Classification at `(x, z)`, `None` outside the grid.
    pub fn biome_at(&self, x: i32, z: i32) -> Option<BiomeKind> {
        self.biomes.get_signed(x, z).copied()
    }

    /// Elevation at `(x, z)`, clamped onto the grid.
    pub fn sample_height(&self, x: i32, z: i32) -> f64 {
        *self.heights.get_clamped(x, z)
    }

    /// World-space position of a cell center: `[x, y, z]` with `y` up.
    pub fn cell_to_world(&self, x: i32, z: i32) -> [f64; 3] {
        let cell = self.params.cell_size;
        [
            (x as f64 + 0.5) * cell,
            self.sample_height(x, z),
            (z as f64 + 0.5) * cell,
        ]
    }

    /// Chunk partition of the grid consumed by the mesh builder.
    pub fn chunks(&self) -> Vec<ChunkBounds> {
        let size = self.params.chunk_size.max(1);
        let (w, h) = (self.width(), self.height());
        let count_x = w.div_ceil(size);
        let count_z = h.div_ceil(size);

        (0..count_z)
            .flat_map(|chunk_z| (0..count_x).map(move |chunk_x| (chunk_x, chunk_z)))
            .map(|(chunk_x, chunk_z)| {
                let start = (chunk_x * size, chunk_z * size);
                ChunkBounds {
                    chunk_x,
                    chunk_z,
                    start,
                    end: ((start.0 + size).min(w), (start.1 + size).min(h)),
                }
            })
            .collect()
    }

    /// Summary counts for reporting.
    pub fn stats(&self) -> LayoutStats {
        let mut counts = [0usize; 4];
        for (_, _, &b) in self.biomes.iter() {
            counts[biome_slot(b)] += 1;
        }
        let (min_height, max_height) = self.heights.min_max();
        LayoutStats {
            counts,
            total: self.width() * self.height(),
            min_height,
            max_height,
            pois_placed: self.pois.placed_count(),
            pois_requested: self.pois.requested as usize,
        }
    }
}

fn biome_slot(kind: BiomeKind) -> usize {
    match kind {
        BiomeKind::Void => 0,
        BiomeKind::Safe => 1,
        BiomeKind::Neutral => 2,
        BiomeKind::Combat => 3,
    }
}

/// Per-biome cell counts and height range of a layout.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutStats {
    counts: [usize; 4],
    pub total: usize,
    pub min_height: f64,
    pub max_height: f64,
    pub pois_placed: usize,
    pub pois_requested: usize,
}

impl LayoutStats {
    pub fn count(&self, kind: BiomeKind) -> usize {
        self.counts[biome_slot(kind)]
    }

    pub fn percentage(&self, kind: BiomeKind) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        100.0 * self.count(kind) as f64 / self.total as f64
    }
}

impl std::fmt::Display for LayoutStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for kind in BiomeKind::all() {
            writeln!(
                f,
                "  {:<8} {:>7} cells ({:.1}%)",
                kind.display_name(),
                self.count(*kind),
                self.percentage(*kind)
            )?;
        }
        writeln!(f, "  Height   {:.2}m to {:.2}m", self.min_height, self.max_height)?;
        write!(f, "  POIs     {}/{}", self.pois_placed, self.pois_requested)
    }
}
