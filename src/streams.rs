//! Curved biome arms grown outward from the safe core.
//!
//! Each arm is a short random walk: it starts just inside the core
//! boundary, heads out along an evenly spaced (jittered) angle and drifts
//! sideways following a smooth noise curve. Along the way it stamps discs
//! with noise-roughened edges, first `Neutral`, then `Combat` once the arm
//! has left the neutral band. Combat discs widen toward the tip so the
//! dangerous zone reads as a continent rather than a road.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::biome::BiomeKind;
use crate::core_zone::CoreEllipse;
use crate::noise_field::NoiseField;
use crate::params::WorldParams;
use crate::seeds::WorldSeeds;
use crate::tilemap::Tilemap;

/// Fraction of the core radius at which arms start walking.
const ARM_START_FRACTION: f64 = 0.85;
/// Blend weight of the perpendicular drift in each step direction.
const DRIFT_WEIGHT: f64 = 0.35;
/// Combat is forbidden this many cells beyond the core radius.
const CORE_COMBAT_MARGIN: f64 = 2.0;
/// Speed at which an arm travels through its wander curve.
const WANDER_RATE: f64 = 3.7;
const WANDER_ROW_OFFSET: f64 = 42.1;
/// Frequency of the brush edge noise in cells.
const EDGE_NOISE_FREQUENCY: f64 = 0.07;

/// What one arm actually did, for diagnostics and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct ArmTrace {
    /// Starting angle in degrees
    pub angle_deg: f64,
    /// Steps painted before the arm ended
    pub steps: u32,
    /// Steps that stamped neutral
    pub neutral_steps: u32,
    /// Steps that stamped combat
    pub combat_steps: u32,
    /// The arm walked off the grid before `stream_length` steps
    pub exited_early: bool,
}

/// Brush edge roughening shared by every stamp of a run.
pub struct EdgeNoise {
    field: NoiseField,
    weight: f64,
}

impl EdgeNoise {
    pub fn new(seed: u32, weight: f64) -> Self {
        Self { field: NoiseField::new(seed), weight }
    }

    /// Normalized distance below which the cell at `(x, z)` gets painted.
    #[inline]
    fn threshold(&self, x: usize, z: usize) -> f64 {
        if self.weight == 0.0 {
            return 1.0;
        }
        let n = self
            .field
            .sample01(x as f64 * EDGE_NOISE_FREQUENCY, z as f64 * EDGE_NOISE_FREQUENCY);
        lerp(1.0, n, self.weight)
    }
}

/// Grow `stream_count` arms from the core. Returns one trace per arm.
pub fn paint_streams(
    biomes: &mut Tilemap<BiomeKind>,
    params: &WorldParams,
    core: &CoreEllipse,
    seeds: &WorldSeeds,
) -> Vec<ArmTrace> {
    let mut rng = WorldSeeds::rng(seeds.streams);
    let wander = NoiseField::new(WorldSeeds::noise_seed(seeds.wander));
    let edges = EdgeNoise::new(WorldSeeds::noise_seed(seeds.edges), params.edge_noise);

    let base_step = 360.0 / params.stream_count.max(1) as f64;
    let traces: Vec<ArmTrace> = (0..params.stream_count)
        .map(|s| {
            let jitter = base_step * 0.25;
            let angle = base_step * s as f64 + rng.gen_range(-jitter..jitter);
            paint_arm(biomes, params, core, angle, &wander, &edges, &mut rng)
        })
        .collect();

    log::debug!(
        "streams: {} arms, {} combat steps, {} exited early",
        traces.len(),
        traces.iter().map(|t| t.combat_steps).sum::<u32>(),
        traces.iter().filter(|t| t.exited_early).count(),
    );
    traces
}

fn paint_arm(
    biomes: &mut Tilemap<BiomeKind>,
    params: &WorldParams,
    core: &CoreEllipse,
    angle_deg: f64,
    wander: &NoiseField,
    edges: &EdgeNoise,
    rng: &mut ChaCha8Rng,
) -> ArmTrace {
    let dir = angle_to_dir(angle_deg);
    let perp = (-dir.1, dir.0);
    let start = core.radius * ARM_START_FRACTION;
    let mut pos = (
        core.center.0 as f64 + dir.0 * start,
        core.center.1 as f64 + dir.1 * start,
    );

    let phase = rng.gen_range(0.0..1000.0);
    let local_wander = params.stream_wander * rng.gen_range(0.85..1.25);
    let thickness = params.stream_thickness * rng.gen_range(0.9..1.15);

    let no_combat_zone = core.expanded(CORE_COMBAT_MARGIN);
    let length = params.stream_length as f64;

    let mut trace = ArmTrace {
        angle_deg,
        steps: 0,
        neutral_steps: 0,
        combat_steps: 0,
        exited_early: false,
    };

    for i in 0..params.stream_length {
        let t = i as f64 / length.max(1.0);

        let w = wander.sample_signed(phase + t * WANDER_RATE, phase + WANDER_ROW_OFFSET);
        let drift = (perp.0 * w * local_wander, perp.1 * w * local_wander);
        let step = normalize((dir.0 + drift.0 * DRIFT_WEIGHT, dir.1 + drift.1 * DRIFT_WEIGHT));
        pos.0 += step.0;
        pos.1 += step.1;

        let x = pos.0.round() as i32;
        let z = pos.1.round() as i32;
        if !biomes.in_bounds(x, z) {
            trace.exited_early = true;
            break;
        }

        let mut band = if i < params.neutral_band_length {
            BiomeKind::Neutral
        } else {
            BiomeKind::Combat
        };
        if band == BiomeKind::Combat && no_combat_zone.contains(x, z) {
            band = BiomeKind::Neutral;
        }

        let radius = match band {
            BiomeKind::Combat => {
                let growth = if params.combat_outward_growth > 0.0 {
                    lerp(1.0, 1.0 + params.combat_outward_growth, t)
                } else {
                    1.0
                };
                thickness * params.combat_width_multiplier * growth
            }
            _ => thickness * params.neutral_width_multiplier,
        };

        paint_brush(biomes, x, z, radius, band, edges);

        trace.steps += 1;
        match band {
            BiomeKind::Combat => trace.combat_steps += 1,
            _ => trace.neutral_steps += 1,
        }
    }

    trace
}

/// Stamp a disc of `band` with a noise-roughened edge.
///
/// Priority rules: `Safe` is never overwritten, and a `Neutral` stamp never
/// dilutes existing `Combat`. Everything else is overwritten.
pub fn paint_brush(
    biomes: &mut Tilemap<BiomeKind>,
    cx: i32,
    cz: i32,
    radius: f64,
    band: BiomeKind,
    edges: &EdgeNoise,
) -> usize {
    // a disc wider than the grid paints the whole grid
    let (w, h) = (biomes.width as i64, biomes.height as i64);
    let r = radius.ceil().clamp(0.0, w.max(h) as f64) as i64;
    let inv = 1.0 / radius.max(0.0001);
    let (cx, cz) = (cx as i64, cz as i64);
    let mut painted = 0;

    for z in (cz - r).max(0)..=(cz + r).min(h - 1) {
        for x in (cx - r).max(0)..=(cx + r).min(w - 1) {
            let (dx, dz) = ((x - cx) as f64, (z - cz) as f64);
            let dist = (dx * dx + dz * dz).sqrt() * inv;
            if dist > 1.0 {
                continue;
            }

            let (x, z) = (x as usize, z as usize);
            if dist > edges.threshold(x, z) {
                continue;
            }

            let cell = biomes.get_mut(x, z);
            match (*cell, band) {
                (BiomeKind::Safe, _) => {}
                (BiomeKind::Combat, BiomeKind::Neutral) => {}
                _ => {
                    *cell = band;
                    painted += 1;
                }
            }
        }
    }

    painted
}

fn angle_to_dir(degrees: f64) -> (f64, f64) {
    let rad = degrees.to_radians();
    (rad.cos(), rad.sin())
}

fn normalize(v: (f64, f64)) -> (f64, f64) {
    let len = (v.0 * v.0 + v.1 * v.1).sqrt();
    if len > 1e-12 {
        (v.0 / len, v.1 / len)
    } else {
        (0.0, 0.0)
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
