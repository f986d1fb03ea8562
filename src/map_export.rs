//! Image and JSON exports of a generated layout.

use std::fs;
use std::path::Path;

use image::{ImageBuffer, Luma, Rgb, RgbImage};
use serde::Serialize;

use crate::error::Result;
use crate::params::WorldParams;
use crate::poi::PoiReport;
use crate::world::{ChunkBounds, WorldLayout};

/// Marker color for POI cells.
const POI_COLOR: [u8; 3] = [255, 220, 40];

/// Render biome colors shaded by elevation, one `scale` x `scale` block per
/// cell, with POIs drawn as filled markers.
pub fn render_biome_image(layout: &WorldLayout, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let amplitude = layout.params.height_amplitude;
    let width = layout.width() as u32 * scale;
    let height = layout.height() as u32 * scale;

    let mut img: RgbImage = ImageBuffer::from_fn(width, height, |px, pz| {
        let (x, z) = ((px / scale) as usize, (pz / scale) as usize);
        let biome = *layout.biomes.get(x, z);
        let base = biome.color();
        if biome.is_void() {
            return Rgb(base);
        }
        let shade = shade_factor(*layout.heights.get(x, z), amplitude);
        Rgb(base.map(|c| (c as f64 * shade).clamp(0.0, 255.0) as u8))
    });

    // markers span at least 3x3 pixels so single cells stay visible
    let radius = scale.max(3) as i64 / 2;
    for poi in &layout.pois.placed {
        let cx = poi.x as i64 * scale as i64 + scale as i64 / 2;
        let cz = poi.z as i64 * scale as i64 + scale as i64 / 2;
        for pz in cz - radius..=cz + radius {
            for px in cx - radius..=cx + radius {
                if px >= 0 && pz >= 0 && (px as u32) < width && (pz as u32) < height {
                    img.put_pixel(px as u32, pz as u32, Rgb(POI_COLOR));
                }
            }
        }
    }

    img
}

/// Brightness multiplier for an elevation in `[-amplitude, amplitude]`.
fn shade_factor(elevation: f64, amplitude: f64) -> f64 {
    if amplitude <= 0.0 {
        return 1.0;
    }
    let t = ((elevation + amplitude) / (2.0 * amplitude)).clamp(0.0, 1.0);
    0.7 + 0.45 * t
}

/// Grayscale height map normalized to the field's own range.
pub fn render_height_image(layout: &WorldLayout) -> ImageBuffer<Luma<u8>, Vec<u8>> {
    let (min_h, max_h) = layout.heights.min_max();
    let range = (max_h - min_h).max(f64::EPSILON);

    ImageBuffer::from_fn(layout.width() as u32, layout.height() as u32, |x, z| {
        let h = *layout.heights.get(x as usize, z as usize);
        Luma([(((h - min_h) / range) * 255.0).round().clamp(0.0, 255.0) as u8])
    })
}

pub fn export_biome_png(layout: &WorldLayout, path: &Path, scale: u32) -> Result<()> {
    render_biome_image(layout, scale).save(path)?;
    log::info!("Saved biome map to {}", path.display());
    Ok(())
}

pub fn export_height_png(layout: &WorldLayout, path: &Path) -> Result<()> {
    render_height_image(layout).save(path)?;
    log::info!("Saved height map to {}", path.display());
    Ok(())
}

/// Serialized form of a layout for engine-side consumers.
#[derive(Serialize)]
struct LayoutDump<'a> {
    params: &'a WorldParams,
    width: usize,
    height: usize,
    /// One string of biome glyphs per row
    biome_rows: Vec<String>,
    /// Row-major elevations
    heights: &'a [f64],
    pois: &'a PoiReport,
    chunks: Vec<ChunkBounds>,
    slope_violations: usize,
}

/// Serialize the full layout to a JSON string.
pub fn layout_to_json(layout: &WorldLayout) -> Result<String> {
    let biome_rows = (0..layout.height())
        .map(|z| layout.biomes.row(z).iter().map(|b| b.glyph()).collect())
        .collect();

    let dump = LayoutDump {
        params: &layout.params,
        width: layout.width(),
        height: layout.height(),
        biome_rows,
        heights: layout.heights.as_slice(),
        pois: &layout.pois,
        chunks: layout.chunks(),
        slope_violations: layout.slope_report.violations,
    };
    Ok(serde_json::to_string_pretty(&dump)?)
}

pub fn export_layout_json(layout: &WorldLayout, path: &Path) -> Result<()> {
    fs::write(path, layout_to_json(layout)?)?;
    log::info!("Saved layout JSON to {}", path.display());
    Ok(())
}
