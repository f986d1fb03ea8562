//! ASCII rendering and export module for world layouts
//!
//! Provides functions to render a generated layout as text and export it to
//! a file together with its parameters and statistics.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;

use crate::biome::BiomeKind;
use crate::world::WorldLayout;

/// Glyph drawn on top of POI cells.
pub const POI_CHAR: char = 'P';

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AsciiMode {
    /// Show biome characters
    Biome,
    /// Show elevation gradient
    Height,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Biome => "Biome",
            AsciiMode::Height => "Height",
        }
    }
}

/// Get ASCII character for an elevation, relative to the terrain amplitude.
pub fn height_char(elevation: f64, amplitude: f64) -> char {
    // low valleys to high hills
    const CHARS: &[char] = &['_', '-', '=', '+', '*', '#', '^'];
    if amplitude <= 0.0 {
        return CHARS[CHARS.len() / 2];
    }
    let normalized = ((elevation + amplitude) / (2.0 * amplitude)).clamp(0.0, 1.0);
    let idx = (normalized * (CHARS.len() - 1) as f64).round() as usize;
    CHARS[idx.min(CHARS.len() - 1)]
}

/// Render the layout as one line of text per grid row.
pub fn render_ascii_map(layout: &WorldLayout, mode: AsciiMode, show_pois: bool) -> String {
    let width = layout.width();
    let height = layout.height();
    let amplitude = layout.params.height_amplitude;
    let mut rows: Vec<Vec<char>> = (0..height)
        .map(|z| {
            (0..width)
                .map(|x| {
                    let biome = *layout.biomes.get(x, z);
                    match mode {
                        AsciiMode::Biome => biome.glyph(),
                        AsciiMode::Height if biome.is_void() => BiomeKind::Void.glyph(),
                        AsciiMode::Height => height_char(*layout.heights.get(x, z), amplitude),
                    }
                })
                .collect()
        })
        .collect();

    if show_pois {
        for poi in &layout.pois.placed {
            rows[poi.z][poi.x] = POI_CHAR;
        }
    }

    let mut result = String::with_capacity((width + 1) * height);
    for row in rows {
        result.extend(row);
        result.push('\n');
    }
    result
}

/// Generate legend for biome characters
pub fn biome_legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== LEGEND ===\n");
    for kind in BiomeKind::all() {
        legend.push_str(&format!("  {} {}\n", kind.glyph(), kind.display_name()));
    }
    legend.push_str(&format!("  {} Point of interest\n", POI_CHAR));
    legend
}

/// Print the biome view to stdout.
pub fn print_ascii_map(layout: &WorldLayout, mode: AsciiMode) {
    print!("{}", render_ascii_map(layout, mode, true));
}

/// Export the layout, legend, statistics and POI list to a text file.
pub fn export_world_file(layout: &WorldLayout, path: &Path) -> io::Result<()> {
    let mut file = File::create(path)?;
    let params = &layout.params;

    writeln!(file, "=== STREAM WORLD LAYOUT ===")?;
    writeln!(file, "Seed: {}", params.seed)?;
    writeln!(file, "Size: {}x{} cells ({:.1} units/cell)", layout.width(), layout.height(), params.cell_size)?;
    writeln!(file, "Arms: {} x {} steps", params.stream_count, params.stream_length)?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    for mode in [AsciiMode::Biome, AsciiMode::Height] {
        writeln!(file, "=== MAP ({} View) ===", mode.name())?;
        write!(file, "{}", render_ascii_map(layout, mode, mode == AsciiMode::Biome))?;
        writeln!(file)?;
    }

    write!(file, "{}", biome_legend())?;
    writeln!(file)?;

    writeln!(file, "=== STATISTICS ===")?;
    writeln!(file, "{}", layout.stats())?;
    writeln!(file)?;

    writeln!(file, "=== POINTS OF INTEREST ===")?;
    for (i, poi) in layout.pois.placed.iter().enumerate() {
        let [wx, wy, wz] = layout.cell_to_world(poi.x as i32, poi.z as i32);
        writeln!(
            file,
            "  #{:<2} cell ({:>3}, {:>3})  variant {}  world ({:.1}, {:.2}, {:.1})",
            i, poi.x, poi.z, poi.variant, wx, wy, wz
        )?;
    }
    if !layout.pois.failed_slots.is_empty() {
        writeln!(file, "  failed slots: {:?}", layout.pois.failed_slots)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::WorldParams;
    use crate::world::generate;

    #[test]
    fn test_height_char_extremes() {
        assert_eq!(height_char(-3.0, 3.0), '_');
        assert_eq!(height_char(3.0, 3.0), '^');
        assert_eq!(height_char(0.0, 3.0), '+');
        assert_eq!(height_char(100.0, 3.0), '^');
        assert_eq!(height_char(1.0, 0.0), '+');
    }

    #[test]
    fn test_render_matches_grid() {
        let layout = generate(&WorldParams::small()).unwrap();
        let text = render_ascii_map(&layout, AsciiMode::Biome, false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), layout.height());
        assert!(lines.iter().all(|l| l.chars().count() == layout.width()));

        let (cx, cz) = layout.params.center();
        assert_eq!(lines[cz].chars().nth(cx), Some(BiomeKind::Safe.glyph()));
    }

    #[test]
    fn test_pois_are_marked() {
        let layout = generate(&WorldParams::small()).unwrap();
        let text = render_ascii_map(&layout, AsciiMode::Biome, true);
        let marks = text.chars().filter(|&c| c == POI_CHAR).count();
        assert_eq!(marks, layout.pois.placed_count());
    }

    #[test]
    fn test_legend_lists_every_biome() {
        let legend = biome_legend();
        for kind in BiomeKind::all() {
            assert!(legend.contains(kind.display_name()));
        }
    }
}
