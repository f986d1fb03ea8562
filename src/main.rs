use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use stream_world::ascii::{self, AsciiMode};
use stream_world::map_export;
use stream_world::{generate_with_progress, GenStage, Result, WorldParams};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Default,
    Small,
    Large,
}

#[derive(Parser, Debug)]
#[command(name = "stream_world")]
#[command(about = "Generate a stream world layout: safe core, combat arms, void sea and POIs")]
struct Args {
    /// Load parameters from a JSON file (overrides the preset)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Parameter preset used when no config file is given
    #[arg(long, value_enum, default_value = "default")]
    preset: Preset,

    /// Width of the grid in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the grid in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of arms
    #[arg(long)]
    streams: Option<u32>,

    /// Number of combat POIs to place
    #[arg(long)]
    pois: Option<u32>,

    /// Close single-cell void pockets after carving
    #[arg(long)]
    gap_fill: bool,

    /// Print the biome map to stdout
    #[arg(long)]
    print: bool,

    /// Export ASCII map, legend and stats to a text file
    #[arg(long)]
    ascii: Option<PathBuf>,

    /// Export biome map PNG
    #[arg(long)]
    png: Option<PathBuf>,

    /// Pixels per cell in the biome PNG
    #[arg(long, default_value = "4")]
    png_scale: u32,

    /// Export grayscale height map PNG
    #[arg(long)]
    height_png: Option<PathBuf>,

    /// Export the full layout as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the effective parameters to a JSON file
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn resolve_params(args: &Args) -> Result<WorldParams> {
    let mut params = match &args.config {
        Some(path) => WorldParams::load(path)?,
        None => match args.preset {
            Preset::Default => WorldParams::default(),
            Preset::Small => WorldParams::small(),
            Preset::Large => WorldParams::large(),
        },
    };

    if let Some(width) = args.width {
        params.width = width;
    }
    if let Some(height) = args.height {
        params.height = height;
    }
    if let Some(streams) = args.streams {
        params.stream_count = streams;
    }
    if let Some(pois) = args.pois {
        params.combat_poi_count = pois;
    }
    if args.gap_fill {
        params.gap_fill = true;
    }
    // config files carry their own seed; presets get a random one
    if let Some(seed) = args.seed {
        params.seed = seed;
    } else if args.config.is_none() {
        params.seed = rand::random();
    }
    Ok(params)
}

fn run(args: Args) -> Result<()> {
    let params = resolve_params(&args)?;

    println!("Generating stream world with seed: {}", params.seed);
    println!("Map size: {}x{} cells", params.width, params.height);

    let layout = generate_with_progress(&params, |stage: GenStage| {
        println!("{}...", stage.description());
    })?;

    println!();
    println!("Arms:");
    for (i, arm) in layout.arms.iter().enumerate() {
        println!(
            "  #{} at {:>6.1} deg: {} steps ({} neutral, {} combat){}",
            i,
            arm.angle_deg,
            arm.steps,
            arm.neutral_steps,
            arm.combat_steps,
            if arm.exited_early { ", left the grid" } else { "" }
        );
    }

    println!();
    println!("Statistics:");
    println!("{}", layout.stats());
    if !layout.slope_report.is_clean() {
        println!(
            "  Slope bound exceeded on {} of {} pairs",
            layout.slope_report.violations, layout.slope_report.pairs_checked
        );
    }

    println!();
    println!("Combat POIs:");
    for poi in &layout.pois.placed {
        let [wx, wy, wz] = layout.cell_to_world(poi.x as i32, poi.z as i32);
        println!(
            "  cell ({}, {}) variant {} -> world ({:.1}, {:.2}, {:.1})",
            poi.x, poi.z, poi.variant, wx, wy, wz
        );
    }
    if layout.pois.shortfall() > 0 {
        println!("  {} slot(s) could not be placed", layout.pois.shortfall());
    }

    if args.print {
        println!();
        ascii::print_ascii_map(&layout, AsciiMode::Biome);
        print!("{}", ascii::biome_legend());
    }

    if let Some(path) = &args.ascii {
        ascii::export_world_file(&layout, path)?;
        println!("Exported ASCII map to {}", path.display());
    }
    if let Some(path) = &args.png {
        map_export::export_biome_png(&layout, path, args.png_scale)?;
        println!("Exported biome map to {}", path.display());
    }
    if let Some(path) = &args.height_png {
        map_export::export_height_png(&layout, path)?;
        println!("Exported height map to {}", path.display());
    }
    if let Some(path) = &args.json {
        map_export::export_layout_json(&layout, path)?;
        println!("Exported layout JSON to {}", path.display());
    }
    if let Some(path) = &args.save_config {
        params.save(path)?;
        println!("Saved parameters to {}", path.display());
    }

    Ok(())
}
