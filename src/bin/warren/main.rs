//! Warren CLI - procedural level geometry generator.
//!
//! Usage: warren <COMMAND> [OPTIONS]
//!
//! Run `warren --help` for available commands.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use warren::dungeon::{DungeonAssembler, DungeonConfig};
use warren::geom::{Path, RoadParams};
use warren::io;
use warren::mesh::{Material, MeshBuilder};

#[derive(Parser)]
#[command(name = "warren")]
#[command(author, version, about = "Procedural level geometry CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a dungeon and export it as OBJ
    Dungeon {
        /// Output OBJ file
        output: PathBuf,

        /// RNG seed (random when omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum number of placed modules
        #[arg(long, default_value = "50")]
        max_modules: usize,

        /// Colliding placements tolerated before giving up
        #[arg(long, default_value = "40")]
        max_failed: u32,
    },

    /// Generate a random road ribbon and export it as OBJ
    Road {
        /// Output OBJ file
        output: PathBuf,

        /// RNG seed (random when omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of road segments
        #[arg(short = 'n', long, default_value = "1000")]
        segments: usize,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Dungeon { output, seed, max_modules, max_failed } => {
            cmd_dungeon(&output, seed, max_modules, max_failed)?;
        }

        Commands::Road { output, seed, segments } => {
            cmd_road(&output, seed, segments)?;
        }
    }

    Ok(())
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::thread_rng().gen())
}

fn cmd_dungeon(
    output: &PathBuf,
    seed: Option<u64>,
    max_modules: usize,
    max_failed: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let seed = resolve_seed(seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let config = DungeonConfig {
        max_modules,
        max_failed_attempts: max_failed,
        ..DungeonConfig::default()
    };

    println!("Assembling dungeon (seed {seed})...");
    let start = Instant::now();
    let mut assembler = DungeonAssembler::new(config);
    assembler.run(&mut rng)?;
    let elapsed = start.elapsed();

    let layout = assembler.into_layout();
    let vertices: usize = layout
        .modules
        .iter()
        .map(|m| m.mesh().map(|mesh| mesh.vertex_count()).unwrap_or(0))
        .sum();
    println!(
        "Assembled {} modules and {} gates ({} module vertices, {:.2?})",
        layout.modules.len(),
        layout.gates.len(),
        vertices,
        elapsed
    );

    let mut writer = BufWriter::new(File::create(output)?);
    io::write_layout_obj(&mut writer, &layout)?;
    println!("Saved: {}", output.display());

    Ok(())
}

fn cmd_road(
    output: &PathBuf,
    seed: Option<u64>,
    segments: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let seed = resolve_seed(seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let params = RoadParams { segments, ..RoadParams::default() };

    println!("Generating road (seed {seed}, {segments} segments)...");
    let start = Instant::now();
    let path = Path::random_walk(&mut rng, &params);

    let mut builder = MeshBuilder::new();
    let submesh = builder.add_submesh(Material::new("asphalt"));
    builder.build_path(submesh, &path, 0.1)?;
    let mesh = builder.apply()?;
    let elapsed = start.elapsed();

    println!(
        "Built {} vertices, {} triangles ({:.2?})",
        mesh.vertex_count(),
        mesh.triangle_count(),
        elapsed
    );

    let mut writer = BufWriter::new(File::create(output)?);
    io::write_obj(&mut writer, &[("road", &mesh)])?;
    println!("Saved: {}", output.display());

    Ok(())
}
