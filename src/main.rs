//! Panotile CLI - Panorama to cube-map tile pyramid generator.
//!
//! Converts equirectangular panoramas into the multi-resolution cube tile
//! layout and preview thumbnail consumed by a multires tour viewer.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use panotile::logging::init_logging;
use panotile::pipeline::{generate_from_folder, LogProgress, SceneGenerator};
use panotile::tiling::TilingConfig;

/// Panorama to cube-map tile pyramid generator.
#[derive(Parser)]
#[command(name = "panotile")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(clap::Args, Clone)]
struct ConfigArgs {
    /// Base cube face size in pixels, overriding the config.
    #[arg(long)]
    face_size: Option<u32>,

    /// JSON tiling configuration file. Missing fields take reference values.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one scene from a single panorama.
    Generate {
        /// Equirectangular JPEG or PNG.
        input: PathBuf,

        /// Scene output directory.
        output: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Generate one scene per panorama in a folder.
    Batch {
        /// Folder of source panoramas.
        #[arg(default_value = "FishEye-Images")]
        source: PathBuf,

        /// Root folder for scene directories.
        #[arg(default_value = "tiles")]
        output: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Display the level layout and memory use of a configuration.
    Info {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Warning: logging unavailable: {}", e);
    }

    let ok = match cli.command {
        Commands::Generate { input, output, config } => {
            run_generate(&input, &output, load_config(&config))
        }
        Commands::Batch { source, output, config } => {
            run_batch(&source, &output, load_config(&config))
        }
        Commands::Info { config } => {
            run_info(&load_config(&config));
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

fn load_config(args: &ConfigArgs) -> TilingConfig {
    let config = match &args.config {
        Some(path) => TilingConfig::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }),
        None => TilingConfig::reference(),
    };

    match args.face_size {
        Some(size) => config.with_base_face_size(size),
        None => config,
    }
}

fn build_generator(config: TilingConfig) -> SceneGenerator {
    SceneGenerator::standard(config).unwrap_or_else(|e| {
        eprintln!("Error: Invalid configuration: {}", e);
        std::process::exit(1);
    })
}

fn run_generate(input: &Path, output: &Path, config: TilingConfig) -> bool {
    let generator = build_generator(config);

    println!("Panotile - Scene Generator");
    println!("==========================");
    println!("Input:     {}", input.display());
    println!("Output:    {}", output.display());
    println!("Face size: {}", generator.config().base_face_size);

    let start = Instant::now();
    match generator.generate(input, output) {
        Ok(summary) => {
            println!(
                "\nWrote {} files from a {}x{} panorama in {:.2?}",
                summary.files_written,
                summary.source_width,
                summary.source_height,
                start.elapsed()
            );
            true
        }
        Err(e) => {
            eprintln!("Error ({:?}): {}", e.kind(), e);
            false
        }
    }
}

fn run_batch(source: &Path, output: &Path, config: TilingConfig) -> bool {
    let generator = build_generator(config);

    println!("Panotile - Batch Generator");
    println!("==========================");
    println!("Source: {}", source.display());
    println!("Output: {}", output.display());

    let start = Instant::now();
    let report = match generate_from_folder(&generator, source, output, &LogProgress) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return false;
        }
    };

    for (path, e) in &report.failed {
        eprintln!("  Failed: {} ({:?}): {}", path.display(), e.kind(), e);
    }
    println!(
        "\nGenerated {} scenes in {:.2?}",
        report.scene_count(),
        start.elapsed()
    );

    report.is_success()
}

fn run_info(config: &TilingConfig) {
    let base = config.base_face_size as u64;
    let bytes_faces = base * base * 3 * 6;

    println!("Panotile - Configuration Info");
    println!("=============================");
    println!();
    println!("Base face size: {}x{}", base, base);
    println!("Tile quality:   {}", config.tile_quality);
    println!(
        "Preview:        {}x{} (quality {})",
        config.preview_size as u64 * 4,
        config.preview_size as u64 * 3,
        config.preview_quality
    );
    println!();
    println!("Levels:");
    for spec in &config.levels {
        println!(
            "  Level {}: face {:>5}px, tile {:>4}px, {}x{} grid, {:>4} tiles",
            spec.level,
            spec.face_size,
            spec.tile_size,
            spec.grid_size(),
            spec.grid_size(),
            spec.tiles_per_face().saturating_mul(6)
        );
    }
    println!();
    println!("Files per scene: {}", config.tiles_per_scene().saturating_add(1));
    println!();
    println!("Memory usage (in-memory):");
    println!(
        "  Base faces:      {:>12} bytes ({:.2} MB)",
        bytes_faces,
        bytes_faces as f64 / 1024.0 / 1024.0
    );
    if let Some(largest) = config.levels.iter().map(|l| l.face_size as u64).max() {
        let bytes_level = largest * largest * 3;
        println!(
            "  Largest resize:  {:>12} bytes ({:.2} MB) per face",
            bytes_level,
            bytes_level as f64 / 1024.0 / 1024.0
        );
    }

    if let Err(e) = config.validate() {
        println!();
        println!("Warning: {}", e);
    }
}
