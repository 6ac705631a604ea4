//! afids: anatomical fiducials for neuroimaging.
//!
//! An AFID set is the 32 standardized brain landmarks of the AFIDs protocol,
//! placed on one image. This crate reads and writes the two 3D Slicer
//! formats such sets are exchanged in, validates them against the protocol,
//! converts between world and voxel space and between RAS and LPS, and
//! computes distances between sets.
//!
//! # Modules
//!
//! - [`protocol`]: The canonical 32-entry landmark table
//! - [`model`]: Validated fiducial types and the fcsv / markup JSON codecs
//! - [`transform`]: Affine world/voxel transforms and RAS/LPS conversion
//! - [`metrics`]: Distances between fiducials and between sets
//! - [`features`]: Integral volumes and voxel sampling grids
//! - [`error`]: Error types for afids operations

pub mod error;
pub mod features;
pub mod metrics;
pub mod model;
pub mod protocol;
pub mod transform;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

pub use error::AfidsError;

/// The afids CLI application.
#[derive(Parser)]
#[command(name = "afids")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Check that a file holds a complete, protocol-conformant AFID set.
    Validate(ValidateArgs),
    /// Convert between fcsv and markup JSON, optionally changing RAS/LPS.
    Convert(ConvertArgs),
    /// Per-fiducial distances between two AFID sets.
    Distance(DistanceArgs),
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Input .fcsv or .json file.
    input: PathBuf,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Input .fcsv or .json file.
    input: PathBuf,

    /// Output .fcsv or .json file.
    output: PathBuf,

    /// Target coordinate system ('RAS' or 'LPS'); defaults to the input's.
    #[arg(long)]
    coord_system: Option<String>,
}

/// Arguments for the distance subcommand.
#[derive(clap::Args)]
struct DistanceArgs {
    /// First AFID set.
    left: PathBuf,

    /// Second AFID set (e.g. a template).
    right: PathBuf,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

#[derive(Serialize)]
struct ValidateSummary<'a> {
    path: String,
    format_version: &'a str,
    coord_system: model::CoordinateSystem,
    fiducial_count: usize,
}

#[derive(Serialize)]
struct DistanceSummary<'a> {
    coord_system: model::CoordinateSystem,
    mean_distance: f64,
    distances: &'a [metrics::DistancePair],
}

/// Run the afids CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), AfidsError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Distance(args)) => run_distance(args),
        None => {
            println!("afids {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Anatomical fiducial (AFID) set tools.");
            println!();
            println!("Run 'afids --help' for usage information.");
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AfidsError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| {
        AfidsError::MarkupJsonWrite {
            path: PathBuf::from("<stdout>"),
            source,
        }
    })?;
    println!("{}", json);
    Ok(())
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), AfidsError> {
    let set = model::load(&args.input)?;

    match args.output.as_str() {
        "json" => print_json(&ValidateSummary {
            path: args.input.display().to_string(),
            format_version: set.format_version(),
            coord_system: set.coord_system(),
            fiducial_count: set.len(),
        }),
        _ => {
            println!("Validation passed: {}", args.input.display());
            println!("  format version: {}", set.format_version());
            println!("  coordinate system: {}", set.coord_system());
            println!("  fiducials: {}", set.len());
            Ok(())
        }
    }
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), AfidsError> {
    let mut set = model::load(&args.input)?;

    if let Some(target) = args.coord_system.as_deref() {
        let target: model::CoordinateSystem = target.parse()?;
        set = transform::xfm_coord_system(&set, target);
    }

    model::save(&set, &args.output)?;
    println!(
        "Converted {} -> {} ({})",
        args.input.display(),
        args.output.display(),
        set.coord_system()
    );
    Ok(())
}

/// Execute the distance subcommand.
fn run_distance(args: DistanceArgs) -> Result<(), AfidsError> {
    let left = model::load(&args.left)?;
    let right = model::load(&args.right)?;
    let result = metrics::set_distance(&left, &right)?;
    let mean = result.mean(metrics::Component::Distance);

    match args.output.as_str() {
        "json" => print_json(&DistanceSummary {
            coord_system: left.coord_system(),
            mean_distance: mean,
            distances: result.distances(),
        }),
        _ => {
            println!(
                "{:>5}  {:<32} {:>10} {:>10} {:>10} {:>10}",
                "label", "desc", "x", "y", "z", "distance"
            );
            for d in result.distances() {
                println!(
                    "{:>5}  {:<32} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
                    d.label, d.desc, d.x, d.y, d.z, d.euclidean
                );
            }
            println!();
            println!("Mean distance: {:.3} mm", mean);
            Ok(())
        }
    }
}
