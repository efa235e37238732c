// ─────────────────────────────────────────────────────────────────────
// Geomag Loop — Command Line
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `geomag` command-line front-end.
//!
//! Usage:
//!   geomag ingest --input sdatextr.html --output survey.json --min-distance 100000
//!   geomag field --lon 6.15 --lat 43.7
//!   geomag optimize-angle --snapshot survey.json --samples 10 --iterations 5

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use geomag_core::bfield::{field_at, inclination_deg};
use geomag_core::calibration::{CalibrationTarget, Calibrator};
use geomag_core::ingest::ingest_file;
use geomag_types::config::{CalibrationConfig, GeomagConfig};
use geomag_types::constants::REFERENCE_FIELD_T;
use geomag_types::state::{load_dataset, CalibrationResult, Record};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "geomag")]
#[command(about = "Survey ingestion and current-loop calibration of the geomagnetic field")]
struct Cli {
    /// JSON configuration file; command-line flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log calibration rounds (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate and deduplicate a survey export into a JSON snapshot
    Ingest {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Drop lines dated before this fractional year
        #[arg(long)]
        min_year: Option<f64>,
        /// Minimum separation between kept records [m]
        #[arg(long)]
        min_distance: Option<f64>,
    },
    /// Print the loop field at one geographic point
    Field {
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        alt: f64,
        #[arg(long)]
        current: Option<f64>,
        #[arg(long)]
        radius: Option<f64>,
    },
    /// List the records of a snapshot
    List {
        #[arg(long)]
        snapshot: PathBuf,
    },
    /// Fit the loop radius to measured field directions
    OptimizeAngle(SearchArgs),
    /// Fit the loop current to measured field magnitudes
    OptimizeMagnitude(SearchArgs),
    /// Fit the loop radius to full measured field vectors
    OptimizeVector(SearchArgs),
    /// Oscillating multiplicative radius search on the angle error
    Oscillate {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long, default_value = "20")]
        rounds: usize,
    },
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[arg(long)]
    snapshot: PathBuf,
    #[arg(long)]
    lower: Option<f64>,
    #[arg(long)]
    upper: Option<f64>,
    /// Candidates per round
    #[arg(long)]
    samples: Option<usize>,
    /// Refinement rounds
    #[arg(long)]
    iterations: Option<usize>,
}

impl SearchArgs {
    fn apply(&self, base: CalibrationConfig) -> CalibrationConfig {
        CalibrationConfig {
            lower: self.lower.unwrap_or(base.lower),
            upper: self.upper.unwrap_or(base.upper),
            sample_count: self.samples.unwrap_or(base.sample_count),
            iterations: self.iterations.unwrap_or(base.iterations),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<GeomagConfig> {
    match path {
        Some(p) => {
            let text = p.to_string_lossy();
            GeomagConfig::from_file(&text)
                .with_context(|| format!("loading configuration {}", p.display()))
        }
        None => Ok(GeomagConfig::default()),
    }
}

fn calibrate(target: CalibrationTarget, args: &SearchArgs, base: CalibrationConfig) -> Result<()> {
    let dataset = load_dataset(&args.snapshot)
        .with_context(|| format!("loading snapshot {}", args.snapshot.display()))?;
    let calibrator = Calibrator::new(&dataset)?;
    let search = args.apply(base);
    let result = calibrator.optimize(target, &search)?;
    print_result(target, &result);
    Ok(())
}

fn print_result(target: CalibrationTarget, result: &CalibrationResult) {
    let unit = match target {
        CalibrationTarget::Magnitude => "A",
        CalibrationTarget::Angle | CalibrationTarget::Vector => "m",
    };
    println!(
        "best = {:.6e} {unit}  error = {:.6e}  rounds = {}",
        result.best, result.error, result.rounds
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Ingest {
            input,
            output,
            min_year,
            min_distance,
        } => {
            let mut ingest = config.ingest;
            ingest.min_year = min_year.unwrap_or(ingest.min_year);
            ingest.min_distance_m = min_distance.unwrap_or(ingest.min_distance_m);

            let dataset = ingest_file(&input, &ingest)
                .with_context(|| format!("reading survey export {}", input.display()))?;
            dataset
                .save_snapshot(&output)
                .with_context(|| format!("writing snapshot {}", output.display()))?;
            info!(records = dataset.len(), output = %output.display(), "snapshot written");
        }
        Command::Field {
            lon,
            lat,
            alt,
            current,
            radius,
        } => {
            let current = current.unwrap_or(config.simulation.loop_current_a);
            let radius = radius.unwrap_or(config.simulation.loop_radius_m);
            let b = field_at(lon, lat, alt, current, radius);
            let magnitude = (b[0] * b[0] + b[1] * b[1] + b[2] * b[2]).sqrt();
            println!("B = [{:.6e}, {:.6e}, {:.6e}] T", b[0], b[1], b[2]);
            println!(
                "|B| = {:.6e} T ({:.3} x reference)",
                magnitude,
                magnitude / REFERENCE_FIELD_T
            );
            println!("inclination = {:.3} deg", inclination_deg(b, lon, lat, alt));
        }
        Command::List { snapshot } => {
            let dataset = load_dataset(&snapshot)
                .with_context(|| format!("loading snapshot {}", snapshot.display()))?;
            println!(
                "{:>5} {:<15} {:>9}",
                "#",
                Record::FIELD_NAMES[0],
                Record::FIELD_NAMES[Record::DATE_FIELD]
            );
            for (k, rec) in dataset.iter().enumerate() {
                println!(
                    "{k:5} {:<15} {:>9} lat {:8.3} lon {:8.3} alt {:6.0} |B| {:.5e}",
                    rec.station(),
                    rec.date().map(|d| format!("{d:.3}")).unwrap_or_default(),
                    rec.latitude.to_degrees(),
                    rec.longitude.to_degrees(),
                    rec.altitude,
                    rec.field_magnitude(),
                );
            }
            println!("{} records", dataset.len());
        }
        Command::OptimizeAngle(args) => calibrate(CalibrationTarget::Angle, &args, config.angle)?,
        Command::OptimizeMagnitude(args) => {
            calibrate(CalibrationTarget::Magnitude, &args, config.magnitude)?
        }
        Command::OptimizeVector(args) => calibrate(CalibrationTarget::Vector, &args, config.angle)?,
        Command::Oscillate { snapshot, rounds } => {
            let dataset = load_dataset(&snapshot)
                .with_context(|| format!("loading snapshot {}", snapshot.display()))?;
            let result = Calibrator::new(&dataset)?.angle_optimization(rounds)?;
            print_result(CalibrationTarget::Angle, &result);
        }
    }

    Ok(())
}
