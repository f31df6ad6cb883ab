//! Predict spot positions for a rotation scan
//!
//! Reads a JSON experiment description, generates every Miller index down
//! to the requested resolution and writes the predicted reflections as JSON.
//!
//! Usage:
//! ```
//! cargo run --release --bin predict_spots -- --experiment experiment.json --d-min 1.5
//! ```
//!
//! Set `RUST_LOG=debug` for the per-stage rejection counts.

use clap::Parser;
use predictor::{Predictions, ResolutionIndexGenerator, SpotPredictor};
use shared::units::LengthExt;
use shared::{Experiment, ScanRangeArg};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Command line arguments for spot prediction
#[derive(Parser, Debug)]
#[command(
    name = "Predict Spots",
    about = "Predicts where and when reflections are recorded in a rotation scan",
    long_about = None
)]
struct Args {
    /// Experiment description (JSON)
    #[arg(long)]
    experiment: PathBuf,

    /// High resolution limit in Ångström
    #[arg(long, default_value_t = 2.0)]
    d_min: f64,

    /// Override the experiment scan, as "start:stop:width" in degrees
    #[arg(long)]
    scan_range: Option<ScanRangeArg>,

    /// Output file for the predicted reflections
    #[arg(long, default_value = "predicted.json")]
    output: PathBuf,

    /// Write index-aligned columns instead of one record per reflection
    #[arg(long)]
    columns: bool,

    /// Run the candidates through the rayon thread pool
    #[arg(long)]
    parallel: bool,

    /// Number of worker threads (0 = rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()?;
    }

    let mut experiment = Experiment::load_from_file(&args.experiment)?;
    if let Some(range) = &args.scan_range {
        log::info!("Overriding scan with {range} ({} frames)", range.num_frames());
        experiment.scan = range.to_scan()?;
    }

    let (start, end) = experiment.scan.angle_range();
    println!("Spot Prediction");
    println!("===============");
    println!("  Experiment: {}", args.experiment.display());
    let wavelength = experiment.beam.wavelength_length();
    println!(
        "  Wavelength: {:.4} Å ({:.3e} mm)",
        wavelength.as_angstroms(),
        wavelength.as_millimeters()
    );
    println!("  Panels: {}", experiment.detector.len());
    println!(
        "  Scan: {start:.2}° to {end:.2}° in {} frames",
        experiment.scan.num_frames()
    );
    println!("  Resolution limit: {:.3} Å", args.d_min);

    let predictor = SpotPredictor::from_experiment(&experiment)?;

    let timer = Instant::now();
    let predictions = if args.parallel {
        let indices: Vec<_> = ResolutionIndexGenerator::new(&experiment.crystal, args.d_min)?
            .collect();
        predictor.predict_parallel(&indices)
    } else {
        predictor.predict_to_resolution(args.d_min)?
    };
    let elapsed = timer.elapsed();

    println!();
    println!("Results:");
    println!("  Candidates: {}", predictions.stats.candidates);
    println!("  Predicted: {}", predictions.len());
    println!("  Time: {:.3} s", elapsed.as_secs_f64());

    write_output(&args, &predictions)?;
    println!("  Written to {}", args.output.display());
    Ok(())
}

fn write_output(
    args: &Args,
    predictions: &Predictions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = BufWriter::new(File::create(&args.output)?);
    if args.columns {
        serde_json::to_writer_pretty(&mut writer, &predictions.to_columns())?;
    } else {
        serde_json::to_writer_pretty(&mut writer, predictions)?;
    }
    writer.flush()?;
    Ok(())
}
