//! Tabulate diffracted beam vectors over detector pixels
//!
//! Writes one `(slow, fast)` array of `[x, y, z]` beam vectors per panel as
//! JSON in ndarray's serde layout, sampled at sub-pixel centres or corners.
//!
//! Usage:
//! ```
//! cargo run --release --bin beam_vector_map -- --experiment experiment.json --n-div 2
//! ```

use clap::Parser;
use predictor::{beam_vector_map, beam_vector_map_detector};
use shared::Experiment;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Command line arguments for beam vector tabulation
#[derive(Parser, Debug)]
#[command(
    name = "Beam Vector Map",
    about = "Computes the diffracted beam vector at every detector sub-pixel",
    long_about = None
)]
struct Args {
    /// Experiment description (JSON); only the beam and detector are used
    #[arg(long)]
    experiment: PathBuf,

    /// Only tabulate this panel (default: all panels)
    #[arg(long)]
    panel: Option<usize>,

    /// Sub-divisions per pixel along each axis
    #[arg(long, default_value_t = 1)]
    n_div: usize,

    /// Sample sub-pixel corners instead of centres
    #[arg(long)]
    corner: bool,

    /// Output file
    #[arg(long, default_value = "beam_vectors.json")]
    output: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    let experiment = Experiment::load_from_file(&args.experiment)?;
    let detector = &experiment.detector;

    let maps = match args.panel {
        Some(index) => {
            let panel = detector.panel(index).ok_or_else(|| {
                format!(
                    "panel {index} out of range, detector has {} panel(s)",
                    detector.len()
                )
            })?;
            vec![beam_vector_map(
                panel,
                &experiment.beam,
                args.n_div,
                args.corner,
            )?]
        }
        None => beam_vector_map_detector(detector, &experiment.beam, args.n_div, args.corner)?,
    };

    for map in &maps {
        let (rows, cols) = map.dim();
        log::info!("Tabulated {cols}x{rows} beam vectors");
    }

    let mut writer = BufWriter::new(File::create(&args.output)?);
    serde_json::to_writer(&mut writer, &maps)?;
    writer.flush()?;
    println!(
        "Wrote {} beam vector map(s) to {}",
        maps.len(),
        args.output.display()
    );
    Ok(())
}
