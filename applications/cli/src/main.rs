//! Patina command line front end
//!
//! File-in/file-out conversion: the desktop shell spawns this binary and
//! relays its exit code. Usage:
//!
//! ```text
//! patina <input> <output.wav> [options]
//!     --mode manual|assisted|automatic   (default: manual)
//!     --preset vocal|instrument|speech|music
//!     --intensity <0-100>                (default: 0)
//!     --seed <u64>                       reproducible rendering
//!     --gain <0.5-2.0>
//!     --reverb-duration <secs>
//!     --reverb-decay <exp>
//!     --delay-time <secs>
//!     --delay-feedback <0-1)
//!     --dry-wet <0-1>
//! ```

use anyhow::{bail, Context, Result};
use patina_core::{AudioParameters, ContentClass, ProcessingMode};
use patina_engine::Processor;
use std::path::PathBuf;
use tracing::info;

struct Args {
    input: PathBuf,
    output: PathBuf,
    mode: ProcessingMode,
    intensity: f32,
    seed: Option<u64>,
    params: AudioParameters,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = parse_args().context("invalid arguments")?;

    let input = std::fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    info!(bytes = input.len(), "read input file");

    let processor = match args.seed {
        Some(seed) => Processor::with_seed(seed),
        None => Processor::new(),
    };

    let output = processor
        .process(&input, args.params, args.mode, args.intensity)
        .context("processing failed")?;

    std::fs::write(&args.output, &output.wav)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!(
        "Wrote {} ({} bytes)",
        args.output.display(),
        output.wav.len()
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&output.report).context("report serialization")?
    );
    Ok(())
}

fn parse_args() -> Result<Args> {
    let mut positional: Vec<String> = Vec::new();
    let mut mode = ProcessingMode::Manual;
    let mut intensity = 0.0f32;
    let mut seed = None;
    let mut params = AudioParameters::default();

    let mut argv = std::env::args().skip(1);
    while let Some(arg) = argv.next() {
        if let Some(flag) = arg.strip_prefix("--") {
            let mut value = || {
                argv.next()
                    .with_context(|| format!("--{flag} requires a value"))
            };
            match flag {
                "mode" => {
                    mode = match value()?.as_str() {
                        "manual" => ProcessingMode::Manual,
                        "assisted" => ProcessingMode::Assisted,
                        "automatic" => ProcessingMode::Automatic,
                        other => bail!("unknown mode '{other}'"),
                    };
                }
                "preset" => {
                    let class = match value()?.as_str() {
                        "vocal" => ContentClass::Vocal,
                        "instrument" => ContentClass::Instrument,
                        "speech" => ContentClass::Speech,
                        "music" => ContentClass::Music,
                        other => bail!("unknown preset '{other}'"),
                    };
                    params = patina_analysis::preset_for(class).params;
                }
                "intensity" => intensity = value()?.parse().context("--intensity")?,
                "seed" => seed = Some(value()?.parse().context("--seed")?),
                "gain" => params.gain = value()?.parse().context("--gain")?,
                "reverb-duration" => {
                    params.reverb_duration = value()?.parse().context("--reverb-duration")?;
                }
                "reverb-decay" => {
                    params.reverb_decay = value()?.parse().context("--reverb-decay")?;
                }
                "delay-time" => params.delay_time = value()?.parse().context("--delay-time")?,
                "delay-feedback" => {
                    params.delay_feedback = value()?.parse().context("--delay-feedback")?;
                }
                "dry-wet" => params.dry_wet_mix = value()?.parse().context("--dry-wet")?,
                other => bail!("unknown option '--{other}'"),
            }
        } else {
            positional.push(arg);
        }
    }

    let [input, output] = positional.as_slice() else {
        bail!("usage: patina <input> <output.wav> [options]");
    };

    Ok(Args {
        input: PathBuf::from(input),
        output: PathBuf::from(output),
        mode,
        intensity,
        seed,
        params,
    })
}
