use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use skin_tone_palette_wasm::{
    AdjustmentRequest, Analysis, AnalyzerConfig, TonePreset, adjust_and_reclassify, analyze, describe_error,
    render_adjusted,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, error, info};

/// Estimate skin tone from photos and print seasonal color recommendations as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required_unless_present = "dump_config")]
    inputs: Vec<PathBuf>,

    /// JSON configuration file (partial files fall back to defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Lightness delta applied after analysis, -1..1
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    lightness: f32,

    /// Warmth delta applied after analysis, -1..1 (positive is warmer)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    warmth: f32,

    /// Saturation delta applied after analysis, -1..1
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    saturation: f32,

    /// Preset adjustment: lighter, darker, warmer or cooler (overrides the deltas)
    #[arg(short, long)]
    preset: Option<TonePreset>,

    /// Write `<name>.adjusted.png` previews of the adjustment into this directory
    #[arg(long, value_name = "DIR")]
    preview_dir: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Log pipeline stages to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Write the default configuration to this path and exit
    #[arg(long, value_name = "FILE")]
    dump_config: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report<'a> {
    input: &'a Path,
    analysis: &'a Analysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    adjusted: Option<&'a Analysis>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = &args.dump_config {
        AnalyzerConfig::default()
            .to_json_file(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "default configuration written");
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => AnalyzerConfig::from_json_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };

    let request = match args.preset {
        Some(preset) => AdjustmentRequest::preset(preset),
        None => AdjustmentRequest::new(args.lightness, args.warmth, args.saturation),
    };

    let mut failures = 0;
    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;

        let analysis = match analyze(&bytes, None, &config) {
            Ok(analysis) => analysis,
            Err(e) => {
                error!(input = %input.display(), error = %e, "analysis failed");
                eprintln!("{}: {}", input.display(), describe_error(&e));
                failures += 1;
                continue;
            }
        };

        let adjusted = if request.is_identity() {
            None
        } else {
            Some(
                adjust_and_reclassify(&analysis.estimate, &request, &config)
                    .with_context(|| format!("adjustment failed for {}", input.display()))?,
            )
        };

        if let (Some(dir), false) = (&args.preview_dir, request.is_identity()) {
            let png = render_adjusted(&bytes, None, &request, &config)
                .with_context(|| format!("preview failed for {}", input.display()))?;
            let stem = input.file_stem().unwrap_or(input.as_os_str()).to_string_lossy();
            let out = dir.join(format!("{stem}.adjusted.png"));
            fs::write(&out, png).with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), "preview written");
        }

        let report = Report {
            input,
            analysis: &analysis,
            adjusted: adjusted.as_ref(),
        };
        let json = if args.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        }
        .context("failed to encode report")?;
        println!("{json}");
    }

    if failures > 0 {
        bail!("{} of {} images could not be analyzed", failures, args.inputs.len());
    }
    Ok(())
}
