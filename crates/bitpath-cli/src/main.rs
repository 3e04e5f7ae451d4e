//! bitpath: trace a 1-bit bitmap into axis-aligned outlines.
//!
//! Reads a text bitmap (rows of `0`/`1`) or a raster image, traces its
//! filled region, and writes the result as an SVG document, bare path
//! data, JSON, or a plain ring listing. Useful for:
//!
//! - Turning pixel glyphs, icons, or QR codes into compact SVG
//! - Inspecting the rings produced for a tricky bitmap
//! - Measuring per-stage durations on large inputs
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin bitpath -- [OPTIONS] <INPUT>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod input;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use bitpath_export::SvgOptions;
use bitpath_trace::{Outline, SystemClock, TraceDiagnostics};
use clap::Parser;

use crate::input::RasterConfig;
use crate::render::Format;

/// Trace a 1-bit bitmap into axis-aligned outlines.
///
/// Text inputs hold rows of `0`/`1` (one per line or `/`-separated).
/// Files with an image extension (PNG, JPEG, BMP, GIF, WebP) are
/// converted to grayscale and thresholded.
#[derive(Parser)]
#[command(name = "bitpath", version)]
struct Cli {
    /// Path to the input bitmap (text or image).
    input: PathBuf,

    /// Pixels per row for text input (default: length of the first row).
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    width: Option<usize>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Svg)]
    format: Format,

    /// Write output to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Luma below this value counts as filled (images only).
    #[arg(long, default_value_t = RasterConfig::DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Swap filled and empty pixels.
    #[arg(long)]
    invert: bool,

    /// SVG background fill.
    #[arg(long, default_value = bitpath_export::svg::DEFAULT_BACKGROUND)]
    background: String,

    /// Omit the SVG background path.
    #[arg(long, conflicts_with = "background")]
    no_background: bool,

    /// SVG fill of the traced outline (default: black).
    #[arg(long)]
    fill: Option<String>,

    /// SVG `<title>` (default: input file name without extension).
    #[arg(long)]
    title: Option<String>,

    /// Print a per-stage diagnostics report to stderr.
    #[arg(long)]
    diagnostics: bool,

    /// Print diagnostics to stderr as JSON instead of a report.
    #[arg(long)]
    json_diagnostics: bool,

    /// Number of traces to run for timing.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Full raster config as a JSON string.
    ///
    /// When provided, `--threshold` and `--invert` are ignored. The JSON
    /// must be a valid `RasterConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Build a [`RasterConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<RasterConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(RasterConfig {
        threshold: cli.threshold,
        invert: cli.invert,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let loaded = match input::load(&cli.input, cli.width, &config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error loading {}: {e}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };

    let verbose = cli.diagnostics || cli.json_diagnostics || cli.runs > 1;
    if verbose {
        eprintln!(
            "Input: {} ({} bits, width {})",
            cli.input.display(),
            loaded.bits.len(),
            loaded.width,
        );
        eprintln!("Config: {config:?}");
        eprintln!("Runs: {}", cli.runs);
        eprintln!();
    }

    let mut outline = None;
    let mut all_diagnostics = Vec::with_capacity(cli.runs);

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        match bitpath_trace::trace_with_diagnostics(&loaded.bits, loaded.width, &SystemClock) {
            Ok((traced, diagnostics)) => {
                if cli.json_diagnostics {
                    match serde_json::to_string_pretty(&diagnostics) {
                        Ok(json) => eprintln!("{json}"),
                        Err(e) => {
                            eprintln!("Error serializing diagnostics: {e}");
                            return ExitCode::FAILURE;
                        }
                    }
                } else if cli.diagnostics {
                    eprintln!("{}", diagnostics.report());
                }

                if outline.is_none() {
                    outline = Some(traced);
                }
                all_diagnostics.push(diagnostics);
            }
            Err(e) => {
                eprintln!("Trace error: {e}");
                return ExitCode::FAILURE;
            }
        }

        if cli.runs > 1 {
            eprintln!();
        }
    }

    if cli.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    let Some(outline) = outline else {
        return ExitCode::FAILURE;
    };
    write_output(&cli, &outline)
}

/// Render the outline and write it to `--output` or stdout.
fn write_output(cli: &Cli, outline: &Outline) -> ExitCode {
    let stem = cli
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("bitpath");
    let desc = format!(
        "{}x{} bitmap, {} rings",
        outline.width(),
        outline.height(),
        outline.ring_count(),
    );
    let options = SvgOptions {
        background: (!cli.no_background).then_some(cli.background.as_str()),
        fill: cli.fill.as_deref(),
        title: Some(cli.title.as_deref().unwrap_or(stem)),
        description: Some(&desc),
    };

    let text = match render::render(outline, cli.format, &options) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error rendering output: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.output {
        Some(ref path) => match std::fs::write(path, &text) {
            Ok(()) => {
                eprintln!("Written to {} ({} bytes)", path.display(), text.len());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error writing {}: {e}", path.display());
                ExitCode::FAILURE
            }
        },
        None => {
            print!("{text}");
            ExitCode::SUCCESS
        }
    }
}

/// Function pointer type for extracting a stage duration from diagnostics.
type StageExtractor = fn(&TraceDiagnostics) -> std::time::Duration;

/// Print aggregated timing across multiple runs to stderr.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[TraceDiagnostics]) {
    if all_diagnostics.is_empty() {
        eprintln!("Warning: no diagnostics to summarize");
        return;
    }

    eprintln!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    eprintln!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    // Per-stage means.
    eprintln!();
    eprintln!("{:<16} {:>12}", "Stage", "Mean (ms)");
    eprintln!("{}", "-".repeat(32));

    let stage_extractors: &[(&str, StageExtractor)] = &[
        ("Edge Map", |d| d.edge_map.duration),
        ("Walk", |d| d.walk.duration),
        ("Merge", |d| d.merge.duration),
        ("Sequence", |d| d.sequence.duration),
    ];

    for (name, extractor) in stage_extractors {
        let total: f64 = all_diagnostics
            .iter()
            .map(|d| extractor(d).as_secs_f64() * 1000.0)
            .sum();
        let stage_mean = total / all_diagnostics.len() as f64;
        eprintln!("{name:<16} {stage_mean:>10.3}ms");
    }
}
