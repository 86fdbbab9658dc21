// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docquad: find the page in a photograph and flatten it.
//
// Entry point. Initialises logging, parses the command line, and runs the
// detector over one image file.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use docquad_core::{DetectionOutcome, DetectorConfig, DocquadError, OutputMode, Result};
use docquad_detect::{Detection, DocumentDetector, LineSegment, Quadrilateral, RandomColors};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "docquad")]
#[command(about = "Detect a document in a photograph and rectify its perspective")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the document in an image and write the requested output.
    Detect(DetectArgs),

    /// Print the default detector configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Path of the output image. The format follows the extension.
    #[arg(long)]
    out: PathBuf,

    /// What to write: the rectified page or a diagnostic overlay.
    #[arg(long, value_enum, default_value_t = ModeArg::Rectify)]
    mode: ModeArg,

    /// JSON detector configuration. Missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write a JSON detection report.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Seed for the Hough pixel order and the overlay palette.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Rectify,
    ShowQuads,
    ShowLines,
}

impl ModeArg {
    fn to_core(self) -> OutputMode {
        match self {
            ModeArg::Rectify => OutputMode::Rectify,
            ModeArg::ShowQuads => OutputMode::ShowQuads,
            ModeArg::ShowLines => OutputMode::ShowLines,
        }
    }
}

/// Summary written by `--report`, in working-image coordinates.
#[derive(Debug, Serialize)]
struct DetectionReport {
    image: String,
    mode: OutputMode,
    working_width: u32,
    working_height: u32,
    outcome: DetectionOutcome,
    segments: Vec<LineSegment>,
    corner_groups: usize,
    candidates: Vec<Quadrilateral>,
    best: Option<Quadrilateral>,
}

impl DetectionReport {
    fn new(image: &Path, mode: OutputMode, detection: Detection) -> Self {
        Self {
            image: image.display().to_string(),
            mode,
            working_width: detection.width,
            working_height: detection.height,
            outcome: detection.outcome(),
            best: detection.best().copied(),
            corner_groups: detection.groups.len(),
            segments: detection.segments,
            candidates: detection.candidates,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::DefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&DetectorConfig::default())?);
            Ok(())
        }
    }
}

/// Configuration from `--config` (or defaults) with `--seed` applied.
fn load_config(args: &DetectArgs) -> Result<DetectorConfig> {
    let mut config = match &args.config {
        Some(path) => DetectorConfig::load(path)?,
        None => DetectorConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.hough.seed = seed;
        config.annotate.seed = seed;
    }
    Ok(config)
}

fn run_detect(args: &DetectArgs) -> Result<()> {
    tracing::info!("Loading image: {}", args.image.display());

    let img = image::open(&args.image).map_err(|e| {
        DocquadError::ImageError(format!("failed to open {}: {e}", args.image.display()))
    })?;
    tracing::info!("Image size: {}x{}", img.width(), img.height());

    let detector = DocumentDetector::new(load_config(args)?)?;
    let mode = args.mode.to_core();

    let (working, detection) = detector.detect_working(&img)?;
    let mut colors = RandomColors::new(detector.config().annotate.seed);
    let output = detector.render(working, &detection, mode, &mut colors);
    output.save(&args.out).map_err(|e| {
        DocquadError::ImageError(format!("failed to write {}: {e}", args.out.display()))
    })?;
    tracing::info!(%mode, "Output written to {}", args.out.display());

    if let Some(report_path) = &args.report {
        let report = DetectionReport::new(&args.image, mode, detection);
        std::fs::write(report_path, serde_json::to_string_pretty(&report)?)?;
        tracing::info!("Report written to {}", report_path.display());
    }

    Ok(())
}
