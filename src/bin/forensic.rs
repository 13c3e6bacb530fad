use std::{fs, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use copy_move_forensics::{CopyMoveAnalyzer, CopyMoveConfig, report::JsonReport};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "forensic", version, about = "Copy-move forgery detection")]
struct Cli {
    /// Input image
    #[arg(long = "in", value_name = "FILE")]
    input: PathBuf,

    /// Output image with forged regions highlighted
    #[arg(long = "out", value_name = "FILE")]
    output: PathBuf,

    /// JSON file with detector settings; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Blur radius
    #[arg(long)]
    blur: Option<u32>,

    /// Block size
    #[arg(long)]
    bs: Option<u32>,

    /// Offset threshold
    #[arg(long)]
    ot: Option<usize>,

    /// Distance threshold
    #[arg(long)]
    dt: Option<f64>,

    /// Forgery (separation) threshold
    #[arg(long)]
    ft: Option<f64>,

    /// Maximum working width/height; 0 disables resizing
    #[arg(long, value_name = "PIXELS")]
    max_size: Option<u32>,

    /// Write a JSON report
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn detector_config(&self) -> Result<CopyMoveConfig> {
        let mut config = match &self.config {
            Some(path) => CopyMoveConfig::from_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => CopyMoveConfig::default(),
        };

        if let Some(blur) = self.blur {
            config.blur_radius = blur;
        }
        if let Some(bs) = self.bs {
            config.block_size = bs;
        }
        if let Some(ot) = self.ot {
            config.offset_threshold = ot;
        }
        if let Some(dt) = self.dt {
            config.distance_threshold = dt;
        }
        if let Some(ft) = self.ft {
            config.separation_threshold = ft;
        }
        if let Some(max_size) = self.max_size {
            config.max_image_size = (max_size > 0).then_some(max_size);
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO })
        .with_target(false)
        .init();

    let config = cli.detector_config()?;
    let start = Instant::now();

    let analyzer = CopyMoveAnalyzer::new(&cli.input)
        .with_context(|| format!("opening {}", cli.input.display()))?
        .with_config(config);

    let result = analyzer.detect().context("running detection")?;

    println!("Number of forged blocks detected: {}", result.forged_regions.len());

    analyzer
        .render(&result)
        .save(&cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    if let Some(path) = &cli.report {
        let report = JsonReport::new(&result, analyzer.config(), analyzer.path());
        fs::write(path, report.to_json()?)
            .with_context(|| format!("writing report {}", path.display()))?;
    }

    println!("{}", result.verdict());
    println!("\nDone in: {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
