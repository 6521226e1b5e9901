mod config;
mod records;

use clap::Parser;
use config::{Config, EXAMPLE_JSON};
use records::Records;
use roinms::FramePipeline;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Tile-aware NMS over JSON detection records")]
struct Cli {
    /// Path to the input JSON array of detections.
    ///
    /// Each record needs `frame` (any JSON number or string), `bbox` as
    /// `[x_min, y_min, x_max, y_max]` and `score`.
    #[arg(short, long, value_name = "FILE", required_unless_present = "print_example")]
    input: Option<PathBuf>,
    /// Path to a JSON config with `tiles` and `iou_threshold`.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Override the IoU threshold from the config.
    #[arg(long, value_name = "T")]
    iou_threshold: Option<f64>,
    /// Write filtered detections here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive("roinms=info".parse()?)
                    .add_directive("roinms_cli=info".parse()?),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => serde_json::from_str::<Config>(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    if let Some(threshold) = cli.iou_threshold {
        config.iou_threshold = threshold;
    }

    let input_path = cli.input.ok_or("--input is required")?;
    let input: serde_json::Value = serde_json::from_str(&fs::read_to_string(&input_path)?)?;
    let records = Records::parse(input)?;

    let pipeline = FramePipeline::new(config.layout()?).with_config(config.nms());
    let report = pipeline.filter_with_report(&records.detections)?;
    tracing::info!(
        frames = report.frames.len(),
        input = report.total_input(),
        kept = report.total_kept(),
        "filter finished"
    );

    let json = serde_json::to_string_pretty(&records.render(&report.detections))?;
    match cli.output {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    eprintln!(
        "complete: {} of {} detections kept across {} frames",
        report.total_kept(),
        report.total_input(),
        report.frames.len()
    );
    Ok(())
}
