//! Geodesic dome calculator
//!
//! Subcommands:
//! - `summary`: print the congruent triangle groups and edge counts of a dome
//! - `export`: write the dome as STL, DXF or a flattened panel layout (STL / SVG)

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use geodome_lib::{
    clip::ClipMode,
    export::{write_document, Format},
    Dome, DomeParams,
};
use log::info;

#[derive(Parser, Debug)]
#[command(name = "geodome")]
#[command(about = "Compute geodesic dome triangulations and export their parts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the congruent triangle groups and edge lengths of a dome
    Summary(SummaryArgs),
    /// Write the dome, or its flattened panels, to a file
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct DomeArgs {
    /// JSON file with any of "radius", "frequency" and "mode"; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sphere radius in metres
    #[arg(short, long)]
    radius: Option<f64>,

    /// Icosahedron subdivision frequency (1-6)
    #[arg(short, long)]
    frequency: Option<usize>,

    /// "full sphere" or a dome fraction "<k>/8"
    #[arg(short, long)]
    mode: Option<ClipMode>,
}

impl DomeArgs {
    fn params(&self) -> Result<DomeParams> {
        let mut params = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => DomeParams::default(),
        };

        if let Some(radius) = self.radius {
            params.radius = radius;
        }
        if let Some(frequency) = self.frequency {
            params.frequency = frequency;
        }
        if let Some(mode) = self.mode {
            params.mode = mode;
        }
        Ok(params)
    }
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[command(flatten)]
    dome: DomeArgs,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    dome: DomeArgs,

    /// One of stl, stl-binary, dxf, panels-stl, svg, svg-cut
    #[arg(long, default_value = "stl")]
    format: Format,

    /// Output file (defaults to a name based on the format)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn run_summary(args: SummaryArgs) -> Result<()> {
    let dome = Dome::generate(args.dome.params()?)?;
    let summary = dome.summary();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary);
    }
    Ok(())
}

fn run_export(args: ExportArgs) -> Result<()> {
    let dome = Dome::generate(args.dome.params()?)?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(args.format.default_file_name()));

    let exporter = args.format.exporter();
    let skipped = write_document(&output, exporter.as_ref(), &dome.classification)
        .with_context(|| format!("failed to export {}", output.display()))?;
    info!(
        "exported {} of {} groups as {} to {}",
        dome.classification.groups.len() - skipped.len(),
        dome.classification.groups.len(),
        args.format.name(),
        output.display()
    );
    for group in skipped.iter() {
        println!("Skipped {}: {}", group.signature, group.error);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Summary(args) => run_summary(args),
        Commands::Export(args) => run_export(args),
    }
}
