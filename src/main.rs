use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing::error;

use rdf_alignment_filter::{
    dataset::{filter_dataset, DatasetLayout},
    index::AlignmentIndex,
};

#[derive(Parser)]
#[command(
    name = "rdf_alignment_filter",
    about = "Reduce RDF dataset dumps to the entities used by an alignment graph",
    long_about = None,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter both sides of a dataset against its alignment links
    Filter {
        /// Dataset directory (holds the alignment file and both dumps)
        dataset_dir: PathBuf,

        /// Explicit layout file (defaults to layout.yaml/json in the
        /// dataset directory, then the standard file names)
        #[arg(short, long)]
        layout: Option<PathBuf>,

        /// Override the output file suffix
        #[arg(short, long)]
        suffix: Option<String>,
    },

    /// Build only the alignment index and print its sizes
    Inspect {
        /// Dataset directory
        dataset_dir: PathBuf,

        /// Explicit layout file
        #[arg(short, long)]
        layout: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Filter {
            dataset_dir,
            layout,
            suffix,
        } => filter_command(dataset_dir, layout, suffix),
        Commands::Inspect {
            dataset_dir,
            layout,
        } => inspect_command(dataset_dir, layout),
    }
}

fn load_layout(dataset_dir: &PathBuf, layout: Option<PathBuf>) -> Result<DatasetLayout> {
    match layout {
        Some(path) => DatasetLayout::from_file(path),
        None => DatasetLayout::for_dataset_dir(dataset_dir),
    }
}

fn filter_command(
    dataset_dir: PathBuf,
    layout: Option<PathBuf>,
    suffix: Option<String>,
) -> Result<()> {
    println!("{}", "Filtering dataset...".bright_blue().bold());

    let mut layout = load_layout(&dataset_dir, layout)?;
    if let Some(suffix) = suffix {
        layout.output_suffix = suffix;
    }

    println!(" Dataset: {}", dataset_dir.display().to_string().bright_green());
    println!(" Alignment: {}", layout.align);

    let report = match filter_dataset(&dataset_dir, &layout) {
        Ok(report) => report,
        Err(e) => {
            error!("filtering failed: {}", e);
            return Err(e.into());
        }
    };

    println!(
        " Alignment links cover {} left and {} right entities",
        report.left_uris.to_string().bright_cyan(),
        report.right_uris.to_string().bright_cyan()
    );
    for side in [&report.left, &report.right] {
        println!(
            " {} kept {} of {} blocks -> {}",
            side.input.display(),
            side.stats.blocks_kept.to_string().bright_cyan(),
            side.stats.blocks_kept + side.stats.blocks_dropped,
            side.output.display().to_string().bright_green()
        );
    }

    println!("{}", "Filtering completed successfully!".bright_green());
    Ok(())
}

fn inspect_command(dataset_dir: PathBuf, layout: Option<PathBuf>) -> Result<()> {
    println!("{}", "Inspecting alignment index...".bright_blue().bold());

    let layout = load_layout(&dataset_dir, layout)?;
    let align_path = dataset_dir.join(&layout.align);

    let index = AlignmentIndex::from_ntriples_file(&align_path)?;

    println!(" Alignment: {}", align_path.display().to_string().bright_green());
    println!(" Distinct left URIs: {}", index.left().len().to_string().bright_cyan());
    println!(" Distinct right URIs: {}", index.right().len().to_string().bright_cyan());

    Ok(())
}
