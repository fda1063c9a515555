//! Command-line interface for the climate pipeline.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::processors::{convert_csv_to_json, transform_csv, TransformStats};
use crate::PipelineConfig;

#[derive(Parser)]
#[command(name = "climate-pipeline")]
#[command(about = "Normalize the climate CSV export into dashboard JSON", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the climate CSV into the dashboard JSON document
    Convert {
        /// Input CSV file (defaults to io.input from the config)
        input: Option<PathBuf>,
        /// Output JSON file (defaults to io.output from the config)
        output: Option<PathBuf>,
        /// Spaces per indentation level, 0 for compact output
        #[arg(long)]
        indent: Option<usize>,
        /// Normalize rows in parallel
        #[arg(long)]
        parallel: bool,
        /// Transform and report without writing the output
        #[arg(long)]
        dry_run: bool,
    },

    /// Write the default configuration as YAML
    InitConfig {
        /// Destination YAML file
        path: PathBuf,
    },
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<62} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.chars().count() > 39 {
            format!("{}...", value.chars().take(36).collect::<String>())
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<39} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

fn stats_items(stats: &TransformStats) -> Vec<(&'static str, String)> {
    vec![
        ("Rows read", stats.rows_read.to_string()),
        ("Records emitted", stats.rows_emitted.to_string()),
        ("Dropped: country", stats.dropped_missing_country.to_string()),
        ("Dropped: year", stats.dropped_missing_year.to_string()),
        ("Dropped: temperature", stats.dropped_missing_temperature.to_string()),
        ("Unparseable dates", stats.invalid_dates.to_string()),
    ]
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    // Load config
    let config = match &cli.config {
        Some(path) => match PipelineConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                error!("Failed to load config from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => PipelineConfig::default(),
    };

    // Dispatch to subcommands
    let result = match cli.command {
        Commands::Convert { input, output, indent, parallel, dry_run } => {
            let mut config = config;
            if let Some(input) = input {
                config.io.input = input;
            }
            if let Some(output) = output {
                config.io.output = output;
            }
            if let Some(indent) = indent {
                config.output.indent = indent;
            }
            if parallel {
                config.processing.parallel = true;
            }
            cmd_convert(&config, dry_run)
        }
        Commands::InitConfig { path } => cmd_init_config(&path, &config),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn cmd_convert(config: &PipelineConfig, dry_run: bool) -> Result<()> {
    let start = Instant::now();
    let input = &config.io.input;
    let output = &config.io.output;

    if dry_run {
        println!("DRY RUN: No output will be written");
    }
    println!("Input: {}", input.display());
    println!("Output: {}", output.display());

    let spinner = create_spinner("Normalizing climate records...");

    let result = if dry_run {
        transform_csv(input, config).map(|out| out.stats)
    } else {
        convert_csv_to_json(input, output, config).map(|summary| summary.stats)
    };

    spinner.finish_and_clear();
    let stats = result.context("Conversion failed")?;

    let mut items = vec![
        ("Input file", input.display().to_string()),
        ("Output file", output.display().to_string()),
    ];
    items.extend(stats_items(&stats));
    items.push(("Dry run", dry_run.to_string()));
    items.push(("Duration", format!("{:.2?}", start.elapsed())));

    print_summary("Conversion Complete", &items);
    if !dry_run {
        println!("Saved {} records to {}", stats.rows_emitted, output.display());
    }
    Ok(())
}

fn cmd_init_config(path: &Path, config: &PipelineConfig) -> Result<()> {
    config
        .to_yaml(path)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    println!("Wrote configuration to {}", path.display());
    Ok(())
}
