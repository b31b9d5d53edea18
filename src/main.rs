// src/main.rs

use anyhow::{Context, Result};
use bf2lq::config::{INPUT_PACK, OUTPUT_PACK, TEMP_DIR};
use bf2lq::{ConvertConfig, Converter, MatchPolicy};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};

/// What to do when several files in the pack share a library entry's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DuplicateNames {
    /// Use the first file in name-sorted, depth-first order
    FirstMatch,
    /// Skip the entry and report it
    Reject,
}

impl From<DuplicateNames> for MatchPolicy {
    fn from(value: DuplicateNames) -> Self {
        match value {
            DuplicateNames::FirstMatch => MatchPolicy::FirstMatch,
            DuplicateNames::Reject => MatchPolicy::RejectAmbiguous,
        }
    }
}

#[derive(Parser)]
#[command(name = "bf2lq")]
#[command(author, version, about = "Convert a Billfish export pack into a Lingquan archive", long_about = None)]
struct Cli {
    /// Billfish export pack to convert
    #[arg(short, long, default_value = INPUT_PACK)]
    input: PathBuf,

    /// Lingquan archive to create (must not exist)
    #[arg(short, long, default_value = OUTPUT_PACK)]
    output: PathBuf,

    /// Temporary working directory (must not exist)
    #[arg(long, default_value = TEMP_DIR)]
    temp_dir: PathBuf,

    /// How to resolve library entries whose file name occurs more than once
    #[arg(long, value_enum, default_value_t = DuplicateNames::FirstMatch)]
    on_duplicate_name: DuplicateNames,
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    warn!(
        "Tested with Billfish v3.0.33.8 and Lingquan v1.1.2; back up your library if your versions differ"
    );

    let config = ConvertConfig {
        input: cli.input,
        output: cli.output,
        temp_dir: cli.temp_dir,
        match_policy: cli.on_duplicate_name.into(),
    };

    info!("Converting {}", config.input.display());
    let report = Converter::new(config.clone())
        .run()
        .with_context(|| format!("Failed to convert {}", config.input.display()))?;

    println!(
        "Converted {} of {} library entries into {}",
        report.converted,
        report.total,
        config.output.display()
    );
    if report.skipped() > 0 {
        println!("  {} entries produced no new resource", report.skipped());
    }
    if report.duplicates > 0 {
        println!("  {} entries shared content with an earlier entry", report.duplicates);
    }
    if !report.missing.is_empty() {
        println!("  {} entries were not found in the pack:", report.missing.len());
        for name in &report.missing {
            println!("    {}", name);
        }
    }
    if !report.reserved.is_empty() {
        println!("  {} entries have a reserved file name and were skipped:", report.reserved.len());
        for name in &report.reserved {
            println!("    {}", name);
        }
    }
    if !report.ambiguous.is_empty() {
        println!("  {} entries matched several files and were skipped:", report.ambiguous.len());
        for name in &report.ambiguous {
            println!("    {}", name);
        }
    }

    Ok(())
}
