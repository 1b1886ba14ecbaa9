//! Gaze Agreement CLI Application
//!
//! This is the command-line interface for comparing gaze codings.
//! It uses the gaze-agreement library and adds:
//! - Pair comparison of two annotation files (text or JSON output)
//! - Batch comparison over a participant roster (parallel, per-row failures)
//! - CSV output of the annotated roster

use anyhow::{bail, Result};
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};

mod batch;
mod config;
mod report;

use report::{OutputFormat, PairReport};

/// Gaze Agreement - Compare two codings of where a subject was looking
#[derive(Parser, Debug)]
#[command(name = "gaze-agreement-cli")]
#[command(about = "Compare human and automated gaze codings", long_about = None)]
#[command(version)]
struct Args {
    /// Reference coding; its codingactive mark defines the analysis window
    #[arg(short, long, value_name = "FILE")]
    base: Option<PathBuf>,

    /// Coding to compare against the reference
    #[arg(long, value_name = "FILE")]
    compare: Option<PathBuf>,

    /// Output format for pair comparisons
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Path to batch configuration file (batch.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of worker threads for batch mode (default: one per core)
    #[arg(short, long, value_name = "COUNT")]
    jobs: Option<usize>,

    /// Comparison block size in milliseconds
    #[arg(long, value_name = "MS")]
    block_size: Option<u64>,

    /// Number of header lines in each annotation file
    #[arg(long, value_name = "COUNT")]
    header_lines: Option<usize>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Gaze Agreement CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using agreement library v{}", gaze_agreement::VERSION);

    if args.base.is_some() || args.compare.is_some() {
        pair_mode(&args)?;
    } else if let Some(config_path) = &args.config {
        batch_mode(config_path, &args)?;
    } else {
        println!("Gaze Agreement - No input specified");
        println!("\nQuick Start:");
        println!("  gaze-agreement-cli --base human.txt --compare auto.txt");
        println!("\nFor a whole participant roster:");
        println!("  gaze-agreement-cli --config batch.toml");
        println!("\nUse --help for more options");
    }

    Ok(())
}

/// Pair mode - compare two annotation files and print the statistics
fn pair_mode(args: &Args) -> Result<()> {
    let (Some(base), Some(compare)) = (&args.base, &args.compare) else {
        bail!("--base and --compare must be given together");
    };

    let mut analysis = gaze_agreement::AgreementConfig::new();
    config::apply_overrides(&mut analysis, args.block_size, args.header_lines);

    let stats = gaze_agreement::compare_files(base, compare, &analysis)?;

    PairReport::new(base, compare, stats).write(&mut io::stdout().lock(), args.format)
}

/// Batch mode - compare every roster row and write the annotated roster
fn batch_mode(config_path: &Path, args: &Args) -> Result<()> {
    log::info!("Loading configuration from: {:?}", config_path);
    let mut app_config = config::load_config(config_path)?;
    config::apply_overrides(&mut app_config.analysis, args.block_size, args.header_lines);
    app_config.analysis.validate()?;
    log::debug!("Configuration loaded successfully");

    let summary = batch::run_batch(&app_config, args.jobs)?;

    if !args.quiet {
        println!("═══════════════════════════════════════════════");
        println!("  Gaze Agreement - Batch Summary");
        println!("═══════════════════════════════════════════════");
        println!("  Compared: {}", summary.succeeded);
        println!("  Failed:   {}", summary.failed);
        println!("  Output:   {:?}", app_config.output.path);
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
