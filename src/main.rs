//! Sumi-Mirror main entry point
//!
//! This is the command-line interface for the Sumi-Mirror site mirror.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use sumi_mirror::config::{load_config, validate, Config};
use sumi_mirror::crawler::{Mirror, MirrorReport};
use tracing_subscriber::EnvFilter;

/// Sumi-Mirror: save a website for offline reading
///
/// Sumi-Mirror downloads a page together with its images and stylesheets,
/// follows links on the same host up to the given depth, and rewrites links
/// between saved pages so the copy can be browsed from disk.
#[derive(Parser, Debug)]
#[command(name = "sumi-mirror")]
#[command(version = "1.0.0")]
#[command(about = "A recursive site mirror", long_about = None)]
struct Cli {
    /// URL of the first page to mirror
    #[arg(value_name = "URL")]
    url: String,

    /// How many links deep to follow from the first page
    #[arg(short, long)]
    depth: Option<u32>,

    /// Directory the mirrored sites are saved under
    #[arg(short = 'o', long)]
    folder: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_mirror=info,warn"),
            1 => EnvFilter::new("sumi_mirror=debug,info"),
            2 => EnvFilter::new("sumi_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the effective configuration and runs the mirror
async fn run(cli: Cli) -> anyhow::Result<MirrorReport> {
    let config = resolve_config(&cli)?;

    let mut mirror = Mirror::new(config).context("Failed to set up mirror")?;
    let report = mirror
        .run(&cli.url)
        .await
        .with_context(|| format!("Failed to mirror {}", cli.url))?;

    Ok(report)
}

/// Loads the config file, if any, then applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(folder) = &cli.folder {
        config.output.root_dir = folder.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.request_timeout_secs = timeout;
    }

    validate(&config).context("Invalid configuration")?;

    Ok(config)
}

fn print_report(report: &MirrorReport) {
    println!("\n=== Mirror Complete ===");
    println!("  Output: {}", report.root.display());
    println!("  Pages saved: {}", report.crawl.pages_saved);
    if report.crawl.pages_failed > 0 {
        println!("  Pages skipped: {}", report.crawl.pages_failed);
    }
    println!(
        "  Links localized: {} across {} pages",
        report.localize.links_localized, report.localize.pages_rewritten
    );
    if report.localize.pages_failed > 0 {
        println!("  Pages not localized: {}", report.localize.pages_failed);
    }
}
