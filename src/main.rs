//! Sumi-Harvest main entry point
//!
//! This is the command-line interface for the Sumi-Harvest link harvester.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use sumi_harvest::config::{load_config_with_hash, validate, Config};
use sumi_harvest::crawler::crawl;
use sumi_harvest::input::read_seed_urls;
use tracing_subscriber::EnvFilter;

/// Sumi-Harvest: a concurrent link harvester
///
/// Fetches every seed URL concurrently, extracts the links on each page,
/// and writes one `source<TAB>link` line per link to the results file.
#[derive(Parser, Debug)]
#[command(name = "sumi-harvest")]
#[command(version)]
#[command(about = "A concurrent link harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Newline-delimited seed URL file (overrides the config)
    #[arg(long, value_name = "FILE")]
    urls: Option<PathBuf>,

    /// Results file, truncated on every run (overrides the config)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Load config and seeds, show what would be crawled, and exit
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load(&cli)?;

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    crawl(&config).await.context("Crawl failed")?;
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; `RUST_LOG` takes precedence over the flags.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("sumi_harvest=info,warn"),
                1 => EnvFilter::new("sumi_harvest=debug,info"),
                _ => EnvFilter::new("sumi_harvest=trace,debug"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file (if any) and applies command-line overrides
fn load(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(urls) = &cli.urls {
        config.input.urls_path = urls.display().to_string();
    }
    if let Some(output) = &cli.output {
        config.output.results_path = output.display().to_string();
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the plan without sending requests
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let seeds = read_seed_urls(Path::new(&config.input.urls_path))?;

    println!("=== Sumi-Harvest Dry Run ===\n");

    println!("HTTP:");
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Connect timeout: {}s", config.http.connect_timeout_secs);
    println!("  User agent: {}", config.http.user_agent);
    println!(
        "  Max concurrent requests: {}",
        config.http.max_concurrent_requests
    );

    println!("\nExtraction mode: {:?}", config.extract.mode);

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path);

    println!("\nSeeds ({}) from {}:", seeds.len(), config.input.urls_path);
    for seed in &seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} seed URLs", seeds.len());

    Ok(())
}
