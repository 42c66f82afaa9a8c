//! Webtree main entry point
//!
//! This is the command-line interface for the Webtree crawler.

use clap::Parser;
use std::path::PathBuf;
use webtree::config::{load_config, validate, Config};
use webtree::crawler::crawl;
use webtree::output::print_summary;
use webtree::parse_root_url;
use tracing_subscriber::EnvFilter;

/// Webtree: mirror a web subtree to disk
///
/// Webtree fetches the root page, follows same-domain links up to the given
/// depth and writes every page to `{output}/{host}/{path}`.
#[derive(Parser, Debug)]
#[command(name = "webtree")]
#[command(version)]
#[command(about = "Mirror a web subtree to disk", long_about = None)]
struct Cli {
    /// Root URL to crawl
    #[arg(value_name = "URL")]
    url: String,

    /// Depth of crawl [default: 1]
    #[arg(short, long)]
    depth: Option<u32>,

    /// Number of concurrently executed requests [default: 2]
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Output directory [default: output]
    #[arg(short, long, value_name = "DIR")]
    output: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e);
        }
    };

    let root = parse_root_url(&cli.url)?;

    tracing::info!(
        "Crawling {} (depth {}, {} concurrent requests) into {}",
        root,
        config.crawler.max_depth,
        config.crawler.concurrency,
        config.output.directory
    );

    match crawl(&config, root).await {
        Ok(summary) => {
            if !cli.quiet {
                print_summary(&summary);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
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
            0 => EnvFilter::new("webtree=info,warn"),
            1 => EnvFilter::new("webtree=debug,info"),
            2 => EnvFilter::new("webtree=trace,debug"),
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

/// Loads the config file, if any, and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(output) = &cli.output {
        config.output.directory = output.clone();
    }

    validate(&config)?;
    Ok(config)
}
