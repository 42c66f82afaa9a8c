//! Searches a Webtree archive for lines containing a query

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use webtree::search::search;

/// Print every archived line containing QUERY, with the match highlighted
#[derive(Parser, Debug)]
#[command(name = "webtree-search")]
#[command(version)]
struct Cli {
    /// Text to look for
    #[arg(value_name = "QUERY")]
    query: String,

    /// Input directory
    #[arg(short, long, value_name = "DIR", default_value = "output")]
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("webtree=warn"))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    for hit in search(&cli.input, &cli.query)? {
        println!("{}", hit.render(&cli.query));
    }

    Ok(())
}
