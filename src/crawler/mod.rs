//! Crawler module for web page fetching and archiving
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - Same-domain link extraction
//! - Mirroring fetched pages to disk
//! - The bounded, concurrent crawl scheduler

mod archiver;
mod extractor;
mod fetcher;
mod scheduler;
mod task;

pub use archiver::{ArchiveError, Archiver};
pub use extractor::extract_links;
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use scheduler::Crawler;
pub use task::{Task, TaskQueue};

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::CrawlError;
use std::sync::Arc;
use url::Url;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client from `config.http`
/// 2. Archive into `config.output.directory`
/// 3. Crawl from `root` up to `config.crawler.max_depth` levels deep
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl ran to completion
/// * `Err(CrawlError)` - The client could not be built or the queue overflowed
pub async fn crawl(config: &Config, root: Url) -> Result<CrawlSummary, CrawlError> {
    let fetcher = HttpFetcher::new(&config.http)?;
    let archiver = Archiver::new(&config.output.directory);
    let crawler = Crawler::new(Arc::new(fetcher), archiver, &config.crawler);

    crawler.run(root, config.crawler.max_depth).await
}
