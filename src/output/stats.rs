//! Crawl statistics and the end-of-run summary
//!
//! Counters are plain atomics so completion handlers can update them without
//! touching the shared crawl state.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use url::Url;

/// Live counters updated while a crawl runs
#[derive(Debug, Default)]
pub struct CrawlStats {
    pages_fetched: AtomicU64,
    fetch_failures: AtomicU64,
    documents_archived: AtomicU64,
    archive_failures: AtomicU64,
    links_discovered: AtomicU64,
    child_tasks_queued: AtomicU64,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_archived(&self) {
        self.documents_archived.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_archive_failure(&self) {
        self.archive_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_links_discovered(&self, count: usize) {
        self.links_discovered
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_child_queued(&self) {
        self.child_tasks_queued.fetch_add(1, Ordering::Relaxed);
    }

    /// Marks a fetch as started; the returned guard marks it finished on drop
    pub fn fetch_started(&self) -> InFlightGuard<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlightGuard { stats: self }
    }

    /// Fetches currently running
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of fetches seen running at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Freezes the counters into a summary
    pub fn summarize(
        &self,
        root: Url,
        max_depth: u32,
        urls_visited: usize,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> CrawlSummary {
        CrawlSummary {
            root,
            max_depth,
            started_at,
            finished_at,
            urls_visited,
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            documents_archived: self.documents_archived.load(Ordering::Relaxed),
            archive_failures: self.archive_failures.load(Ordering::Relaxed),
            links_discovered: self.links_discovered.load(Ordering::Relaxed),
            child_tasks_queued: self.child_tasks_queued.load(Ordering::Relaxed),
            peak_in_flight: self.peak_in_flight(),
        }
    }
}

/// Decrements the in-flight count when dropped, panics included
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    stats: &'a CrawlStats,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Outcome of a finished crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub root: Url,
    pub max_depth: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Distinct URLs scheduled, root included
    pub urls_visited: usize,

    pub pages_fetched: u64,
    pub fetch_failures: u64,
    pub documents_archived: u64,
    pub archive_failures: u64,

    /// Followable links returned by the extractor, duplicates included
    pub links_discovered: u64,

    /// Tasks created from discovered links (the root task is not counted)
    pub child_tasks_queued: u64,

    pub peak_in_flight: usize,
}

impl CrawlSummary {
    /// Wall-clock duration of the run
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Fetches attempted, successful or not
    pub fn pages_attempted(&self) -> u64 {
        self.pages_fetched + self.fetch_failures
    }
}

/// Prints a summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Run:");
    println!("  Root: {}", summary.root);
    println!("  Depth: {}", summary.max_depth);
    println!("  Started: {}", summary.started_at.to_rfc3339());
    println!("  Finished: {}", summary.finished_at.to_rfc3339());
    println!(
        "  Duration: {:.1}s",
        summary.duration().num_milliseconds() as f64 / 1000.0
    );
    println!();

    println!("Pages:");
    println!("  Visited URLs: {}", summary.urls_visited);
    println!("  Fetched: {}", summary.pages_fetched);
    println!("  Failed: {}", summary.fetch_failures);
    println!("  Archived: {}", summary.documents_archived);
    println!("  Not archived: {}", summary.archive_failures);
    println!();

    println!("Links:");
    println!("  Discovered: {}", summary.links_discovered);
    println!("  Queued: {}", summary.child_tasks_queued);
    println!("  Peak concurrent requests: {}", summary.peak_in_flight);
    println!();

    let success_rate = if summary.pages_attempted() > 0 {
        (summary.pages_fetched as f64 / summary.pages_attempted() as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched)",
        success_rate,
        summary.pages_fetched,
        summary.pages_attempted()
    );
}
