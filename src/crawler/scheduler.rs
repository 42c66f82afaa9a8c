//! Crawl scheduler: dispatch loop, concurrency gate and completion handling
//!
//! One dispatch loop pulls tasks off the queue, takes a slot from the
//! concurrency gate and spawns the fetch. Each spawned fetch runs its own
//! completion: archive the result, extract links, queue the unseen ones.
//! The loop and the completions share only the queue, the gate, the visited
//! set and the statistics counters.
//!
//! # Termination
//!
//! A spawned fetch finishes only after all of its children are queued, and
//! only fetches ever queue tasks. The dispatch loop owns the set of running
//! fetches, so when it sees the queue empty and no fetch left in that set,
//! no more work can appear.

use crate::config::CrawlerConfig;
use crate::crawler::archiver::Archiver;
use crate::crawler::extractor::extract_links;
use crate::crawler::fetcher::{FetchError, FetchedPage, Fetcher};
use crate::crawler::task::{Task, TaskQueue};
use crate::output::{CrawlStats, CrawlSummary};
use crate::state::VisitedSet;
use crate::CrawlError;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use url::Url;

/// State shared between the dispatch loop and every completion
struct CrawlContext {
    archiver: Archiver,
    visited: VisitedSet,
    queue: TaskQueue,
    stats: CrawlStats,
}

impl CrawlContext {
    /// Handles the outcome of one fetch
    ///
    /// Fetch and archive failures are logged and absorbed; only a queue
    /// overflow is returned as an error.
    async fn complete(
        &self,
        task: &Task,
        outcome: Result<FetchedPage, FetchError>,
    ) -> Result<(), CrawlError> {
        match outcome {
            Ok(page) => {
                tracing::info!(
                    "completed crawling of {} successfully (HTTP {})",
                    task.url(),
                    page.status
                );
                self.stats.record_fetched();
                self.persist(task.url(), &page.body).await;

                if task.follows_links() {
                    self.follow_links(task, &page.body)?;
                }
            }
            Err(e) => {
                tracing::error!("crawling of {} failed: {}", task.url(), e);
                self.stats.record_fetch_failure();
                // Failures are archived too so partial crawls can be inspected
                self.persist(task.url(), &e.to_string()).await;
            }
        }

        Ok(())
    }

    async fn persist(&self, url: &Url, document: &str) {
        match self.archiver.archive(url, document).await {
            Ok(_) => self.stats.record_archived(),
            Err(e) => {
                tracing::warn!("{} not archived: {}", url, e);
                self.stats.record_archive_failure();
            }
        }
    }

    fn follow_links(&self, task: &Task, body: &str) -> Result<(), CrawlError> {
        let links = extract_links(task.url(), body);
        self.stats.record_links_discovered(links.len());

        for link in links {
            if !self.visited.insert(&link) {
                continue;
            }
            if let Some(child) = task.child(link) {
                self.queue.push(child)?;
                self.stats.record_child_queued();
            }
        }

        Ok(())
    }
}

/// Depth-limited concurrent crawler
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use webtree::config::Config;
/// use webtree::crawler::{Archiver, Crawler, HttpFetcher};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let fetcher = HttpFetcher::new(&config.http)?;
/// let crawler = Crawler::new(Arc::new(fetcher), Archiver::new("output"), &config.crawler);
///
/// let summary = crawler.run(Url::parse("http://example.com")?, 1).await?;
/// println!("fetched {} pages", summary.pages_fetched);
/// # Ok(())
/// # }
/// ```
pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    archiver: Archiver,
    concurrency: usize,
    queue_capacity: usize,
}

impl Crawler {
    /// Creates a crawler
    ///
    /// `config.concurrency` bounds the fetches in flight and
    /// `config.queue_capacity` bounds the tasks waiting for a slot. Both are
    /// raised to at least 1.
    pub fn new(fetcher: Arc<dyn Fetcher>, archiver: Archiver, config: &CrawlerConfig) -> Self {
        Self {
            fetcher,
            archiver,
            concurrency: config.concurrency.max(1),
            queue_capacity: config.queue_capacity.max(1),
        }
    }

    /// Crawls from `root`, following links up to `max_depth` levels deep
    ///
    /// Returns once the queue is drained and no fetch is running. Per-page
    /// failures never end the run; a queue overflow does, with
    /// [`CrawlError::QueueFull`], after cancelling the fetches still running.
    pub async fn run(&self, root: Url, max_depth: u32) -> Result<CrawlSummary, CrawlError> {
        let started_at = Utc::now();

        let (queue, mut pending) = TaskQueue::bounded(self.queue_capacity);
        let context = Arc::new(CrawlContext {
            archiver: self.archiver.clone(),
            visited: VisitedSet::new(),
            queue,
            stats: CrawlStats::new(),
        });
        let gate = Arc::new(Semaphore::new(self.concurrency));
        let mut in_flight: JoinSet<Result<(), CrawlError>> = JoinSet::new();

        context.visited.insert(&root);
        context.queue.push(Task::new(root.clone(), max_depth))?;

        tracing::info!(
            "webtree started crawling of {} with depth {} ({} concurrent requests)",
            root,
            max_depth,
            self.concurrency
        );

        loop {
            while let Some(joined) = in_flight.try_join_next() {
                Self::settle(joined, &mut in_flight)?;
            }

            let task = match pending.try_recv() {
                Ok(task) => task,
                Err(TryRecvError::Empty) => {
                    if in_flight.is_empty() {
                        break;
                    }
                    // Wait for a new task or for a fetch to finish
                    tokio::select! {
                        Some(task) = pending.recv() => task,
                        Some(joined) = in_flight.join_next() => {
                            Self::settle(joined, &mut in_flight)?;
                            continue;
                        }
                        else => break,
                    }
                }
                // The context keeps a sender alive for the whole run
                Err(TryRecvError::Disconnected) => break,
            };

            // Blocks while every slot is busy
            let Ok(permit) = Arc::clone(&gate).acquire_owned().await else {
                break;
            };

            let context = Arc::clone(&context);
            let fetcher = Arc::clone(&self.fetcher);
            in_flight.spawn(async move {
                // Both are released on every exit path, panics included
                let _permit = permit;
                let _in_flight = context.stats.fetch_started();

                tracing::debug!("fetching {} (depth {})", task.url(), task.depth());
                let outcome = fetcher.fetch(task.url()).await;
                context.complete(&task, outcome).await
            });
        }

        let summary = context.stats.summarize(
            root,
            max_depth,
            context.visited.len(),
            started_at,
            Utc::now(),
        );

        tracing::info!(
            "done. {} pages fetched, {} failed, {} URLs visited",
            summary.pages_fetched,
            summary.fetch_failures,
            summary.urls_visited
        );

        Ok(summary)
    }

    /// Inspects a finished fetch, aborting the rest of the run on fatal errors
    fn settle(
        joined: Result<Result<(), CrawlError>, JoinError>,
        in_flight: &mut JoinSet<Result<(), CrawlError>>,
    ) -> Result<(), CrawlError> {
        match joined {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                tracing::error!("aborting crawl: {}", e);
                in_flight.abort_all();
                Err(e)
            }
            Err(e) if e.is_panic() => {
                tracing::error!("crawl task panicked: {}", e);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("crawl task cancelled: {}", e);
                Ok(())
            }
        }
    }
}
