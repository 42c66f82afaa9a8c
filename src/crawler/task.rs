//! Crawl tasks and the bounded queue that carries them

use crate::CrawlError;
use tokio::sync::mpsc::{self, error::TrySendError};
use url::Url;

/// A unit of crawl work: fetch `url`, then follow its links `depth` more levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    url: Url,
    depth: u32,
}

impl Task {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Returns true if links found on this page should be followed
    pub fn follows_links(&self) -> bool {
        self.depth > 0
    }

    /// Creates the task for a link found on this page, one level shallower
    ///
    /// Returns `None` for depth-0 tasks, which never spawn children.
    pub fn child(&self, url: Url) -> Option<Task> {
        self.depth.checked_sub(1).map(|depth| Task { url, depth })
    }
}

/// Producer side of the crawl queue
///
/// Pushes never wait: a full queue means link fan-out has outgrown the
/// configured capacity, and the run is aborted with [`CrawlError::QueueFull`].
#[derive(Debug, Clone)]
pub struct TaskQueue {
    sender: mpsc::Sender<Task>,
    capacity: usize,
}

impl TaskQueue {
    /// Creates a queue holding at most `capacity` pending tasks
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<Task>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender, capacity }, receiver)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Adds a task to the back of the queue
    pub fn push(&self, task: Task) -> Result<(), CrawlError> {
        match self.sender.try_send(task) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(task)) => {
                tracing::error!(
                    "Task queue full ({} pending), cannot schedule {}",
                    self.capacity,
                    task.url
                );
                Err(CrawlError::QueueFull {
                    capacity: self.capacity,
                })
            }
            // Receiver is gone only after the run has already stopped
            Err(TrySendError::Closed(task)) => {
                tracing::debug!("Crawl already finished, discarding {}", task.url);
                Ok(())
            }
        }
    }
}
