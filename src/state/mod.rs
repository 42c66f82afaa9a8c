//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitedSet`: the deduplication record of every URL scheduled in a run

mod visited;

pub use visited::VisitedSet;
