//! Output module for run reporting
//!
//! This module handles:
//! - Counting pages, failures and links while a crawl runs
//! - Producing and printing the end-of-run summary

pub mod stats;

pub use stats::{print_summary, CrawlStats, CrawlSummary, InFlightGuard};
