//! Configuration module for Webtree
//!
//! Every setting has a default, so a config file is optional. Values loaded
//! from TOML can be overridden from the command line and re-validated.
//!
//! # Example
//!
//! ```no_run
//! use webtree::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("webtree.toml")).unwrap();
//! println!("Crawler will follow links {} levels deep", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, HttpConfig, OutputConfig, DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH,
    DEFAULT_QUEUE_CAPACITY,
};

pub use parser::{load_config, parse_config};
pub use validation::validate;
