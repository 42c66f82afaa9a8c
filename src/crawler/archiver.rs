//! On-disk archive of fetched documents
//!
//! Each URL maps to `{root}/{host}/{path segments...}`: every path segment but
//! the last becomes a directory, the last one is the file name. The query
//! string plays no part, so `/a?x=1` and `/a?x=2` share a file, and so do any
//! two URLs whose paths only differ in empty segments. Later writes win.

use crate::url::extract_domain;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Errors that can occur while persisting a document
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes documents into a directory tree mirroring their URLs
#[derive(Debug, Clone)]
pub struct Archiver {
    root: PathBuf,
}

impl Archiver {
    /// Creates an archiver writing below `root`
    ///
    /// Nothing is touched on disk until the first document is archived.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Computes the file a URL is archived to, without writing anything
    ///
    /// A URL whose path ends in `/` yields an empty file name, i.e. a path
    /// naming the directory itself; writing it will fail.
    ///
    /// # Example
    ///
    /// ```
    /// use webtree::crawler::Archiver;
    /// use std::path::Path;
    /// use url::Url;
    ///
    /// let archiver = Archiver::new("output");
    /// let url = Url::parse("http://example.com/wiki/Rust").unwrap();
    /// assert_eq!(
    ///     archiver.path_for(&url).unwrap(),
    ///     Path::new("output/example.com/wiki/Rust")
    /// );
    /// ```
    pub fn path_for(&self, url: &Url) -> Result<PathBuf, ArchiveError> {
        let (directory, file_name) = self.location(url)?;
        Ok(directory.join(file_name))
    }

    /// Persists `document` as the archived content of `url`
    ///
    /// Missing directories are created first. Returns the path written.
    pub async fn archive(&self, url: &Url, document: &str) -> Result<PathBuf, ArchiveError> {
        let (directory, file_name) = self.location(url)?;

        tokio::fs::create_dir_all(&directory)
            .await
            .map_err(|source| ArchiveError::Io {
                path: directory.clone(),
                source,
            })?;

        let file = directory.join(file_name);
        tokio::fs::write(&file, document.as_bytes())
            .await
            .map_err(|source| ArchiveError::Io {
                path: file.clone(),
                source,
            })?;

        tracing::debug!("archived {} ({} bytes)", url, document.len());

        Ok(file)
    }

    fn location<'u>(&self, url: &'u Url) -> Result<(PathBuf, &'u str), ArchiveError> {
        let host = extract_domain(url).ok_or_else(|| ArchiveError::MissingHost(url.to_string()))?;

        let mut segments: Vec<&str> = url.path().split('/').collect();
        let file_name = segments.pop().unwrap_or_default();

        let mut directory = self.root.join(host);
        for segment in segments.into_iter().filter(|s| !s.is_empty()) {
            directory.push(segment);
        }

        Ok((directory, file_name))
    }
}
