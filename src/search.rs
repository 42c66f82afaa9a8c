//! Line search over an archive directory
//!
//! Walks every file below a root and reports each line containing the query
//! as a plain substring.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

pub const ANSI_GREEN: &str = "\u{1b}[32m";
pub const ANSI_RESET: &str = "\u{1b}[0m";

/// One matching line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub path: PathBuf,
    /// Zero-based line number
    pub line_index: usize,
    pub line: String,
}

impl SearchHit {
    /// Formats the hit as `{path}:{line_index}\t{line}` with the query highlighted
    pub fn render(&self, query: &str) -> String {
        format!(
            "{}:{}\t{}",
            self.path.display(),
            self.line_index,
            highlight(&self.line, query)
        )
    }
}

impl fmt::Display for SearchHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}\t{}", self.path.display(), self.line_index, self.line)
    }
}

/// Wraps every occurrence of `query` in `line` in ANSI green
pub fn highlight(line: &str, query: &str) -> String {
    if query.is_empty() {
        return line.to_string();
    }
    line.replace(query, &format!("{ANSI_GREEN}{query}{ANSI_RESET}"))
}

/// Searches every file below `root` for lines containing `query`
///
/// Files are visited in path order. Content that is not valid UTF-8 is read
/// lossily; files that cannot be read are logged and skipped.
pub fn search(root: &Path, query: &str) -> io::Result<Vec<SearchHit>> {
    if query.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "search query cannot be empty",
        ));
    }

    let mut files = Vec::new();
    collect_files(root, &mut files)?;

    let mut hits = Vec::new();
    for file in files {
        let bytes = match std::fs::read(&file) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("skipping {}: {}", file.display(), e);
                continue;
            }
        };

        let text = String::from_utf8_lossy(&bytes);
        hits.extend(
            text.lines()
                .enumerate()
                .filter(|(_, line)| line.contains(query))
                .map(|(line_index, line)| SearchHit {
                    path: file.clone(),
                    line_index,
                    line: line.to_string(),
                }),
        );
    }

    Ok(hits)
}

fn collect_files(path: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    let metadata = std::fs::metadata(path)?;
    if metadata.is_file() {
        files.push(path.to_path_buf());
        return Ok(());
    }

    let mut entries = std::fs::read_dir(path)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    entries.sort();

    for entry in entries {
        collect_files(&entry, files)?;
    }

    Ok(())
}
