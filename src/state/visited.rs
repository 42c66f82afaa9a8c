use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

/// Record of every URL scheduled during one crawl run
///
/// The set only grows. [`VisitedSet::insert`] is an atomic test-and-set, so
/// when several completions discover the same link at once exactly one of
/// them wins the insert and gets to queue it.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<Url>>,
}

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `url`, returning `true` only if it was not present before
    pub fn insert(&self, url: &Url) -> bool {
        let mut urls = self.lock();
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.clone())
    }

    /// Returns true if `url` has already been scheduled
    pub fn contains(&self, url: &Url) -> bool {
        self.lock().contains(url)
    }

    /// Number of distinct URLs scheduled so far
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing has been scheduled yet
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the set half-updated.
    fn lock(&self) -> MutexGuard<'_, HashSet<Url>> {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_first_insert_wins() {
        let visited = VisitedSet::new();
        assert!(visited.is_empty());
        assert!(visited.insert(&url("http://example.com/1")));
        assert!(!visited.insert(&url("http://example.com/1")));
        assert!(visited.contains(&url("http://example.com/1")));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_structural_equality_only() {
        let visited = VisitedSet::new();
        // The parser adds the root slash, so these collapse
        assert!(visited.insert(&url("http://example.com")));
        assert!(!visited.insert(&url("http://example.com/")));
        // Trailing slashes and query order are left alone
        assert!(visited.insert(&url("http://example.com/a")));
        assert!(visited.insert(&url("http://example.com/a/")));
        assert!(visited.insert(&url("http://example.com/?a=1&b=2")));
        assert!(visited.insert(&url("http://example.com/?b=2&a=1")));
        assert_eq!(visited.len(), 5);
    }

    #[test]
    fn test_concurrent_inserts_have_single_winner() {
        let visited = Arc::new(VisitedSet::new());
        let target = url("http://example.com/shared");

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let visited = Arc::clone(&visited);
                let target = target.clone();
                std::thread::spawn(move || visited.insert(&target))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(visited.len(), 1);
    }
}
