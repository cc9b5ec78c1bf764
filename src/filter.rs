// src/filter.rs

use dashmap::DashSet;

/// Thread-safe set of previously seen keys.
///
/// Keys are only ever added. Once [`DedupFilter::duplicate`] has returned
/// `false` for a key, every later call for that key returns `true`.
#[derive(Debug, Default)]
pub struct DedupFilter {
    seen: DashSet<String>,
}

impl DedupFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `key` was recorded before. Otherwise records it and
    /// returns `false`.
    ///
    /// The lookup and the insert happen under a single shard write lock, so
    /// two concurrent callers with the same key never both see `false`.
    pub fn duplicate(&self, key: &str) -> bool {
        !self.seen.insert(key.to_string())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_first_call_records_key() {
        let filter = DedupFilter::new();
        assert!(!filter.duplicate("example.com"));
        assert!(filter.duplicate("example.com"));
        assert!(filter.duplicate("example.com"));
        assert!(filter.contains("example.com"));
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let filter = DedupFilter::new();
        assert!(filter.is_empty());
        assert!(!filter.duplicate("a.example.com"));
        assert!(!filter.duplicate("b.example.com"));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_concurrent_callers_see_one_miss() {
        let filter = Arc::new(DedupFilter::new());
        let misses = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let filter = filter.clone();
                let misses = misses.clone();
                thread::spawn(move || {
                    for i in 0..200 {
                        if !filter.duplicate(&format!("host{}.example.com", i % 50)) {
                            misses.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(misses.load(Ordering::SeqCst), 50);
        assert_eq!(filter.len(), 50);
    }
}
