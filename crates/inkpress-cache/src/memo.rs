//! Bounded in-process memo layer.

use crate::fingerprint::fingerprint;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

pub const DEFAULT_MEMO_CAPACITY: usize = 32;

/// Least-recently-used map over the same fingerprints as [`crate::FileCache`].
///
/// Purely a latency optimization for repeated calls within one process; the
/// durable cache remains authoritative.
#[derive(Debug)]
pub struct MemoCache {
    inner: Mutex<LruCache<String, String>>,
}

impl MemoCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get<S: AsRef<str>>(&self, parts: &[S]) -> Option<String> {
        let key = fingerprint(parts);
        self.inner.lock().unwrap().get(&key).cloned()
    }

    pub fn put<S: AsRef<str>>(&self, parts: &[S], value: &str) {
        let key = fingerprint(parts);
        self.inner.lock().unwrap().put(key, value.to_string());
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }
}

impl Default for MemoCache {
    fn default() -> Self {
        Self::new(DEFAULT_MEMO_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_after_put() {
        let memo = MemoCache::default();
        memo.put(&["a"], "1");
        assert_eq!(memo.get(&["a"]).as_deref(), Some("1"));
        assert_eq!(memo.get(&["b"]), None);
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let memo = MemoCache::new(2);
        memo.put(&["a"], "1");
        memo.put(&["b"], "2");
        memo.get(&["a"]);
        memo.put(&["c"], "3");
        assert_eq!(memo.get(&["a"]).as_deref(), Some("1"));
        assert_eq!(memo.get(&["b"]), None);
    }

    #[test]
    fn clear_empties_the_map() {
        let memo = MemoCache::default();
        memo.put(&["a"], "1");
        memo.clear();
        assert_eq!(memo.get(&["a"]), None);
    }
}
