//! Durable file-backed cache.

use crate::fingerprint::fingerprint;
use inkpress_core::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    value: String,
}

/// File-based cache under a root directory.
///
/// One JSON file per entry at `{root}/{namespace}/{fingerprint}.json`.
/// Namespace directories are created on demand. There is no eviction and no
/// TTL; clearing the directory is an operator task.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entry_path<S: AsRef<str>>(&self, namespace: &str, parts: &[S]) -> PathBuf {
        self.root
            .join(namespace)
            .join(format!("{}.json", fingerprint(parts)))
    }

    /// Look up the value stored for `parts` under `namespace`.
    ///
    /// Returns `None` for absent entries. An entry that exists but cannot be
    /// parsed is deleted and reported as a miss; corruption never blocks the
    /// caller.
    pub async fn read<S: AsRef<str>>(&self, namespace: &str, parts: &[S]) -> Option<String> {
        let path = self.entry_path(namespace, parts);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(_) => return None,
        };
        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => {
                debug!(namespace, path = %path.display(), "cache hit");
                Some(entry.value)
            }
            Err(err) => {
                warn!(namespace, path = %path.display(), %err, "removing corrupt cache entry");
                let _ = tokio::fs::remove_file(&path).await;
                None
            }
        }
    }

    /// Store `value` for `parts` under `namespace`.
    ///
    /// The entry is written to a temporary file in the namespace directory
    /// and renamed into place, so readers never observe a partial write.
    pub async fn write<S: AsRef<str>>(
        &self,
        namespace: &str,
        parts: &[S],
        value: &str,
    ) -> Result<()> {
        let path = self.entry_path(namespace, parts);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let entry = CacheEntry {
            value: value.to_string(),
        };
        let json = serde_json::to_string_pretty(&entry)?;

        let tmp = tmp_path(&path);
        tokio::fs::write(&tmp, json.as_bytes()).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(namespace, path = %path.display(), "cache write");
        Ok(())
    }
}

fn tmp_path(target: &Path) -> PathBuf {
    let seq = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    target.with_extension(format!("json.tmp-{}-{}", std::process::id(), seq))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> (tempfile::TempDir, FileCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        (dir, cache)
    }

    #[tokio::test]
    async fn read_miss_on_untouched_key() {
        let (_dir, cache) = cache();
        assert_eq!(cache.read("ns", &["a", "b"]).await, None);
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let (_dir, cache) = cache();
        cache.write("ns", &["p1", "p2"], "VALUE").await.unwrap();
        assert_eq!(cache.read("ns", &["p1", "p2"]).await.as_deref(), Some("VALUE"));
    }

    #[tokio::test]
    async fn keyed_by_parts() {
        let (_dir, cache) = cache();
        cache.write("ns", &["x"], "VX").await.unwrap();
        cache.write("ns", &["y"], "VY").await.unwrap();
        assert_eq!(cache.read("ns", &["x"]).await.as_deref(), Some("VX"));
        assert_eq!(cache.read("ns", &["y"]).await.as_deref(), Some("VY"));
    }

    #[tokio::test]
    async fn namespaces_are_isolated() {
        let (_dir, cache) = cache();
        cache.write("scaffold", &["k"], "A").await.unwrap();
        assert_eq!(cache.read("hydrate", &["k"]).await, None);
    }

    #[tokio::test]
    async fn overwrite_replaces_value() {
        let (_dir, cache) = cache();
        cache.write("ns", &["k"], "old").await.unwrap();
        cache.write("ns", &["k"], "new").await.unwrap();
        assert_eq!(cache.read("ns", &["k"]).await.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn corrupt_entry_is_deleted_and_reported_as_miss() {
        let (_dir, cache) = cache();
        cache.write("ns", &["k"], "good").await.unwrap();
        let path = cache.entry_path("ns", &["k"]);
        tokio::fs::write(&path, b"not json{{{").await.unwrap();

        assert_eq!(cache.read("ns", &["k"]).await, None);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn entry_file_is_pretty_printed_json() {
        let (_dir, cache) = cache();
        cache.write("ns", &["k"], "v").await.unwrap();
        let raw = tokio::fs::read_to_string(cache.entry_path("ns", &["k"]))
            .await
            .unwrap();
        assert!(raw.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["value"], "v");
    }
}
