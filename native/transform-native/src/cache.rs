use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::warn;

use crate::error::TransformError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub hash: String,
    pub code: String,
}

/// Transformed output keyed by module id and the SHA-256 of its source.
///
/// Owned by whoever drives a build session and passed down by reference;
/// entries live until [`TransformCache::clear`] or drop.
pub struct TransformCache {
    cache_dir: Option<PathBuf>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl TransformCache {
    pub fn in_memory() -> Self {
        Self {
            cache_dir: None,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Also mirrors entries as JSON files under `cache_dir`.
    pub fn persistent(cache_dir: impl Into<PathBuf>) -> Result<Self, TransformError> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir).map_err(|source| TransformError::Io {
            path: cache_dir.clone(),
            source,
        })?;
        Ok(Self {
            cache_dir: Some(cache_dir),
            entries: Mutex::new(HashMap::new()),
        })
    }

    pub fn compute_hash(source: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn get_cache_path(&self, id: &str) -> Option<PathBuf> {
        let safe_name = id.replace(['/', '\\', ':', '?', '#'], "_");
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", safe_name)))
    }

    pub fn get(&self, id: &str, source: &str) -> Option<String> {
        let hash = Self::compute_hash(source);
        {
            let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(id) {
                return (entry.hash == hash).then(|| entry.code.clone());
            }
        }

        let cache_path = self.get_cache_path(id)?;
        let data = fs::read_to_string(&cache_path).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&data) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(id, error = %e, "discarding corrupt cache entry");
                fs::remove_file(cache_path).ok();
                return None;
            }
        };
        if entry.hash != hash {
            return None;
        }

        let code = entry.code.clone();
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), entry);
        Some(code)
    }

    pub fn set(&self, id: &str, source: &str, code: &str) {
        let entry = CacheEntry {
            hash: Self::compute_hash(source),
            code: code.to_string(),
        };

        if let Some(cache_path) = self.get_cache_path(id) {
            match serde_json::to_string(&entry) {
                Ok(data) => {
                    if let Err(e) = fs::write(&cache_path, data) {
                        warn!(id, error = %e, "failed to persist cache entry");
                    }
                }
                Err(e) => warn!(id, error = %e, "failed to serialize cache entry"),
            }
        }

        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry, including persisted ones.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();

        let Some(dir) = &self.cache_dir else {
            return;
        };
        let Ok(read_dir) = fs::read_dir(dir) else {
            return;
        };
        for entry in read_dir.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(path).ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_requires_same_source() {
        let cache = TransformCache::in_memory();
        cache.set("/src/Card.jsx", "let a;", "let a;/* done */");
        assert_eq!(cache.get("/src/Card.jsx", "let a;").as_deref(), Some("let a;/* done */"));
        assert_eq!(cache.get("/src/Card.jsx", "let b;"), None);
        assert_eq!(cache.get("/src/Other.jsx", "let a;"), None);
    }

    #[test]
    fn test_persistent_entries_survive_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let first = TransformCache::persistent(dir.path()).unwrap();
        first.set("/src/Card.jsx", "source", "output");

        let second = TransformCache::persistent(dir.path()).unwrap();
        assert_eq!(second.get("/src/Card.jsx", "source").as_deref(), Some("output"));
        assert_eq!(second.len(), 1);

        second.clear();
        assert!(second.is_empty());
        let third = TransformCache::persistent(dir.path()).unwrap();
        assert_eq!(third.get("/src/Card.jsx", "source"), None);
    }

    #[test]
    fn test_hash_is_stable_hex() {
        let hash = TransformCache::compute_hash("abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, TransformCache::compute_hash("abc"));
    }
}
