//! Content Cache Layer
//!
//! In-memory cache for derived artifacts keyed by category and name:
//! rendered graph payloads, theme settings, and media previews (pdf,
//! audio, video, text, image). Purely a lookaside cache; nothing here is
//! persisted and a clear never loses source data.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Cache categories, one bucket each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheCategory {
    Graph,
    Theme,
    Pdf,
    Audio,
    Video,
    Text,
    Image,
}

impl CacheCategory {
    pub const ALL: [CacheCategory; 7] = [
        CacheCategory::Graph,
        CacheCategory::Theme,
        CacheCategory::Pdf,
        CacheCategory::Audio,
        CacheCategory::Video,
        CacheCategory::Text,
        CacheCategory::Image,
    ];

    /// Parse a category name as used by callers addressing buckets by
    /// string (lowercase, exact).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "graph" => Some(CacheCategory::Graph),
            "theme" => Some(CacheCategory::Theme),
            "pdf" => Some(CacheCategory::Pdf),
            "audio" => Some(CacheCategory::Audio),
            "video" => Some(CacheCategory::Video),
            "text" => Some(CacheCategory::Text),
            "image" => Some(CacheCategory::Image),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheCategory::Graph => "graph",
            CacheCategory::Theme => "theme",
            CacheCategory::Pdf => "pdf",
            CacheCategory::Audio => "audio",
            CacheCategory::Video => "video",
            CacheCategory::Text => "text",
            CacheCategory::Image => "image",
        }
    }
}

/// Cached artifact: structured JSON or an opaque blob.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    Json(Value),
    Blob(Vec<u8>),
}

/// Thread-safe category/name keyed cache.
///
/// Cheap to clone; clones share the same buckets. Reads take the lock
/// briefly and clone the value out, so no lock is held across caller
/// code.
#[derive(Debug, Clone, Default)]
pub struct ContentCache {
    buckets: Arc<RwLock<HashMap<CacheCategory, HashMap<String, CacheValue>>>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<CacheCategory, HashMap<String, CacheValue>>> {
        self.buckets.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<CacheCategory, HashMap<String, CacheValue>>> {
        self.buckets.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, category: CacheCategory, key: &str) -> Option<CacheValue> {
        self.read()
            .get(&category)
            .and_then(|bucket| bucket.get(key))
            .cloned()
    }

    pub fn set(&self, category: CacheCategory, key: impl Into<String>, value: CacheValue) {
        self.write()
            .entry(category)
            .or_default()
            .insert(key.into(), value);
    }

    pub fn has(&self, category: CacheCategory, key: &str) -> bool {
        self.read()
            .get(&category)
            .is_some_and(|bucket| bucket.contains_key(key))
    }

    /// Drop every entry in one category.
    pub fn clear(&self, category: CacheCategory) {
        self.write().remove(&category);
    }

    /// Drop everything.
    pub fn clear_all(&self) {
        self.write().clear();
    }

    /// Get by category name; unknown names miss rather than fail.
    pub fn get_by_name(&self, category: &str, key: &str) -> Option<CacheValue> {
        match CacheCategory::parse(category) {
            Some(category) => self.get(category, key),
            None => {
                tracing::warn!(category, "unknown cache category on get");
                None
            }
        }
    }

    /// Set by category name; unknown names are a warned no-op.
    pub fn set_by_name(&self, category: &str, key: impl Into<String>, value: CacheValue) {
        match CacheCategory::parse(category) {
            Some(category) => self.set(category, key, value),
            None => tracing::warn!(category, "unknown cache category on set"),
        }
    }

    /// Entry counts per category, for diagnostics.
    pub fn stats(&self) -> HashMap<CacheCategory, usize> {
        let buckets = self.read();
        CacheCategory::ALL
            .iter()
            .map(|&category| {
                let count = buckets.get(&category).map_or(0, |bucket| bucket.len());
                (category, count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_roundtrip() {
        let cache = ContentCache::new();
        cache.set(
            CacheCategory::Graph,
            "page-0",
            CacheValue::Json(json!({"nodes": []})),
        );

        assert!(cache.has(CacheCategory::Graph, "page-0"));
        match cache.get(CacheCategory::Graph, "page-0") {
            Some(CacheValue::Json(value)) => assert_eq!(value["nodes"], json!([])),
            other => panic!("Expected Json value, got {:?}", other),
        }
    }

    #[test]
    fn test_categories_are_isolated() {
        let cache = ContentCache::new();
        cache.set(CacheCategory::Pdf, "doc", CacheValue::Blob(vec![1, 2, 3]));

        assert!(!cache.has(CacheCategory::Image, "doc"));
        cache.clear(CacheCategory::Image);
        assert!(cache.has(CacheCategory::Pdf, "doc"));
    }

    #[test]
    fn test_clear_drops_only_that_category() {
        let cache = ContentCache::new();
        cache.set(CacheCategory::Theme, "dark", CacheValue::Json(json!(true)));
        cache.set(CacheCategory::Audio, "clip", CacheValue::Blob(vec![0]));

        cache.clear(CacheCategory::Theme);
        assert!(!cache.has(CacheCategory::Theme, "dark"));
        assert!(cache.has(CacheCategory::Audio, "clip"));
    }

    #[test]
    fn test_unknown_category_name_is_noop() {
        let cache = ContentCache::new();
        cache.set_by_name("bogus", "key", CacheValue::Json(json!(1)));
        assert!(cache.get_by_name("bogus", "key").is_none());

        let stats = cache.stats();
        assert!(stats.values().all(|&count| count == 0));
    }

    #[test]
    fn test_stats_counts_entries() {
        let cache = ContentCache::new();
        cache.set(CacheCategory::Text, "a", CacheValue::Json(json!("x")));
        cache.set(CacheCategory::Text, "b", CacheValue::Json(json!("y")));

        let stats = cache.stats();
        assert_eq!(stats[&CacheCategory::Text], 2);
        assert_eq!(stats[&CacheCategory::Video], 0);
    }

    #[test]
    fn test_clones_share_buckets() {
        let cache = ContentCache::new();
        let other = cache.clone();
        other.set(CacheCategory::Graph, "shared", CacheValue::Json(json!(1)));
        assert!(cache.has(CacheCategory::Graph, "shared"));
    }
}
