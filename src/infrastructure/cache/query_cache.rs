use crate::domain::value_objects::{InvalidationTarget, QueryKey};
use lru::LruCache;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;
use tracing::debug;

struct CacheEntry {
    value: serde_json::Value,
    fresh: bool,
}

/// 読み取り結果のインメモリキャッシュ。容量超過は LRU で追い出す。
/// 失効はエントリの削除ではなくマークで行い、次回の読み直しで上書きされる。
pub struct QueryCache {
    entries: Mutex<LruCache<QueryKey, CacheEntry>>,
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// 新鮮なエントリだけを返す。失効済みはキャッシュミス扱い。
    pub async fn get(&self, key: &QueryKey) -> Option<serde_json::Value> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.fresh => Some(entry.value.clone()),
            _ => None,
        }
    }

    pub async fn set(&self, key: QueryKey, value: serde_json::Value) {
        let mut entries = self.entries.lock().await;
        entries.put(key, CacheEntry { value, fresh: true });
    }

    /// 対象に該当するエントリをすべて失効マークする。
    pub async fn mark_stale(&self, target: &InvalidationTarget) {
        let mut entries = self.entries.lock().await;
        for (key, entry) in entries.iter_mut() {
            if entry.fresh && target.matches(key) {
                debug!(key = %key, "cache entry invalidated");
                entry.fresh = false;
            }
        }
    }

    pub async fn invalidate_all(&self, targets: &[InvalidationTarget]) {
        for target in targets {
            self.mark_stale(target).await;
        }
    }

    /// キーが失効マーク済みかどうか。未キャッシュのキーは false。
    pub async fn is_stale(&self, key: &QueryKey) -> bool {
        let entries = self.entries.lock().await;
        matches!(entries.peek(key), Some(entry) if !entry.fresh)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}
