use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub feed: FeedConfig,
    pub preview: PreviewConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
}

/// 外部 BaaS の接続先とコレクション識別子。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub user_collection_id: String,
    pub post_collection_id: String,
    pub saves_collection_id: String,
    pub follows_collection_id: String,
    pub storage_bucket_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// ホームフィードの取得件数（作成日時の降順）。
    pub recent_limit: usize,
    /// 無限スクロール1ページあたりの件数。
    pub page_size: usize,
}

/// 画像プレビューURLの生成パラメータ。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    pub width: u32,
    pub height: u32,
    pub gravity: String,
    pub quality: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// クエリキャッシュが保持するエントリ数の上限。超過分はLRUで破棄。
    pub max_entries: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                endpoint: "https://backend.example.com/v1".to_string(),
                project_id: "tsumugi".to_string(),
                database_id: "main".to_string(),
                user_collection_id: "users".to_string(),
                post_collection_id: "posts".to_string(),
                saves_collection_id: "saves".to_string(),
                follows_collection_id: "follows".to_string(),
                storage_bucket_id: "media".to_string(),
            },
            feed: FeedConfig {
                recent_limit: 20,
                page_size: 6,
            },
            preview: PreviewConfig {
                width: 2000,
                height: 2000,
                gravity: "top".to_string(),
                quality: 100,
            },
            search: SearchConfig { debounce_ms: 500 },
            cache: CacheConfig { max_entries: 256 },
        }
    }
}

impl AppConfig {
    /// JSON ファイルから設定を読み込む。存在しない項目はエラー。
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_service_contract() {
        let config = AppConfig::default();
        assert_eq!(config.feed.recent_limit, 20);
        assert_eq!(config.feed.page_size, 6);
        assert_eq!(config.preview.width, 2000);
        assert_eq!(config.preview.gravity, "top");
        assert_eq!(config.preview.quality, 100);
    }

    #[test]
    fn config_roundtrips_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).expect("serialize config");
        let parsed: AppConfig = serde_json::from_str(&json).expect("parse config");
        assert_eq!(parsed.backend.endpoint, config.backend.endpoint);
        assert_eq!(parsed.cache.max_entries, config.cache.max_entries);
    }
}
