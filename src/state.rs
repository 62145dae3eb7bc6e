use crate::application::services::{AuthService, PostService, UserService};
use crate::infrastructure::backend::InMemoryBackend;
use crate::infrastructure::cache::QueryCache;
use crate::application::queries::QueryClient;
use crate::shared::AppConfig;
use std::sync::Arc;

/// アプリケーション全体の依存を束ねる状態。
pub struct AppState {
    pub config: AppConfig,
    pub auth_service: Arc<AuthService>,
    pub post_service: Arc<PostService>,
    pub user_service: Arc<UserService>,
    pub query_cache: Arc<QueryCache>,
    pub client: Arc<QueryClient>,
}

impl AppState {
    /// インメモリバックエンドで全ポートを満たして組み立てる。
    pub fn new(config: AppConfig) -> Self {
        let backend = Arc::new(InMemoryBackend::new(config.backend.clone()));

        let auth_service = Arc::new(AuthService::new(
            backend.clone(),
            backend.clone(),
            backend.clone(),
        ));
        let post_service = Arc::new(PostService::new(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            config.feed.clone(),
            config.preview.clone(),
        ));
        let user_service = Arc::new(UserService::new(
            backend.clone(),
            backend.clone(),
            backend,
            config.preview.clone(),
        ));

        let query_cache = Arc::new(QueryCache::new(config.cache.max_entries));
        let client = Arc::new(QueryClient::new(
            auth_service.clone(),
            post_service.clone(),
            user_service.clone(),
            query_cache.clone(),
        ));

        Self {
            config,
            auth_service,
            post_service,
            user_service,
            query_cache,
            client,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
