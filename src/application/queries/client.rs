use crate::application::queries::feed::InfiniteFeed;
use crate::application::queries::invalidation::{Mutation, invalidation_set};
use crate::application::services::{AuthService, PostService, UserService};
use crate::domain::entities::{
    Post, PostDraft, PostEdit, ProfileEdit, SaveRecord, Session, SigninForm, SignupForm, User,
};
use crate::domain::value_objects::{FileId, InvalidationTarget, PostId, QueryKey, SaveId, UserId};
use crate::infrastructure::cache::QueryCache;
use crate::shared::{AppError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// 読み取りの結果。前提となる入力が無い読み取りは実行されず Disabled になる。
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// 前提（ログイン、検索語、対象 id）が無く、読み取り自体を行わなかった。
    Disabled,
    Ready(T),
}

impl<T> QueryState<T> {
    pub fn is_disabled(&self) -> bool {
        matches!(self, QueryState::Disabled)
    }

    pub fn ready(self) -> Option<T> {
        match self {
            QueryState::Ready(value) => Some(value),
            QueryState::Disabled => None,
        }
    }
}

/// 読み取りをキャッシュ越しに提供し、書き込み後に静的な対応表どおり
/// キャッシュを失効させるファサード。
pub struct QueryClient {
    auth: Arc<AuthService>,
    posts: Arc<PostService>,
    users: Arc<UserService>,
    cache: Arc<QueryCache>,
}

impl QueryClient {
    pub fn new(
        auth: Arc<AuthService>,
        posts: Arc<PostService>,
        users: Arc<UserService>,
        cache: Arc<QueryCache>,
    ) -> Self {
        Self {
            auth,
            posts,
            users,
            cache,
        }
    }

    /// キャッシュにあればそれを、無ければ取得してキャッシュしてから返す。
    async fn cached<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.cache.get(&key).await {
            debug!(key = %key, "query served from cache");
            return Ok(serde_json::from_value(value)?);
        }
        let fresh = fetch().await?;
        self.cache.set(key, serde_json::to_value(&fresh)?).await;
        Ok(fresh)
    }

    async fn apply(&self, mutation: &Mutation) {
        self.cache.invalidate_all(&invalidation_set(mutation)).await;
    }

    // --- 認証 ---

    pub async fn create_account(&self, form: &SignupForm) -> Result<User> {
        self.auth.create_account(form).await
    }

    pub async fn sign_in(&self, form: &SigninForm) -> Result<Session> {
        let session = self.auth.sign_in(form).await?;
        // 前のセッションのプロフィールを返さないように
        self.cache
            .mark_stale(&InvalidationTarget::Exact(QueryKey::CurrentUser))
            .await;
        Ok(session)
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.auth.sign_out().await?;
        self.cache
            .mark_stale(&InvalidationTarget::Exact(QueryKey::CurrentUser))
            .await;
        Ok(())
    }

    /// 未ログインなら Disabled。匿名状態はキャッシュしない。
    pub async fn current_user(&self) -> Result<QueryState<User>> {
        if let Some(value) = self.cache.get(&QueryKey::CurrentUser).await {
            return Ok(QueryState::Ready(serde_json::from_value(value)?));
        }
        match self.auth.current_user().await? {
            Some(user) => {
                self.cache
                    .set(QueryKey::CurrentUser, serde_json::to_value(&user)?)
                    .await;
                Ok(QueryState::Ready(user))
            }
            None => Ok(QueryState::Disabled),
        }
    }

    // --- 投稿の読み取り ---

    pub async fn recent_posts(&self) -> Result<Vec<Post>> {
        self.cached(QueryKey::RecentPosts, || self.posts.get_recent_posts())
            .await
    }

    /// id が無ければ Disabled。id はあるが投稿が消えていれば NotFound。
    pub async fn post_by_id(&self, post_id: Option<&PostId>) -> Result<QueryState<Post>> {
        let Some(post_id) = post_id else {
            return Ok(QueryState::Disabled);
        };
        let post = self
            .cached(QueryKey::PostById(post_id.clone()), || async {
                self.posts
                    .get_post(post_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))
            })
            .await?;
        Ok(QueryState::Ready(post))
    }

    /// 検索語が空白だけなら Disabled。
    pub async fn search_posts(&self, term: &str) -> Result<QueryState<Vec<Post>>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(QueryState::Disabled);
        }
        let results = self
            .cached(QueryKey::SearchPosts(term.to_string()), || {
                self.posts.search_posts(term)
            })
            .await?;
        Ok(QueryState::Ready(results))
    }

    pub async fn user_posts(&self, user_id: Option<&UserId>) -> Result<QueryState<Vec<Post>>> {
        let Some(user_id) = user_id else {
            return Ok(QueryState::Disabled);
        };
        let posts = self
            .cached(QueryKey::UserPosts(user_id.clone()), || {
                self.posts.get_user_posts(user_id)
            })
            .await?;
        Ok(QueryState::Ready(posts))
    }

    // --- ユーザーの読み取り ---

    pub async fn users(&self, limit: Option<usize>) -> Result<Vec<User>> {
        self.cached(QueryKey::Users, || self.users.get_users(limit))
            .await
    }

    pub async fn user_by_id(&self, user_id: Option<&UserId>) -> Result<QueryState<User>> {
        let Some(user_id) = user_id else {
            return Ok(QueryState::Disabled);
        };
        let user = self
            .cached(QueryKey::UserById(user_id.clone()), || async {
                self.users
                    .get_user(user_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("user {user_id}")))
            })
            .await?;
        Ok(QueryState::Ready(user))
    }

    pub async fn follower_count(&self, user_id: &UserId) -> Result<u64> {
        self.cached(QueryKey::FollowerCount(user_id.clone()), || {
            self.users.follower_count(user_id)
        })
        .await
    }

    pub async fn following_count(&self, user_id: &UserId) -> Result<u64> {
        self.cached(QueryKey::FollowingCount(user_id.clone()), || {
            self.users.following_count(user_id)
        })
        .await
    }

    pub async fn following_status(&self, follower: &UserId, following: &UserId) -> Result<bool> {
        self.cached(
            QueryKey::FollowingStatus(follower.clone(), following.clone()),
            || self.users.following_status(follower, following),
        )
        .await
    }

    // --- 無限スクロールフィード ---

    pub fn new_feed(&self) -> InfiniteFeed {
        InfiniteFeed::new(self.posts.page_size())
    }

    /// 次ページを取得してフィードに取り込む。
    pub async fn fetch_next_page(&self, feed: &mut InfiniteFeed) -> Result<()> {
        let page = self.posts.get_infinite_posts(feed.next_cursor()).await?;
        feed.apply_page(page);
        // フィード全体の鮮度マーカー。タグ無効化で stale になる
        self.cache
            .set(QueryKey::InfinitePosts, serde_json::Value::Bool(true))
            .await;
        Ok(())
    }

    /// フィードが失効していたら最初のページから読み直す。
    pub async fn sync_feed(&self, feed: &mut InfiniteFeed) -> Result<()> {
        if self.cache.is_stale(&QueryKey::InfinitePosts).await {
            feed.reset();
            self.fetch_next_page(feed).await?;
        }
        Ok(())
    }

    // --- 書き込み ---

    pub async fn create_post(&self, draft: &PostDraft) -> Result<Post> {
        let post = self.posts.create_post(draft).await?;
        self.apply(&Mutation::CreatePost).await;
        Ok(post)
    }

    pub async fn update_post(&self, edit: &PostEdit) -> Result<Post> {
        let post = self.posts.update_post(edit).await?;
        self.apply(&Mutation::UpdatePost {
            post_id: post.id.clone(),
        })
        .await;
        Ok(post)
    }

    pub async fn delete_post(
        &self,
        post_id: Option<&PostId>,
        image_id: Option<&FileId>,
    ) -> Result<()> {
        self.posts.delete_post(post_id, image_id).await?;
        if let Some(post_id) = post_id {
            self.apply(&Mutation::DeletePost {
                post_id: post_id.clone(),
            })
            .await;
        }
        Ok(())
    }

    pub async fn like_post(&self, post_id: &PostId, likes: Vec<UserId>) -> Result<Post> {
        let post = self.posts.like_post(post_id, likes).await?;
        self.apply(&Mutation::LikePost {
            post_id: post_id.clone(),
        })
        .await;
        Ok(post)
    }

    pub async fn save_post(&self, user_id: &UserId, post_id: &PostId) -> Result<SaveRecord> {
        let save = self.posts.save_post(user_id, post_id).await?;
        self.apply(&Mutation::SavePost).await;
        Ok(save)
    }

    pub async fn delete_saved_post(&self, save_id: &SaveId) -> Result<()> {
        self.posts.delete_saved_post(save_id).await?;
        self.apply(&Mutation::DeleteSavedPost).await;
        Ok(())
    }

    pub async fn update_user(&self, edit: &ProfileEdit) -> Result<User> {
        let user = self.users.update_user(edit).await?;
        self.apply(&Mutation::UpdateUser {
            user_id: user.id.clone(),
        })
        .await;
        Ok(user)
    }

    pub async fn follow(&self, follower: &UserId, following: &UserId) -> Result<()> {
        self.users.follow(follower, following).await?;
        self.apply(&Mutation::Follow {
            follower: follower.clone(),
            following: following.clone(),
        })
        .await;
        Ok(())
    }

    pub async fn unfollow(&self, follower: &UserId, following: &UserId) -> Result<()> {
        self.users.unfollow(follower, following).await?;
        self.apply(&Mutation::Unfollow {
            follower: follower.clone(),
            following: following.clone(),
        })
        .await;
        Ok(())
    }
}
