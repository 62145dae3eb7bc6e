use crate::domain::entities::{FollowEdge, Post, SaveRecord, User};
use crate::domain::value_objects::{AccountId, FollowId, PostId, SaveId, UserId};
use crate::shared::Result;
use async_trait::async_trait;

/// users コレクション。
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<User>;
    async fn get_user(&self, id: &UserId) -> Result<Option<User>>;
    /// account_id は高々1件の User に対応する。
    async fn get_user_by_account(&self, account_id: &AccountId) -> Result<Option<User>>;
    /// 作成日時の降順。limit が None なら全件。
    async fn list_users(&self, limit: Option<usize>) -> Result<Vec<User>>;
    async fn update_user(&self, user: &User) -> Result<User>;
}

/// posts コレクション。
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create_post(&self, post: &Post) -> Result<Post>;
    async fn get_post(&self, id: &PostId) -> Result<Option<Post>>;
    /// 更新日時を進めつつドキュメントを置き換える。
    async fn update_post(&self, post: &Post) -> Result<Post>;
    async fn delete_post(&self, id: &PostId) -> Result<()>;
    /// 作成日時の降順で limit 件。
    async fn get_recent_posts(&self, limit: usize) -> Result<Vec<Post>>;
    /// 更新日時の降順。cursor が Some ならその id の直後から limit 件。
    async fn list_posts_after(&self, cursor: Option<&PostId>, limit: usize) -> Result<Vec<Post>>;
    /// caption のみを対象にした全文検索。
    async fn search_posts(&self, term: &str) -> Result<Vec<Post>>;
    /// 指定ユーザーの投稿を作成日時の降順で全件。
    async fn get_posts_by_creator(&self, creator: &UserId) -> Result<Vec<Post>>;
}

/// saves コレクション。
#[async_trait]
pub trait SaveRepository: Send + Sync {
    async fn create_save(&self, save: &SaveRecord) -> Result<SaveRecord>;
    async fn delete_save(&self, id: &SaveId) -> Result<()>;
    async fn list_saves_for_user(&self, user_id: &UserId) -> Result<Vec<SaveRecord>>;
}

/// follows コレクション。
#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn create_edge(&self, edge: &FollowEdge) -> Result<FollowEdge>;
    /// (follower, following) に一致する最初のエッジ。重複があっても1件だけ返す。
    async fn find_edge(&self, follower: &UserId, following: &UserId)
    -> Result<Option<FollowEdge>>;
    async fn delete_edge(&self, id: &FollowId) -> Result<()>;
    async fn count_followers(&self, user_id: &UserId) -> Result<u64>;
    async fn count_following(&self, user_id: &UserId) -> Result<u64>;
}
