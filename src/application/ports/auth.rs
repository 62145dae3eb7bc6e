use crate::domain::entities::{Account, Session};
use crate::shared::Result;
use async_trait::async_trait;

/// 認証サービスへのポート。セッションの持ち方（クッキー等）は実装側の責務。
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// 認証プリンシパルを作成する。
    async fn create_account(&self, email: &str, password: &str, name: &str) -> Result<Account>;

    /// メール・パスワードでセッションを作成する。
    async fn create_email_session(&self, email: &str, password: &str) -> Result<Session>;

    /// 現在のセッションを破棄する。
    async fn delete_current_session(&self) -> Result<()>;

    /// 現在のセッションに紐づくプリンシパル。未認証なら None。
    async fn current_account(&self) -> Result<Option<Account>>;
}

/// 表示名からイニシャルアバターURLを導出するポート。
pub trait AvatarProvider: Send + Sync {
    fn initials_url(&self, name: &str) -> String;
}
