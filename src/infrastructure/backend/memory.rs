use crate::application::ports::auth::{AuthGateway, AvatarProvider};
use crate::application::ports::file_storage::{FileStorage, StoredFile};
use crate::application::ports::repositories::{
    FollowRepository, PostRepository, SaveRepository, UserRepository,
};
use crate::domain::entities::{Account, FollowEdge, Post, SaveRecord, Session, User};
use crate::domain::value_objects::{
    AccountId, FileId, FollowId, ImageUpload, PostId, SaveId, UserId,
};
use crate::shared::config::{BackendConfig, PreviewConfig};
use crate::shared::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;

struct StoredAccount {
    account: Account,
    password_digest: Vec<u8>,
}

/// 全ポートを1プロセス内で満たすバックエンド。テストと開発用で、
/// 外部 BaaS と同じ観測可能な振る舞い（順序、エラー、カーソル）を提供する。
pub struct InMemoryBackend {
    config: BackendConfig,
    accounts: RwLock<HashMap<AccountId, StoredAccount>>,
    session: RwLock<Option<Session>>,
    users: RwLock<HashMap<UserId, User>>,
    posts: RwLock<HashMap<PostId, Post>>,
    saves: RwLock<HashMap<SaveId, SaveRecord>>,
    /// 挿入順を保つ。重複エッジも許す。
    follows: RwLock<Vec<FollowEdge>>,
    files: RwLock<HashMap<FileId, StoredFile>>,
}

fn password_digest(password: &str) -> Vec<u8> {
    Sha256::digest(password.as_bytes()).to_vec()
}

impl InMemoryBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            accounts: RwLock::new(HashMap::new()),
            session: RwLock::new(None),
            users: RwLock::new(HashMap::new()),
            posts: RwLock::new(HashMap::new()),
            saves: RwLock::new(HashMap::new()),
            follows: RwLock::new(Vec::new()),
            files: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl AuthGateway for InMemoryBackend {
    async fn create_account(&self, email: &str, password: &str, name: &str) -> Result<Account> {
        let mut accounts = self.accounts.write().await;
        let exists = accounts
            .values()
            .any(|stored| stored.account.email.eq_ignore_ascii_case(email));
        if exists {
            return Err(AppError::Auth(format!(
                "account already exists for {email}"
            )));
        }

        let account = Account::new(email.to_string(), name.to_string());
        accounts.insert(
            account.id.clone(),
            StoredAccount {
                account: account.clone(),
                password_digest: password_digest(password),
            },
        );
        Ok(account)
    }

    async fn create_email_session(&self, email: &str, password: &str) -> Result<Session> {
        let accounts = self.accounts.read().await;
        let matched = accounts.values().find(|stored| {
            stored.account.email.eq_ignore_ascii_case(email)
                && stored.password_digest == password_digest(password)
        });
        let Some(stored) = matched else {
            return Err(AppError::Unauthorized("invalid credentials".to_string()));
        };

        let session = Session::new(stored.account.id.clone());
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    async fn delete_current_session(&self) -> Result<()> {
        let mut session = self.session.write().await;
        if session.take().is_none() {
            return Err(AppError::Unauthorized("no active session".to_string()));
        }
        Ok(())
    }

    async fn current_account(&self) -> Result<Option<Account>> {
        let session = self.session.read().await;
        let Some(session) = session.as_ref() else {
            return Ok(None);
        };
        let accounts = self.accounts.read().await;
        Ok(accounts
            .get(&session.account_id)
            .map(|stored| stored.account.clone()))
    }
}

impl AvatarProvider for InMemoryBackend {
    fn initials_url(&self, name: &str) -> String {
        let encoded = name.trim().replace(' ', "+");
        format!("{}/avatars/initials?name={encoded}", self.config.endpoint)
    }
}

#[async_trait]
impl UserRepository for InMemoryBackend {
    async fn create_user(&self, user: &User) -> Result<User> {
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn get_user_by_account(&self, account_id: &AccountId) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.account_id == *account_id)
            .cloned())
    }

    async fn list_users(&self, limit: Option<usize>) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_str().cmp(a.id.as_str()))
        });
        if let Some(limit) = limit {
            all.truncate(limit);
        }
        Ok(all)
    }

    async fn update_user(&self, user: &User) -> Result<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(AppError::NotFound(format!("user {}", user.id)));
        }
        let mut updated = user.clone();
        updated.updated_at = Utc::now();
        users.insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }
}

#[async_trait]
impl PostRepository for InMemoryBackend {
    async fn create_post(&self, post: &Post) -> Result<Post> {
        let mut posts = self.posts.write().await;
        posts.insert(post.id.clone(), post.clone());
        Ok(post.clone())
    }

    async fn get_post(&self, id: &PostId) -> Result<Option<Post>> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn update_post(&self, post: &Post) -> Result<Post> {
        let mut posts = self.posts.write().await;
        if !posts.contains_key(&post.id) {
            return Err(AppError::NotFound(format!("post {}", post.id)));
        }
        let mut updated = post.clone();
        updated.updated_at = Utc::now();
        posts.insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }

    async fn delete_post(&self, id: &PostId) -> Result<()> {
        let mut posts = self.posts.write().await;
        if posts.remove(id).is_none() {
            return Err(AppError::NotFound(format!("post {id}")));
        }
        Ok(())
    }

    async fn get_recent_posts(&self, limit: usize) -> Result<Vec<Post>> {
        let posts = self.posts.read().await;
        let mut all: Vec<Post> = posts.values().cloned().collect();
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_str().cmp(a.id.as_str()))
        });
        all.truncate(limit);
        Ok(all)
    }

    async fn list_posts_after(&self, cursor: Option<&PostId>, limit: usize) -> Result<Vec<Post>> {
        let posts = self.posts.read().await;
        let mut all: Vec<Post> = posts.values().cloned().collect();
        all.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.as_str().cmp(a.id.as_str()))
        });

        let start = match cursor {
            Some(cursor) => {
                let position = all
                    .iter()
                    .position(|post| post.id == *cursor)
                    .ok_or_else(|| AppError::NotFound(format!("cursor post {cursor}")))?;
                position + 1
            }
            None => 0,
        };
        Ok(all.into_iter().skip(start).take(limit).collect())
    }

    async fn search_posts(&self, term: &str) -> Result<Vec<Post>> {
        let needle = term.to_lowercase();
        let posts = self.posts.read().await;
        let mut matched: Vec<Post> = posts
            .values()
            .filter(|post| post.caption.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_str().cmp(a.id.as_str()))
        });
        Ok(matched)
    }

    async fn get_posts_by_creator(&self, creator: &UserId) -> Result<Vec<Post>> {
        let posts = self.posts.read().await;
        let mut owned: Vec<Post> = posts
            .values()
            .filter(|post| post.creator == *creator)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_str().cmp(a.id.as_str()))
        });
        Ok(owned)
    }
}

#[async_trait]
impl SaveRepository for InMemoryBackend {
    async fn create_save(&self, save: &SaveRecord) -> Result<SaveRecord> {
        let mut saves = self.saves.write().await;
        saves.insert(save.id.clone(), save.clone());
        Ok(save.clone())
    }

    async fn delete_save(&self, id: &SaveId) -> Result<()> {
        let mut saves = self.saves.write().await;
        if saves.remove(id).is_none() {
            return Err(AppError::NotFound(format!("save {id}")));
        }
        Ok(())
    }

    async fn list_saves_for_user(&self, user_id: &UserId) -> Result<Vec<SaveRecord>> {
        let saves = self.saves.read().await;
        let mut owned: Vec<SaveRecord> = saves
            .values()
            .filter(|save| save.user_id == *user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }
}

#[async_trait]
impl FollowRepository for InMemoryBackend {
    async fn create_edge(&self, edge: &FollowEdge) -> Result<FollowEdge> {
        self.follows.write().await.push(edge.clone());
        Ok(edge.clone())
    }

    async fn find_edge(
        &self,
        follower: &UserId,
        following: &UserId,
    ) -> Result<Option<FollowEdge>> {
        Ok(self
            .follows
            .read()
            .await
            .iter()
            .find(|edge| edge.follower_id == *follower && edge.following_id == *following)
            .cloned())
    }

    async fn delete_edge(&self, id: &FollowId) -> Result<()> {
        let mut follows = self.follows.write().await;
        let position = follows
            .iter()
            .position(|edge| edge.id == *id)
            .ok_or_else(|| AppError::NotFound(format!("follow edge {id}")))?;
        follows.remove(position);
        Ok(())
    }

    async fn count_followers(&self, user_id: &UserId) -> Result<u64> {
        Ok(self
            .follows
            .read()
            .await
            .iter()
            .filter(|edge| edge.following_id == *user_id)
            .count() as u64)
    }

    async fn count_following(&self, user_id: &UserId) -> Result<u64> {
        Ok(self
            .follows
            .read()
            .await
            .iter()
            .filter(|edge| edge.follower_id == *user_id)
            .count() as u64)
    }
}

#[async_trait]
impl FileStorage for InMemoryBackend {
    async fn create_file(&self, upload: &ImageUpload) -> Result<StoredFile> {
        let stored = StoredFile {
            id: FileId::generate(),
            name: upload.file_name.clone(),
            size: upload.bytes.len() as u64,
        };
        self.files
            .write()
            .await
            .insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn get_file_preview(&self, id: &FileId, spec: &PreviewConfig) -> Result<String> {
        let files = self.files.read().await;
        if !files.contains_key(id) {
            return Err(AppError::Storage(format!("file {id} not found")));
        }
        Ok(format!(
            "{}/storage/buckets/{}/files/{id}/preview?width={}&height={}&gravity={}&quality={}",
            self.config.endpoint,
            self.config.storage_bucket_id,
            spec.width,
            spec.height,
            spec.gravity,
            spec.quality
        ))
    }

    async fn delete_file(&self, id: &FileId) -> Result<()> {
        let mut files = self.files.write().await;
        if files.remove(id).is_none() {
            return Err(AppError::Storage(format!("file {id} not found")));
        }
        Ok(())
    }

    async fn file_exists(&self, id: &FileId) -> Result<bool> {
        Ok(self.files.read().await.contains_key(id))
    }
}
