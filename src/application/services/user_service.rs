use crate::application::ports::file_storage::FileStorage;
use crate::application::ports::repositories::{FollowRepository, UserRepository};
use crate::domain::entities::{FollowEdge, ProfileEdit, User};
use crate::domain::value_objects::{FileId, UserId};
use crate::shared::config::PreviewConfig;
use crate::shared::{AppError, Result};
use std::sync::Arc;
use tracing::warn;

pub struct UserService {
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowRepository>,
    storage: Arc<dyn FileStorage>,
    preview: PreviewConfig,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        follows: Arc<dyn FollowRepository>,
        storage: Arc<dyn FileStorage>,
        preview: PreviewConfig,
    ) -> Self {
        Self {
            users,
            follows,
            storage,
            preview,
        }
    }

    /// 作成日時の降順。limit が None なら全件。
    pub async fn get_users(&self, limit: Option<usize>) -> Result<Vec<User>> {
        self.users.list_users(limit).await
    }

    pub async fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        self.users.get_user(user_id).await
    }

    /// 新しい画像があれば先にアップロードし、ドキュメント更新の成功後に
    /// 旧ファイルを削除する。更新に失敗したら新ファイルの方を削除する。
    pub async fn update_user(&self, edit: &ProfileEdit) -> Result<User> {
        edit.validate()?;

        let mut user = self
            .users
            .get_user(&edit.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", edit.user_id)))?;

        let previous_image = user.image_id.clone();
        let mut new_image: Option<FileId> = None;

        if let Some(image) = &edit.image {
            let uploaded = self.storage.create_file(image).await?;
            let image_url = match self.storage.get_file_preview(&uploaded.id, &self.preview).await
            {
                Ok(url) => url,
                Err(err) => {
                    self.discard_upload(&uploaded.id).await;
                    return Err(err);
                }
            };
            user.image_url = image_url;
            user.image_id = Some(uploaded.id.clone());
            new_image = Some(uploaded.id);
        }

        user.name = edit.name.clone();
        user.username = edit.username.clone();
        user.email = edit.email.clone();
        user.bio = edit.bio.clone();

        let updated = match self.users.update_user(&user).await {
            Ok(updated) => updated,
            Err(err) => {
                if let Some(new_id) = &new_image {
                    self.discard_upload(new_id).await;
                }
                return Err(err);
            }
        };

        // 差し替えが成立したときだけ旧ファイルを片付ける
        if new_image.is_some() {
            if let Some(old_id) = &previous_image {
                if let Err(err) = self.storage.delete_file(old_id).await {
                    warn!(user_id = %updated.id, file_id = %old_id, "profile updated but old image removal failed: {err}");
                }
            }
        }

        Ok(updated)
    }

    async fn discard_upload(&self, file_id: &FileId) {
        if let Err(err) = self.storage.delete_file(file_id).await {
            warn!(file_id = %file_id, "failed to clean up uploaded file: {err}");
        }
    }

    pub async fn follow(&self, follower: &UserId, following: &UserId) -> Result<FollowEdge> {
        let edge = FollowEdge::new(follower.clone(), following.clone());
        self.follows.create_edge(&edge).await
    }

    /// 一致するエッジの最初の1件を消す。エッジがなければ何もしない。
    pub async fn unfollow(&self, follower: &UserId, following: &UserId) -> Result<()> {
        match self.follows.find_edge(follower, following).await? {
            Some(edge) => self.follows.delete_edge(&edge.id).await,
            None => Ok(()),
        }
    }

    pub async fn following_status(&self, follower: &UserId, following: &UserId) -> Result<bool> {
        Ok(self.follows.find_edge(follower, following).await?.is_some())
    }

    pub async fn follower_count(&self, user_id: &UserId) -> Result<u64> {
        self.follows.count_followers(user_id).await
    }

    pub async fn following_count(&self, user_id: &UserId) -> Result<u64> {
        self.follows.count_following(user_id).await
    }
}
