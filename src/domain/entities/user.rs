use crate::domain::value_objects::{AccountId, FileId, ImageUpload, UserId};
use crate::shared::validation::{
    self, MIN_NAME_LEN, MIN_USERNAME_LEN, ValidationFailureKind,
};
use crate::shared::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ドキュメントストア上のユーザー。account_id は認証プリンシパルと1対1。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub account_id: AccountId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub image_url: String,
    pub image_id: Option<FileId>,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        account_id: AccountId,
        name: String,
        username: String,
        email: String,
        image_url: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            account_id,
            name,
            username,
            email,
            image_url,
            image_id: None,
            bio: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// プロフィール更新のドラフト。image が Some のときだけ画像を差し替える。
#[derive(Debug, Clone)]
pub struct ProfileEdit {
    pub user_id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub image: Option<ImageUpload>,
}

impl ProfileEdit {
    pub fn validate(&self) -> Result<()> {
        if self.name.chars().count() < MIN_NAME_LEN {
            return Err(AppError::validation(
                ValidationFailureKind::NameTooShort,
                "Name must be at least 2 characters.",
            ));
        }
        if self.username.chars().count() < MIN_USERNAME_LEN {
            return Err(AppError::validation(
                ValidationFailureKind::UsernameTooShort,
                "Username must be at least 2 characters.",
            ));
        }
        if !validation::is_well_formed_email(&self.email) {
            return Err(AppError::validation(
                ValidationFailureKind::EmailInvalid,
                "Invalid email address.",
            ));
        }
        Ok(())
    }
}
