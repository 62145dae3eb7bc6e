use crate::domain::value_objects::{FileId, ImageUpload, PostId, UserId};
use crate::shared::validation::{CAPTION_RANGE, LOCATION_RANGE, ValidationFailureKind, char_len_in};
use crate::shared::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub creator: UserId,
    pub caption: String,
    pub image_url: String,
    pub image_id: Option<FileId>,
    pub location: String,
    pub tags: Vec<String>,
    /// いいねしたユーザーの全量。サーバー側は配列を丸ごと置き換える。
    pub likes: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        creator: UserId,
        caption: String,
        image_url: String,
        image_id: FileId,
        location: String,
        tags: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PostId::generate(),
            creator,
            caption,
            image_url,
            image_id: Some(image_id),
            location,
            tags,
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_liked_by(&self, user_id: &UserId) -> bool {
        self.likes.contains(user_id)
    }
}

/// 新規投稿のドラフト。画像は必須。
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub creator: UserId,
    pub caption: String,
    pub image: ImageUpload,
    pub location: String,
    /// カンマ区切りの自由入力。`parse_tags` でリスト化される。
    pub tags: String,
}

impl PostDraft {
    pub fn validate(&self) -> Result<()> {
        validate_caption_and_location(&self.caption, &self.location)
    }
}

/// 既存投稿の編集ドラフト。image が Some のときだけ画像を差し替える。
#[derive(Debug, Clone)]
pub struct PostEdit {
    pub post_id: PostId,
    pub caption: String,
    pub image: Option<ImageUpload>,
    pub location: String,
    pub tags: String,
}

impl PostEdit {
    pub fn validate(&self) -> Result<()> {
        validate_caption_and_location(&self.caption, &self.location)
    }
}

fn validate_caption_and_location(caption: &str, location: &str) -> Result<()> {
    if !char_len_in(caption, &CAPTION_RANGE) {
        return Err(AppError::validation(
            ValidationFailureKind::CaptionLength,
            "Caption must be between 5 and 2200 characters.",
        ));
    }
    if !char_len_in(location, &LOCATION_RANGE) {
        return Err(AppError::validation(
            ValidationFailureKind::LocationLength,
            "Location must be between 2 and 100 characters.",
        ));
    }
    Ok(())
}

/// カンマ区切り（前後の空白は許容）の自由入力をタグのリストにする。
/// 空入力は空リスト。
pub fn parse_tags(input: &str) -> Vec<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tags_splits_on_commas_with_surrounding_whitespace() {
        assert_eq!(parse_tags("a, b ,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn parse_tags_of_empty_input_is_empty() {
        assert_eq!(parse_tags(""), Vec::<String>::new());
        assert_eq!(parse_tags("   "), Vec::<String>::new());
    }

    #[test]
    fn parse_tags_keeps_single_tag() {
        assert_eq!(parse_tags("sunset"), vec!["sunset"]);
    }

    #[test]
    fn caption_bounds_are_inclusive() {
        let draft = PostDraft {
            creator: UserId::generate(),
            caption: "12345".into(),
            image: ImageUpload::new("p.png", "image/png", vec![0u8; 4]),
            location: "Kyoto".into(),
            tags: String::new(),
        };
        assert!(draft.validate().is_ok());

        let short = PostDraft {
            caption: "1234".into(),
            ..draft
        };
        let err = short.validate().expect_err("must fail");
        assert!(matches!(
            err,
            AppError::Validation {
                kind: ValidationFailureKind::CaptionLength,
                ..
            }
        ));
    }

    #[test]
    fn location_must_be_at_least_two_chars() {
        let edit = PostEdit {
            post_id: PostId::generate(),
            caption: "long enough caption".into(),
            image: None,
            location: "a".into(),
            tags: String::new(),
        };
        assert!(edit.validate().is_err());
    }
}
