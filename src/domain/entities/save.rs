use crate::domain::value_objects::{PostId, SaveId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ユーザーが投稿を保存したことを表すジョインレコード。
/// (user, post) の一意性はサーバー側では強制されない。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveRecord {
    pub id: SaveId,
    pub user_id: UserId,
    pub post_id: PostId,
    pub created_at: DateTime<Utc>,
}

impl SaveRecord {
    pub fn new(user_id: UserId, post_id: PostId) -> Self {
        Self {
            id: SaveId::generate(),
            user_id,
            post_id,
            created_at: Utc::now(),
        }
    }
}
