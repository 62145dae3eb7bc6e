use crate::domain::value_objects::{FollowId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// follower から following への有向エッジ。
/// 重複エッジはサーバー側では防がれない。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowEdge {
    pub id: FollowId,
    pub follower_id: UserId,
    pub following_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl FollowEdge {
    pub fn new(follower_id: UserId, following_id: UserId) -> Self {
        Self {
            id: FollowId::generate(),
            follower_id,
            following_id,
            created_at: Utc::now(),
        }
    }
}
