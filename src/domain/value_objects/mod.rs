pub mod ids;
pub mod query_key;
pub mod upload;

pub use ids::{AccountId, FileId, FollowId, PostId, SaveId, SessionId, UserId};
pub use query_key::{InvalidationTarget, QueryKey, QueryTag};
pub use upload::ImageUpload;
