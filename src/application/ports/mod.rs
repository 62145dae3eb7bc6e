pub mod auth;
pub mod file_storage;
pub mod repositories;

pub use auth::{AuthGateway, AvatarProvider};
pub use file_storage::{FileStorage, StoredFile};
pub use repositories::{FollowRepository, PostRepository, SaveRepository, UserRepository};
