pub mod account;
pub mod follow;
pub mod post;
pub mod save;
pub mod user;

pub use account::{Account, Session, SigninForm, SignupForm};
pub use follow::FollowEdge;
pub use post::{Post, PostDraft, PostEdit, parse_tags};
pub use save::SaveRecord;
pub use user::{ProfileEdit, User};
