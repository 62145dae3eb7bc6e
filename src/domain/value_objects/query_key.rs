use super::ids::{PostId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// キャッシュされる読み取り1件を識別するキー。
/// 先頭要素が操作タグ、残りがその読み取りを区別するパラメータ。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryKey {
    RecentPosts,
    PostById(PostId),
    /// 全投稿グリッドの先頭ページ。
    Posts,
    /// 無限スクロールフィード全体。
    InfinitePosts,
    SearchPosts(String),
    CurrentUser,
    Users,
    UserById(UserId),
    UserPosts(UserId),
    FollowerCount(UserId),
    FollowingCount(UserId),
    FollowingStatus(UserId, UserId),
}

/// キーの操作タグ。タグ単位の無効化はそのタグ配下の全キーに波及する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryTag {
    RecentPosts,
    PostById,
    Posts,
    InfinitePosts,
    SearchPosts,
    CurrentUser,
    Users,
    UserById,
    UserPosts,
    FollowerCount,
    FollowingCount,
    FollowingStatus,
}

impl QueryKey {
    pub fn tag(&self) -> QueryTag {
        match self {
            QueryKey::RecentPosts => QueryTag::RecentPosts,
            QueryKey::PostById(_) => QueryTag::PostById,
            QueryKey::Posts => QueryTag::Posts,
            QueryKey::InfinitePosts => QueryTag::InfinitePosts,
            QueryKey::SearchPosts(_) => QueryTag::SearchPosts,
            QueryKey::CurrentUser => QueryTag::CurrentUser,
            QueryKey::Users => QueryTag::Users,
            QueryKey::UserById(_) => QueryTag::UserById,
            QueryKey::UserPosts(_) => QueryTag::UserPosts,
            QueryKey::FollowerCount(_) => QueryTag::FollowerCount,
            QueryKey::FollowingCount(_) => QueryTag::FollowingCount,
            QueryKey::FollowingStatus(_, _) => QueryTag::FollowingStatus,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::RecentPosts => write!(f, "recent_posts"),
            QueryKey::PostById(id) => write!(f, "post_by_id:{id}"),
            QueryKey::Posts => write!(f, "posts"),
            QueryKey::InfinitePosts => write!(f, "infinite_posts"),
            QueryKey::SearchPosts(term) => write!(f, "search_posts:{term}"),
            QueryKey::CurrentUser => write!(f, "current_user"),
            QueryKey::Users => write!(f, "users"),
            QueryKey::UserById(id) => write!(f, "user_by_id:{id}"),
            QueryKey::UserPosts(id) => write!(f, "user_posts:{id}"),
            QueryKey::FollowerCount(id) => write!(f, "follower_count:{id}"),
            QueryKey::FollowingCount(id) => write!(f, "following_count:{id}"),
            QueryKey::FollowingStatus(follower, following) => {
                write!(f, "following_status:{follower}:{following}")
            }
        }
    }
}

/// 無効化の対象。特定キー1件か、タグ配下の全キーか。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InvalidationTarget {
    Exact(QueryKey),
    Tag(QueryTag),
}

impl InvalidationTarget {
    /// キーがこの無効化対象に該当するかどうか。
    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            InvalidationTarget::Exact(target) => target == key,
            InvalidationTarget::Tag(tag) => key.tag() == *tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_target_matches_only_identical_key() {
        let id = PostId::generate();
        let other = PostId::generate();
        let target = InvalidationTarget::Exact(QueryKey::PostById(id.clone()));

        assert!(target.matches(&QueryKey::PostById(id)));
        assert!(!target.matches(&QueryKey::PostById(other)));
        assert!(!target.matches(&QueryKey::RecentPosts));
    }

    #[test]
    fn tag_target_matches_every_key_under_the_tag() {
        let target = InvalidationTarget::Tag(QueryTag::FollowerCount);

        assert!(target.matches(&QueryKey::FollowerCount(UserId::generate())));
        assert!(target.matches(&QueryKey::FollowerCount(UserId::generate())));
        assert!(!target.matches(&QueryKey::FollowingCount(UserId::generate())));
    }
}
