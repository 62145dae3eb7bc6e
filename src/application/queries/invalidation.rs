use crate::domain::value_objects::{InvalidationTarget, PostId, QueryKey, QueryTag, UserId};

/// キャッシュを失効させる書き込み操作。
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreatePost,
    UpdatePost { post_id: PostId },
    DeletePost { post_id: PostId },
    LikePost { post_id: PostId },
    SavePost,
    DeleteSavedPost,
    UpdateUser { user_id: UserId },
    Follow { follower: UserId, following: UserId },
    Unfollow { follower: UserId, following: UserId },
}

/// ミューテーションごとの失効対象。静的な対応表で、実行時の状態には依存しない。
pub fn invalidation_set(mutation: &Mutation) -> Vec<InvalidationTarget> {
    use InvalidationTarget::{Exact, Tag};

    match mutation {
        Mutation::CreatePost => vec![Exact(QueryKey::RecentPosts)],
        Mutation::UpdatePost { post_id } => {
            vec![Exact(QueryKey::PostById(post_id.clone()))]
        }
        Mutation::DeletePost { post_id } => vec![
            Exact(QueryKey::RecentPosts),
            Exact(QueryKey::PostById(post_id.clone())),
        ],
        Mutation::LikePost { post_id } => vec![
            Exact(QueryKey::PostById(post_id.clone())),
            Exact(QueryKey::RecentPosts),
            Tag(QueryTag::Posts),
            Exact(QueryKey::CurrentUser),
            Tag(QueryTag::InfinitePosts),
        ],
        Mutation::SavePost | Mutation::DeleteSavedPost => vec![
            Exact(QueryKey::RecentPosts),
            Tag(QueryTag::Posts),
            Exact(QueryKey::CurrentUser),
        ],
        Mutation::UpdateUser { user_id } => vec![
            Exact(QueryKey::CurrentUser),
            Exact(QueryKey::UserById(user_id.clone())),
        ],
        // フォロー状態はペア単位のキーなので、カウントのタグに加えて
        // 当該ペアの状態キーも失効させる
        Mutation::Follow { follower, following }
        | Mutation::Unfollow { follower, following } => vec![
            Tag(QueryTag::FollowerCount),
            Tag(QueryTag::FollowingCount),
            Exact(QueryKey::FollowingStatus(
                follower.clone(),
                following.clone(),
            )),
        ],
    }
}
