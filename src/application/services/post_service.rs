use crate::application::ports::file_storage::FileStorage;
use crate::application::ports::repositories::{PostRepository, SaveRepository};
use crate::domain::entities::{Post, PostDraft, PostEdit, SaveRecord, parse_tags};
use crate::domain::value_objects::{FileId, PostId, SaveId, UserId};
use crate::shared::config::{FeedConfig, PreviewConfig};
use crate::shared::{AppError, Result};
use std::sync::Arc;
use tracing::warn;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    saves: Arc<dyn SaveRepository>,
    storage: Arc<dyn FileStorage>,
    feed: FeedConfig,
    preview: PreviewConfig,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        saves: Arc<dyn SaveRepository>,
        storage: Arc<dyn FileStorage>,
        feed: FeedConfig,
        preview: PreviewConfig,
    ) -> Self {
        Self {
            posts,
            saves,
            storage,
            feed,
            preview,
        }
    }

    /// 失敗時に備えてアップロード済みファイルを削除する。削除自体の失敗は警告に留める。
    async fn discard_upload(&self, file_id: &FileId) {
        if let Err(err) = self.storage.delete_file(file_id).await {
            warn!(file_id = %file_id, "failed to clean up uploaded file: {err}");
        }
    }

    /// 画像アップロード → プレビューURL生成 → ドキュメント作成。
    /// 途中で失敗したらアップロード済みファイルを削除してから返す。
    pub async fn create_post(&self, draft: &PostDraft) -> Result<Post> {
        draft.validate()?;

        let uploaded = self.storage.create_file(&draft.image).await?;

        let image_url = match self.storage.get_file_preview(&uploaded.id, &self.preview).await {
            Ok(url) => url,
            Err(err) => {
                self.discard_upload(&uploaded.id).await;
                return Err(err);
            }
        };

        let post = Post::new(
            draft.creator.clone(),
            draft.caption.clone(),
            image_url,
            uploaded.id.clone(),
            draft.location.clone(),
            parse_tags(&draft.tags),
        );

        match self.posts.create_post(&post).await {
            Ok(created) => Ok(created),
            Err(err) => {
                self.discard_upload(&uploaded.id).await;
                Err(err)
            }
        }
    }

    /// 新しい画像が添付されていれば旧ファイルを削除してから差し替える。
    /// ドキュメント更新に失敗したら新しくアップロードしたファイルを削除する。
    pub async fn update_post(&self, edit: &PostEdit) -> Result<Post> {
        edit.validate()?;

        let mut post = self
            .posts
            .get_post(&edit.post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", edit.post_id)))?;

        let mut replaced_image: Option<FileId> = None;
        if let Some(image) = &edit.image {
            if let Some(old_id) = &post.image_id {
                self.storage.delete_file(old_id).await?;
            }

            let uploaded = self.storage.create_file(image).await?;
            let image_url = match self.storage.get_file_preview(&uploaded.id, &self.preview).await
            {
                Ok(url) => url,
                Err(err) => {
                    self.discard_upload(&uploaded.id).await;
                    return Err(err);
                }
            };

            post.image_url = image_url;
            post.image_id = Some(uploaded.id.clone());
            replaced_image = Some(uploaded.id);
        }

        post.caption = edit.caption.clone();
        post.location = edit.location.clone();
        post.tags = parse_tags(&edit.tags);

        match self.posts.update_post(&post).await {
            Ok(updated) => Ok(updated),
            Err(err) => {
                if let Some(new_id) = &replaced_image {
                    self.discard_upload(new_id).await;
                }
                Err(err)
            }
        }
    }

    /// どちらかの id が欠けていれば何もしない。
    /// ドキュメント削除 → ファイル削除の順。後段が失敗すると孤児ファイルが残る（補償なし）。
    pub async fn delete_post(
        &self,
        post_id: Option<&PostId>,
        image_id: Option<&FileId>,
    ) -> Result<()> {
        let (Some(post_id), Some(image_id)) = (post_id, image_id) else {
            return Ok(());
        };

        self.posts.delete_post(post_id).await?;

        if let Err(err) = self.storage.delete_file(image_id).await {
            warn!(post_id = %post_id, file_id = %image_id, "post document deleted but file removal failed: {err}");
            return Err(err);
        }
        Ok(())
    }

    /// likes 配列をサーバー側で丸ごと置き換える。並行するいいね同士は
    /// 後勝ちで上書きし合う（楽観ロック用トークンなし）。
    pub async fn like_post(&self, post_id: &PostId, likes: Vec<UserId>) -> Result<Post> {
        let mut post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;
        post.likes = likes;
        self.posts.update_post(&post).await
    }

    pub async fn save_post(&self, user_id: &UserId, post_id: &PostId) -> Result<SaveRecord> {
        let save = SaveRecord::new(user_id.clone(), post_id.clone());
        self.saves.create_save(&save).await
    }

    pub async fn delete_saved_post(&self, save_id: &SaveId) -> Result<()> {
        self.saves.delete_save(save_id).await
    }

    pub async fn saves_for_user(&self, user_id: &UserId) -> Result<Vec<SaveRecord>> {
        self.saves.list_saves_for_user(user_id).await
    }

    /// 作成日時の降順で最新 recent_limit 件。
    pub async fn get_recent_posts(&self) -> Result<Vec<Post>> {
        self.posts.get_recent_posts(self.feed.recent_limit).await
    }

    pub async fn get_post(&self, post_id: &PostId) -> Result<Option<Post>> {
        self.posts.get_post(post_id).await
    }

    /// 更新日時の降順で1ページ（page_size 件）。cursor は前ページ末尾の id。
    pub async fn get_infinite_posts(&self, cursor: Option<&PostId>) -> Result<Vec<Post>> {
        self.posts.list_posts_after(cursor, self.feed.page_size).await
    }

    pub fn page_size(&self) -> usize {
        self.feed.page_size
    }

    pub async fn search_posts(&self, term: &str) -> Result<Vec<Post>> {
        self.posts.search_posts(term).await
    }

    pub async fn get_user_posts(&self, user_id: &UserId) -> Result<Vec<Post>> {
        self.posts.get_posts_by_creator(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::file_storage::StoredFile;
    use crate::domain::value_objects::ImageUpload;
    use crate::shared::config::AppConfig;
    use async_trait::async_trait;
    use mockall::mock;
    use std::sync::Mutex;

    mock! {
        pub Posts {}

        #[async_trait]
        impl PostRepository for Posts {
            async fn create_post(&self, post: &Post) -> Result<Post>;
            async fn get_post(&self, id: &PostId) -> Result<Option<Post>>;
            async fn update_post(&self, post: &Post) -> Result<Post>;
            async fn delete_post(&self, id: &PostId) -> Result<()>;
            async fn get_recent_posts(&self, limit: usize) -> Result<Vec<Post>>;
            #[mockall::concretize]
            async fn list_posts_after(&self, cursor: Option<&PostId>, limit: usize) -> Result<Vec<Post>>;
            async fn search_posts(&self, term: &str) -> Result<Vec<Post>>;
            async fn get_posts_by_creator(&self, creator: &UserId) -> Result<Vec<Post>>;
        }
    }

    mock! {
        pub Saves {}

        #[async_trait]
        impl SaveRepository for Saves {
            async fn create_save(&self, save: &SaveRecord) -> Result<SaveRecord>;
            async fn delete_save(&self, id: &SaveId) -> Result<()>;
            async fn list_saves_for_user(&self, user_id: &UserId) -> Result<Vec<SaveRecord>>;
        }
    }

    /// アップロードと削除を記録するテスト用ストレージ。
    struct RecordingStorage {
        uploaded: Mutex<Vec<FileId>>,
        deleted: Mutex<Vec<FileId>>,
        fail_preview: bool,
    }

    impl RecordingStorage {
        fn new() -> Self {
            Self {
                uploaded: Mutex::new(Vec::new()),
                deleted: Mutex::new(Vec::new()),
                fail_preview: false,
            }
        }

        fn failing_preview() -> Self {
            Self {
                fail_preview: true,
                ..Self::new()
            }
        }

        fn uploads(&self) -> Vec<FileId> {
            self.uploaded.lock().unwrap().clone()
        }

        fn deletions(&self) -> Vec<FileId> {
            self.deleted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FileStorage for RecordingStorage {
        async fn create_file(&self, upload: &ImageUpload) -> Result<StoredFile> {
            let id = FileId::generate();
            self.uploaded.lock().unwrap().push(id.clone());
            Ok(StoredFile {
                id,
                name: upload.file_name.clone(),
                size: upload.bytes.len() as u64,
            })
        }

        async fn get_file_preview(&self, id: &FileId, spec: &PreviewConfig) -> Result<String> {
            if self.fail_preview {
                return Err(AppError::Storage("preview unavailable".into()));
            }
            Ok(format!(
                "https://storage.test/files/{id}/preview?width={}&height={}",
                spec.width, spec.height
            ))
        }

        async fn delete_file(&self, id: &FileId) -> Result<()> {
            self.deleted.lock().unwrap().push(id.clone());
            Ok(())
        }

        async fn file_exists(&self, id: &FileId) -> Result<bool> {
            let uploaded = self.uploaded.lock().unwrap();
            let deleted = self.deleted.lock().unwrap();
            Ok(uploaded.contains(id) && !deleted.contains(id))
        }
    }

    fn service_with(
        posts: MockPosts,
        saves: MockSaves,
        storage: Arc<RecordingStorage>,
    ) -> PostService {
        let config = AppConfig::default();
        PostService::new(
            Arc::new(posts),
            Arc::new(saves),
            storage,
            config.feed,
            config.preview,
        )
    }

    fn sample_draft() -> PostDraft {
        PostDraft {
            creator: UserId::generate(),
            caption: "morning light over the river".into(),
            image: ImageUpload::new("river.png", "image/png", vec![1, 2, 3]),
            location: "Kamogawa".into(),
            tags: "kyoto, river ,morning".into(),
        }
    }

    #[tokio::test]
    async fn create_post_parses_tags_and_stores_preview_url() {
        let mut posts = MockPosts::new();
        posts
            .expect_create_post()
            .withf(|post: &Post| {
                post.tags == vec!["kyoto", "river", "morning"]
                    && post.image_url.contains("/preview?")
            })
            .times(1)
            .returning(|post| Ok(post.clone()));

        let storage = Arc::new(RecordingStorage::new());
        let service = service_with(posts, MockSaves::new(), storage.clone());

        let post = service.create_post(&sample_draft()).await.expect("create");
        assert_eq!(post.likes, Vec::<UserId>::new());
        assert!(storage.deletions().is_empty());
    }

    #[tokio::test]
    async fn create_post_deletes_upload_when_document_create_fails() {
        let mut posts = MockPosts::new();
        posts
            .expect_create_post()
            .times(1)
            .returning(|_| Err(AppError::Database("insert failed".into())));

        let storage = Arc::new(RecordingStorage::new());
        let service = service_with(posts, MockSaves::new(), storage.clone());

        let err = service
            .create_post(&sample_draft())
            .await
            .expect_err("document failure surfaces");
        assert!(matches!(err, AppError::Database(_)));

        let uploads = storage.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(storage.deletions(), uploads);
        assert!(!storage.file_exists(&uploads[0]).await.unwrap());
    }

    #[tokio::test]
    async fn create_post_deletes_upload_when_preview_fails() {
        let posts = MockPosts::new();
        let storage = Arc::new(RecordingStorage::failing_preview());
        let service = service_with(posts, MockSaves::new(), storage.clone());

        let err = service
            .create_post(&sample_draft())
            .await
            .expect_err("preview failure surfaces");
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(storage.deletions(), storage.uploads());
    }

    #[tokio::test]
    async fn update_post_replaces_old_image_first() {
        let existing = Post::new(
            UserId::generate(),
            "old caption here".into(),
            "https://storage.test/old".into(),
            FileId::generate(),
            "Osaka".into(),
            vec![],
        );
        let old_image = existing.image_id.clone().unwrap();
        let post_id = existing.id.clone();

        let mut posts = MockPosts::new();
        let fetched = existing.clone();
        posts
            .expect_get_post()
            .times(1)
            .returning(move |_| Ok(Some(fetched.clone())));
        posts
            .expect_update_post()
            .withf(move |post: &Post| {
                post.caption == "brand new caption" && post.image_id != Some(old_image.clone())
            })
            .times(1)
            .returning(|post| Ok(post.clone()));

        let storage = Arc::new(RecordingStorage::new());
        let service = service_with(posts, MockSaves::new(), storage.clone());

        let edit = PostEdit {
            post_id,
            caption: "brand new caption".into(),
            image: Some(ImageUpload::new("new.png", "image/png", vec![9])),
            location: "Osaka".into(),
            tags: String::new(),
        };
        service.update_post(&edit).await.expect("update");

        // 旧ファイルが先に削除され、新ファイルは残る
        assert_eq!(storage.deletions(), vec![existing.image_id.unwrap()]);
        assert_eq!(storage.uploads().len(), 1);
    }

    #[tokio::test]
    async fn update_post_discards_new_upload_on_document_failure() {
        let existing = Post::new(
            UserId::generate(),
            "old caption here".into(),
            "https://storage.test/old".into(),
            FileId::generate(),
            "Osaka".into(),
            vec![],
        );
        let post_id = existing.id.clone();

        let mut posts = MockPosts::new();
        let fetched = existing.clone();
        posts
            .expect_get_post()
            .times(1)
            .returning(move |_| Ok(Some(fetched.clone())));
        posts
            .expect_update_post()
            .times(1)
            .returning(|_| Err(AppError::Database("update failed".into())));

        let storage = Arc::new(RecordingStorage::new());
        let service = service_with(posts, MockSaves::new(), storage.clone());

        let edit = PostEdit {
            post_id,
            caption: "brand new caption".into(),
            image: Some(ImageUpload::new("new.png", "image/png", vec![9])),
            location: "Osaka".into(),
            tags: String::new(),
        };
        service.update_post(&edit).await.expect_err("must fail");

        // 旧ファイルと、失敗後の新ファイルの両方が削除済み
        let uploaded = storage.uploads();
        assert_eq!(uploaded.len(), 1);
        assert!(storage.deletions().contains(&uploaded[0]));
        assert!(storage.deletions().contains(&existing.image_id.unwrap()));
    }

    #[tokio::test]
    async fn delete_post_is_a_noop_when_an_id_is_missing() {
        let posts = MockPosts::new();
        let storage = Arc::new(RecordingStorage::new());
        let service = service_with(posts, MockSaves::new(), storage.clone());

        service
            .delete_post(Some(&PostId::generate()), None)
            .await
            .expect("noop");
        service
            .delete_post(None, Some(&FileId::generate()))
            .await
            .expect("noop");
        assert!(storage.deletions().is_empty());
    }

    #[tokio::test]
    async fn delete_post_removes_document_then_file() {
        let post_id = PostId::generate();
        let file_id = FileId::generate();

        let mut posts = MockPosts::new();
        posts.expect_delete_post().times(1).returning(|_| Ok(()));

        let storage = Arc::new(RecordingStorage::new());
        let service = service_with(posts, MockSaves::new(), storage.clone());

        service
            .delete_post(Some(&post_id), Some(&file_id))
            .await
            .expect("delete");
        assert_eq!(storage.deletions(), vec![file_id]);
    }

    #[tokio::test]
    async fn like_post_replaces_whole_likes_array() {
        let existing = Post::new(
            UserId::generate(),
            "caption long enough".into(),
            "https://storage.test/x".into(),
            FileId::generate(),
            "Nara".into(),
            vec![],
        );
        let post_id = existing.id.clone();
        let likers = vec![UserId::generate(), UserId::generate()];
        let expected = likers.clone();

        let mut posts = MockPosts::new();
        let fetched = existing.clone();
        posts
            .expect_get_post()
            .times(1)
            .returning(move |_| Ok(Some(fetched.clone())));
        posts
            .expect_update_post()
            .withf(move |post: &Post| post.likes == expected)
            .times(1)
            .returning(|post| Ok(post.clone()));

        let storage = Arc::new(RecordingStorage::new());
        let service = service_with(posts, MockSaves::new(), storage);

        let updated = service.like_post(&post_id, likers.clone()).await.expect("like");
        assert_eq!(updated.likes, likers);
    }
}
