use crate::domain::value_objects::{FileId, ImageUpload};
use crate::shared::Result;
use crate::shared::config::PreviewConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// アップロード済みファイルのメタデータ。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredFile {
    pub id: FileId,
    pub name: String,
    pub size: u64,
}

/// オブジェクトストレージへのポート。
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// ファイルを保存して識別子を返す。
    async fn create_file(&self, upload: &ImageUpload) -> Result<StoredFile>;

    /// 指定サイズ・クロップ・品質のプレビューURLを返す。
    /// 対象ファイルが存在しない場合はエラー。
    async fn get_file_preview(&self, id: &FileId, spec: &PreviewConfig) -> Result<String>;

    async fn delete_file(&self, id: &FileId) -> Result<()>;

    async fn file_exists(&self, id: &FileId) -> Result<bool>;
}
