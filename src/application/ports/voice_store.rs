//! Voice Store Port - 参考音频存储抽象
//!
//! 一个目录，文件名 = `<label>.<ext>`

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::voice::{AudioFormat, VoiceLabel};

/// 存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(String),
}

/// 存储中的一个音频文件
#[derive(Debug, Clone)]
pub struct StoredAsset {
    /// 文件名（含扩展名）
    pub file_name: String,
    /// 完整路径
    pub path: PathBuf,
    /// 扩展名之前的部分
    pub label: String,
    /// 可识别的音频格式，不支持的扩展名为 None
    pub format: Option<AudioFormat>,
    pub size_bytes: u64,
    pub modified_at: DateTime<Utc>,
}

/// Voice Store Port
#[async_trait]
pub trait VoiceStorePort: Send + Sync {
    /// 列出所有文件，按文件名排序
    async fn list(&self) -> Result<Vec<StoredAsset>, StoreError>;

    /// 列出文件名以 label 开头的文件，按文件名排序
    async fn find_by_prefix(&self, label: &VoiceLabel) -> Result<Vec<StoredAsset>, StoreError> {
        let assets = self.list().await?;
        Ok(assets
            .into_iter()
            .filter(|a| label.matches_file(&a.file_name))
            .collect())
    }

    /// `<label>.<ext>` 的存储路径（不保证存在）
    fn asset_path(&self, label: &VoiceLabel, format: AudioFormat) -> PathBuf;

    /// 原子写入 `<label>.<ext>`，返回最终路径
    async fn save(
        &self,
        label: &VoiceLabel,
        format: AudioFormat,
        data: &[u8],
    ) -> Result<PathBuf, StoreError>;
}
