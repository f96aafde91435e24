//! File Voice Store - 文件系统参考音频存储
//!
//! 实现 VoiceStorePort trait，目录下每个文件 `<label>.<ext>` 即一个音频资源

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{StoreError, StoredAsset, VoiceStorePort};
use crate::domain::voice::{AudioFormat, VoiceLabel};

/// 文件系统音色存储
pub struct FileVoiceStore {
    /// 存储根目录
    base_dir: PathBuf,
}

impl FileVoiceStore {
    /// 使用已存在的目录
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// 打开存储，目录不存在时创建
    pub async fn open(base_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl VoiceStorePort for FileVoiceStore {
    async fn list(&self) -> Result<Vec<StoredAsset>, StoreError> {
        let mut entries = fs::read_dir(&self.base_dir)
            .await
            .map_err(|e| StoreError::IoError(format!("{}: {}", self.base_dir.display(), e)))?;

        let mut assets = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?
        {
            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };

            let file_name = entry.file_name().to_string_lossy().to_string();
            // 写入中的临时文件
            if file_name.starts_with('.') {
                continue;
            }

            let path = entry.path();
            let label = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let modified_at = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            assets.push(StoredAsset {
                format: AudioFormat::from_file_name(&file_name),
                file_name,
                path,
                label,
                size_bytes: metadata.len(),
                modified_at,
            });
        }

        assets.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(assets)
    }

    fn asset_path(&self, label: &VoiceLabel, format: AudioFormat) -> PathBuf {
        self.base_dir
            .join(format!("{}.{}", label.as_str(), format.extension()))
    }

    async fn save(
        &self,
        label: &VoiceLabel,
        format: AudioFormat,
        data: &[u8],
    ) -> Result<PathBuf, StoreError> {
        let final_path = self.asset_path(label, format);
        let tmp_path = self.base_dir.join(format!(
            ".{}.{}.{}.tmp",
            label.as_str(),
            format.extension(),
            Uuid::new_v4()
        ));

        fs::write(&tmp_path, data)
            .await
            .map_err(|e| StoreError::IoError(format!("{}: {}", tmp_path.display(), e)))?;

        if let Err(e) = fs::rename(&tmp_path, &final_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StoreError::IoError(format!("{}: {}", final_path.display(), e)));
        }

        tracing::debug!(
            label = %label,
            path = %final_path.display(),
            size = data.len(),
            "Saved voice asset"
        );

        Ok(final_path)
    }
}
