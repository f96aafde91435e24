//! Voice Query Handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::VoiceStorePort;
use crate::application::queries::ListVoices;
use crate::domain::voice::{AudioFormat, VoiceLabel};

/// 音色摘要（同一标签的所有文件）
#[derive(Debug, Clone)]
pub struct VoiceSummary {
    pub label: String,
    pub formats: Vec<AudioFormat>,
    pub size_bytes: u64,
    pub modified_at: String,
    pub is_default: bool,
}

/// ListVoices Handler
pub struct ListVoicesHandler {
    store: Arc<dyn VoiceStorePort>,
    default_label: VoiceLabel,
}

impl ListVoicesHandler {
    pub fn new(store: Arc<dyn VoiceStorePort>, default_label: VoiceLabel) -> Self {
        Self {
            store,
            default_label,
        }
    }

    /// 按标签聚合存储中的音频文件，忽略不支持的格式
    pub async fn handle(&self, _query: ListVoices) -> Result<Vec<VoiceSummary>, ApplicationError> {
        let assets = self.store.list().await?;

        let mut grouped: BTreeMap<String, VoiceSummary> = BTreeMap::new();
        for asset in assets {
            let Some(format) = asset.format else {
                continue;
            };
            let modified_at = asset.modified_at.to_rfc3339();
            let summary = grouped
                .entry(asset.label.clone())
                .or_insert_with(|| VoiceSummary {
                    is_default: asset.label == self.default_label.as_str(),
                    label: asset.label.clone(),
                    formats: Vec::new(),
                    size_bytes: 0,
                    modified_at: modified_at.clone(),
                });
            summary.formats.push(format);
            summary.size_bytes += asset.size_bytes;
            if modified_at > summary.modified_at {
                summary.modified_at = modified_at;
            }
        }

        Ok(grouped.into_values().collect())
    }
}
