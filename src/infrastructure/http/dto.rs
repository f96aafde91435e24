//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::{UploadVoiceResponse, VoiceSummary};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Speech DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SynthesizeQuery {
    #[serde(default)]
    pub text: String,
    pub voice: Option<String>,
    pub speed: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct BaseSynthesizeQuery {
    #[serde(default)]
    pub text: String,
    pub speed: Option<f32>,
}

// ============================================================================
// Voice DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UploadVoiceResponseDto {
    pub message: String,
    pub label: String,
    pub files: Vec<String>,
    pub duration_ms: u64,
}

impl From<UploadVoiceResponse> for UploadVoiceResponseDto {
    fn from(r: UploadVoiceResponse) -> Self {
        Self {
            message: format!("Audio file uploaded successfully as {}", r.label),
            label: r.label,
            files: r.stored_files,
            duration_ms: r.duration_ms,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub label: String,
    pub formats: Vec<String>,
    pub size_bytes: u64,
    pub modified_at: String,
    pub is_default: bool,
}

impl From<VoiceSummary> for VoiceResponse {
    fn from(v: VoiceSummary) -> Self {
        Self {
            label: v.label,
            formats: v.formats.iter().map(|f| f.extension().to_string()).collect(),
            size_bytes: v.size_bytes,
            modified_at: v.modified_at,
            is_default: v.is_default,
        }
    }
}
