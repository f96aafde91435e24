//! TTS Engine Port - 推理 / 转写引擎抽象
//!
//! 定义外部神经 TTS 模型的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// TTS 推理请求
#[derive(Debug, Clone)]
pub struct InferRequest {
    /// 参考音频（规范格式 WAV）路径
    pub reference_audio: PathBuf,
    /// 参考音频对应的转写文本
    pub reference_text: String,
    /// 要合成的文本
    pub gen_text: String,
    /// 语速倍率
    pub speed: f32,
}

/// TTS 推理响应
#[derive(Debug, Clone)]
pub struct InferResponse {
    /// 单声道 PCM 样本
    pub samples: Vec<f32>,
    /// 采样率
    pub sample_rate: u32,
}

/// TTS Engine Port
///
/// 推理调用共享模型状态，实现方不保证可并发调用，
/// 调用方应通过 `GuardedEngine` 串行化
#[async_trait]
pub trait InferenceEnginePort: Send + Sync {
    /// 以参考音色合成 gen_text
    async fn infer(&self, request: InferRequest) -> Result<InferResponse, TtsError>;

    /// 引擎名称（日志 / 响应头使用）
    fn name(&self) -> &str;

    /// 检查引擎是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}

/// Transcriber Port
///
/// 从语音波形得到文本
#[async_trait]
pub trait TranscriberPort: Send + Sync {
    async fn transcribe(&self, audio: &Path) -> Result<String, TtsError>;
}
