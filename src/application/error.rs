//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{CacheError, ConvertError, StoreError, TtsError};
use crate::domain::speech::StitchError;
use crate::domain::voice::VoiceError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 音频格式不支持或不一致
    #[error("Format error: {0}")]
    FormatError(String),

    /// 任一文本块推理失败
    #[error("Synthesis error: {0}")]
    SynthesisError(String),

    /// 没有可拼接的片段
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建格式错误
    pub fn format(message: impl Into<String>) -> Self {
        Self::FormatError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<VoiceError> for ApplicationError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::UnsupportedFormat(_) => Self::FormatError(err.to_string()),
            _ => Self::ValidationError(err.to_string()),
        }
    }
}

impl From<StitchError> for ApplicationError {
    fn from(err: StitchError) -> Self {
        match err {
            StitchError::EmptyInput => Self::EmptyInput(err.to_string()),
            StitchError::SampleRateMismatch { .. } => Self::FormatError(err.to_string()),
        }
    }
}

impl From<ConvertError> for ApplicationError {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::IoError(msg) => Self::StorageError(msg),
            _ => Self::FormatError(err.to_string()),
        }
    }
}

impl From<StoreError> for ApplicationError {
    fn from(err: StoreError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<CacheError> for ApplicationError {
    fn from(err: CacheError) -> Self {
        Self::StorageError(err.to_string())
    }
}

/// 引擎错误默认视为外部服务错误；推理失败由编排器包装为 SynthesisError
impl From<TtsError> for ApplicationError {
    fn from(err: TtsError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}

impl From<std::io::Error> for ApplicationError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}
