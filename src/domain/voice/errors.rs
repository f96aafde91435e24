//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum VoiceError {
    #[error("无效的音色标签: {0}")]
    InvalidLabel(String),

    #[error("不支持的音频格式: {0}")]
    UnsupportedFormat(String),

    #[error("无效的语速: {0}（必须在 0.5 到 2.0 之间）")]
    InvalidSpeed(f32),
}
