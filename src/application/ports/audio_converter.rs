//! Audio Converter Port - 音频格式转换抽象
//!
//! 将常见的压缩/非压缩音频统一转换为规范 WAV（固定采样率、单声道），
//! 并提供 WAV 样本的编解码

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 转换错误
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 规范波形格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalFormat {
    /// 目标采样率（Hz）
    pub sample_rate: u32,
    /// 目标声道数
    pub channels: u8,
}

impl Default for CanonicalFormat {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            channels: 1,
        }
    }
}

/// 音频信息
#[derive(Debug, Clone, PartialEq)]
pub struct AudioInfo {
    /// 时长（毫秒）
    pub duration_ms: u64,
    /// 采样率
    pub sample_rate: u32,
    /// 声道数
    pub channels: u8,
}

/// 解码后的单声道波形
#[derive(Debug, Clone, PartialEq)]
pub struct MonoWaveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Audio Converter Port
#[async_trait]
pub trait AudioConverterPort: Send + Sync {
    /// 将 input 转换为规范 WAV 写入 output
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        target: CanonicalFormat,
    ) -> Result<AudioInfo, ConvertError>;

    /// 探测数据是否为可解码的音频（不转换）
    ///
    /// `extension` 作为格式提示
    fn probe(&self, data: &[u8], extension: Option<&str>) -> Result<AudioInfo, ConvertError>;

    /// 解码 WAV 数据并混音为单声道
    fn decode_wav(&self, data: &[u8]) -> Result<MonoWaveform, ConvertError>;

    /// 将单声道样本编码为 16 位 PCM WAV
    fn encode_wav(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, ConvertError>;
}
