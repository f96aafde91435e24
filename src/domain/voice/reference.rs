//! Voice Context - Resolved Reference Voice

use std::path::{Path, PathBuf};

use super::VoiceLabel;

/// 已解析的参考音色
///
/// 不变量:
/// - waveform 指向规范格式（固定采样率、单声道）的 WAV 文件
/// - transcript 与 waveform 的语音内容一致
/// - 创建后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceReference {
    label: VoiceLabel,
    waveform: PathBuf,
    transcript: String,
}

impl VoiceReference {
    pub fn new(label: VoiceLabel, waveform: PathBuf, transcript: impl Into<String>) -> Self {
        Self {
            label,
            waveform,
            transcript: transcript.into(),
        }
    }

    pub fn label(&self) -> &VoiceLabel {
        &self.label
    }

    pub fn waveform(&self) -> &Path {
        &self.waveform
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }
}
