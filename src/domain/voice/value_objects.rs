//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};

use super::VoiceError;

/// 允许上传/解析的音频扩展名
pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg"];

const MAX_LABEL_LEN: usize = 64;

/// 音色标签
///
/// 存储目录中文件名的前缀（扩展名之前的部分）。
/// 只允许字母、数字、`_`、`-`，因此不会包含路径分隔符或 `.`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceLabel(String);

impl VoiceLabel {
    pub fn new(label: impl Into<String>) -> Result<Self, VoiceError> {
        let label = label.into();
        let label = label.trim();
        if label.is_empty() {
            return Err(VoiceError::InvalidLabel("标签不能为空".to_string()));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(VoiceError::InvalidLabel(format!(
                "标签长度不能超过{}字符",
                MAX_LABEL_LEN
            )));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(VoiceError::InvalidLabel(label.to_string()));
        }
        Ok(Self(label.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 文件名是否属于该标签（前缀匹配）
    pub fn matches_file(&self, file_name: &str) -> bool {
        file_name.starts_with(&self.0)
    }
}

impl std::fmt::Display for VoiceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音频格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
    Flac,
    Ogg,
}

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "flac" => Some(Self::Flac),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    /// 从文件名推断格式
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        std::path::Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for AudioFormat {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| VoiceError::UnsupportedFormat(s.to_string()))
    }
}

/// 合成语速倍率 (0.5 - 2.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Speed(f32);

impl Speed {
    pub const MIN: f32 = 0.5;
    pub const MAX: f32 = 2.0;

    pub fn new(value: f32) -> Result<Self, VoiceError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(VoiceError::InvalidSpeed(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_validation() {
        assert!(VoiceLabel::new("demo_speaker0").is_ok());
        assert_eq!(VoiceLabel::new("  alice-2 ").unwrap().as_str(), "alice-2");
        assert!(VoiceLabel::new("").is_err());
        assert!(VoiceLabel::new("../etc/passwd").is_err());
        assert!(VoiceLabel::new("a.b").is_err());
        assert!(VoiceLabel::new("x".repeat(65)).is_err());
    }

    #[test]
    fn test_label_prefix_match() {
        let label = VoiceLabel::new("default").unwrap();
        assert!(label.matches_file("default_en.wav"));
        assert!(!label.matches_file("other.wav"));
    }

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(AudioFormat::from_file_name("voice.MP3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_file_name("voice.wav"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_file_name("notes.txt"), None);
        assert_eq!(AudioFormat::from_file_name("noext"), None);
        assert!("aac".parse::<AudioFormat>().is_err());
    }

    #[test]
    fn test_speed_range() {
        assert_eq!(Speed::default().value(), 1.0);
        assert!(Speed::new(0.5).is_ok());
        assert!(Speed::new(2.0).is_ok());
        assert_eq!(Speed::new(3.0), Err(VoiceError::InvalidSpeed(3.0)));
        assert!(Speed::new(f32::NAN).is_err());
    }
}
