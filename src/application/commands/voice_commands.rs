//! Voice Commands

/// 上传参考音色命令
#[derive(Debug, Clone)]
pub struct UploadVoice {
    pub label: String,
    pub file_name: String,
    pub audio_data: Vec<u8>,
}
