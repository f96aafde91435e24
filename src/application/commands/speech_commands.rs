//! Speech Commands

/// 合成语音命令
///
/// voice 为空时使用内置默认音色
#[derive(Debug, Clone)]
pub struct SynthesizeSpeech {
    pub text: String,
    pub voice: Option<String>,
    pub speed: Option<f32>,
}

/// 变声命令：转写输入音频，再用目标音色重新生成
#[derive(Debug, Clone)]
pub struct ChangeVoice {
    pub reference_speaker: String,
    pub file_name: Option<String>,
    pub audio_data: Vec<u8>,
}
