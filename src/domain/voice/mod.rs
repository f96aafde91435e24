//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 参考音色标签与音频格式
//! - 已解析的参考音色（波形 + 转写文本）
//! - 合成语速

mod errors;
mod reference;
mod value_objects;

pub use errors::VoiceError;
pub use reference::VoiceReference;
pub use value_objects::{AudioFormat, Speed, VoiceLabel, SUPPORTED_EXTENSIONS};
