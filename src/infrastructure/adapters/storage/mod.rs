//! Storage Adapter - 参考音频文件存储

mod file_voice_store;

pub use file_voice_store::FileVoiceStore;
