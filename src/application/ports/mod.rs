//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_converter;
mod transcript_cache;
mod tts_engine;
mod voice_store;

pub use audio_converter::{
    AudioConverterPort, AudioInfo, CanonicalFormat, ConvertError, MonoWaveform,
};
pub use transcript_cache::{generate_transcript_key, CacheError, CacheStats, TranscriptCachePort};
pub use tts_engine::{InferRequest, InferResponse, InferenceEnginePort, TranscriberPort, TtsError};
pub use voice_store::{StoreError, StoredAsset, VoiceStorePort};
