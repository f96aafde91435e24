//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（推理引擎、转写、格式转换、音色存储、转写缓存）
//! - services: 音色解析与合成编排
//! - commands: 合成 / 变声 / 上传命令及处理器
//! - queries: 音色查询及处理器
//! - scratch: 请求级临时目录
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;
pub mod scratch;
pub mod services;

// Re-exports
pub use commands::{
    ChangeVoice, SynthesizeSpeech, UploadVoice,
    handlers::{
        ChangeVoiceHandler, SynthesizeSpeechHandler, SynthesizedSpeech, UploadPolicy,
        UploadVoiceHandler, UploadVoiceResponse,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Audio converter
    AudioConverterPort,
    AudioInfo,
    CanonicalFormat,
    ConvertError,
    MonoWaveform,
    // Transcript cache
    generate_transcript_key,
    CacheError,
    CacheStats,
    TranscriptCachePort,
    // TTS engine
    InferRequest,
    InferResponse,
    InferenceEnginePort,
    TranscriberPort,
    TtsError,
    // Voice store
    StoreError,
    StoredAsset,
    VoiceStorePort,
};

pub use queries::{
    handlers::{ListVoicesHandler, VoiceSummary},
    ListVoices,
};

pub use scratch::RequestScratch;

pub use services::{
    DefaultVoice, OrchestratorConfig, ResolvedWaveform, SynthesisOrchestrator, SynthesisOutput,
    VoiceResolver,
};
