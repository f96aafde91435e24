//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::{
    // Command handlers
    ChangeVoiceHandler, SynthesizeSpeechHandler, UploadPolicy, UploadVoiceHandler,
    // Query handlers
    ListVoicesHandler,
    // Ports
    AudioConverterPort, InferenceEnginePort, TranscriberPort, TranscriptCachePort,
    VoiceStorePort,
    // Services
    CanonicalFormat, DefaultVoice, OrchestratorConfig, SynthesisOrchestrator, VoiceResolver,
};

/// 构建 AppState 所需的服务参数
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub default_voice: DefaultVoice,
    pub canonical: CanonicalFormat,
    pub orchestrator: OrchestratorConfig,
    pub max_upload_size: u64,
    /// 请求级临时目录的父目录
    pub work_dir: PathBuf,
}

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub engine: Arc<dyn InferenceEnginePort>,
    pub transcript_cache: Arc<dyn TranscriptCachePort>,

    // ========== Command Handlers ==========
    pub synthesize_handler: SynthesizeSpeechHandler,
    pub change_voice_handler: ChangeVoiceHandler,
    pub upload_voice_handler: UploadVoiceHandler,

    // ========== Query Handlers ==========
    pub list_voices_handler: ListVoicesHandler,
}

impl AppState {
    /// 创建应用状态
    ///
    /// engine 与 transcriber 通常是同一个 `GuardedEngine`
    pub fn new(
        engine: Arc<dyn InferenceEnginePort>,
        transcriber: Arc<dyn TranscriberPort>,
        store: Arc<dyn VoiceStorePort>,
        converter: Arc<dyn AudioConverterPort>,
        transcript_cache: Arc<dyn TranscriptCachePort>,
        settings: ServiceSettings,
    ) -> Self {
        let resolver = Arc::new(VoiceResolver::new(
            store.clone(),
            converter.clone(),
            transcriber.clone(),
            transcript_cache.clone(),
            settings.default_voice.clone(),
            settings.canonical,
        ));
        let orchestrator = Arc::new(SynthesisOrchestrator::new(
            engine.clone(),
            settings.orchestrator.clone(),
        ));

        Self {
            // Ports
            engine,
            transcript_cache,

            // Command handlers
            synthesize_handler: SynthesizeSpeechHandler::new(
                resolver.clone(),
                orchestrator.clone(),
                converter.clone(),
                settings.work_dir.clone(),
            ),
            change_voice_handler: ChangeVoiceHandler::new(
                resolver,
                orchestrator,
                converter.clone(),
                transcriber,
                settings.canonical,
                settings.max_upload_size,
                settings.work_dir.clone(),
            ),
            upload_voice_handler: UploadVoiceHandler::new(
                store.clone(),
                converter,
                UploadPolicy {
                    max_upload_size: settings.max_upload_size,
                    reserved_label: settings.default_voice.label.clone(),
                    canonical: settings.canonical,
                },
                settings.work_dir,
            ),

            // Query handlers
            list_voices_handler: ListVoicesHandler::new(store, settings.default_voice.label),
        }
    }
}
