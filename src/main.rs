//! Echovox - 参考音色驱动的 TTS 编排服务

use std::sync::Arc;

use echovox::application::{
    AudioConverterPort, CanonicalFormat, DefaultVoice, InferenceEnginePort, OrchestratorConfig,
    RequestScratch, SynthesizeSpeech, TranscriptCachePort, VoiceStorePort,
};
use echovox::config::{load_config, print_config, AppConfig, EngineKind};
use echovox::domain::voice::{AudioFormat, VoiceLabel};
use echovox::infrastructure::adapters::{
    FakeInferenceEngine, FileVoiceStore, GuardedEngine, HttpInferenceClient,
    HttpInferenceClientConfig, SymphoniaConverter,
};
use echovox::infrastructure::http::{AppState, HttpServer, ServerConfig, ServiceSettings};
use echovox::infrastructure::persistence::SledTranscriptCache;

fn init_logging(config: &AppConfig) {
    let log_filter = format!(
        "{},echovox={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 缺少 `<default_label>.wav` 时，由 `voice.default_source` 生成
async fn install_default_voice(
    config: &AppConfig,
    store: &FileVoiceStore,
    converter: &SymphoniaConverter,
    canonical: CanonicalFormat,
    label: &VoiceLabel,
) -> anyhow::Result<()> {
    let target = store.asset_path(label, AudioFormat::Wav);
    if tokio::fs::try_exists(&target).await? {
        return Ok(());
    }

    let Some(source) = config.voice.default_source.as_ref() else {
        tracing::warn!(
            path = %target.display(),
            "Default voice asset is missing and voice.default_source is not set"
        );
        return Ok(());
    };

    let scratch = RequestScratch::create_in(&config.storage.work_dir)?;
    let converted = scratch.file("default.wav");
    let info = converter.convert(source, &converted, canonical).await?;
    let data = tokio::fs::read(&converted).await?;
    store.save(label, AudioFormat::Wav, &data).await?;

    tracing::info!(
        source = %source.display(),
        path = %target.display(),
        duration_ms = info.duration_ms,
        "Installed default voice"
    );
    Ok(())
}

async fn warmup(state: &AppState, text: &str) {
    tracing::info!(engine = %state.engine.name(), "Warming up engine");

    let command = SynthesizeSpeech {
        text: text.to_string(),
        voice: None,
        speed: None,
    };
    match state.synthesize_handler.handle(command).await {
        Ok(speech) => tracing::info!(duration_ms = speech.duration_ms, "Warmup completed"),
        Err(e) => tracing::warn!(error = %e, "Warmup failed"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_logging(&config);

    tracing::info!("Echovox v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    // 确保数据目录存在
    tokio::fs::create_dir_all(&config.storage.work_dir).await?;
    if let Some(parent) = config.storage.cache_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let store = FileVoiceStore::open(&config.storage.voices_dir).await?;

    let canonical = CanonicalFormat {
        sample_rate: config.audio.sample_rate,
        channels: config.audio.channels,
    };
    let default_voice = DefaultVoice {
        label: VoiceLabel::new(config.voice.default_label.as_str())?,
        transcript: config.voice.default_transcript.clone(),
    };

    let converter = Arc::new(SymphoniaConverter::new());
    install_default_voice(&config, &store, &converter, canonical, &default_voice.label).await?;

    // 引擎句柄：推理与转写共享同一把锁
    let engine = Arc::new(match config.engine.kind {
        EngineKind::Http => {
            let client_config = HttpInferenceClientConfig::new(config.engine.url.as_str())
                .with_timeout(config.engine.timeout_secs);
            GuardedEngine::new(HttpInferenceClient::new(client_config, converter.clone())?)
        }
        EngineKind::Fake => GuardedEngine::new(FakeInferenceEngine::with_defaults()),
    });

    if !engine.health_check().await {
        tracing::warn!(engine = %engine.name(), "Engine health check failed");
    }

    let transcript_cache = Arc::new(SledTranscriptCache::open(&config.storage.cache_path)?);

    let state = Arc::new(AppState::new(
        engine.clone(),
        engine,
        Arc::new(store),
        converter,
        transcript_cache.clone(),
        ServiceSettings {
            default_voice,
            canonical,
            orchestrator: OrchestratorConfig {
                max_words_per_chunk: config.audio.max_words_per_chunk,
                crossfade_ms: config.audio.crossfade_ms,
            },
            max_upload_size: config.storage.max_upload_size,
            work_dir: config.storage.work_dir.clone(),
        },
    ));

    if config.engine.warmup {
        warmup(&state, &config.engine.warmup_text).await;
    }

    // multipart 开销之外留出余量，超限文件由处理器返回业务错误
    let body_limit = (config.storage.max_upload_size as usize).saturating_mul(2) + 1024 * 1024;
    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_body_limit(body_limit);
    let server = HttpServer::new(server_config, state.clone());

    server.run_with_shutdown(shutdown_signal()).await?;

    let stats = transcript_cache.stats().await;
    if let Err(e) = transcript_cache.flush() {
        tracing::warn!(error = %e, "Failed to flush transcript cache");
    }
    tracing::info!(
        entries = stats.total_entries,
        hits = stats.hit_count,
        misses = stats.miss_count,
        "Server shutdown complete"
    );

    Ok(())
}
