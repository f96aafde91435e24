//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, EngineKind};
use crate::domain::voice::VoiceLabel;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `ECHOVOX_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `ECHOVOX_SERVER__PORT=8080`
/// - `ECHOVOX_ENGINE__URL=http://model-server:8000`
/// - `ECHOVOX_ENGINE__KIND=fake`
/// - `ECHOVOX_STORAGE__VOICES_DIR=/data/resources`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5060)?
        .set_default("engine.kind", "http")?
        .set_default("engine.url", "http://localhost:8000")?
        .set_default("engine.timeout_secs", 120)?
        .set_default("engine.warmup", true)?
        .set_default("audio.sample_rate", 22050)?
        .set_default("audio.channels", 1)?
        .set_default("audio.max_words_per_chunk", 100)?
        .set_default("audio.crossfade_ms", 50)?
        .set_default("voice.default_label", "default_en")?
        .set_default("storage.voices_dir", "resources")?
        .set_default("storage.work_dir", "outputs")?
        .set_default("storage.cache_path", "data/transcripts.sled")?
        .set_default("storage.max_upload_size", 5 * 1024 * 1024)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: ECHOVOX_ENGINE__URL=http://model-server:8000
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("ECHOVOX")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.engine.kind == EngineKind::Http && config.engine.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Engine URL cannot be empty".to_string(),
        ));
    }

    if config.audio.sample_rate == 0 {
        return Err(ConfigError::ValidationError(
            "Audio sample rate cannot be 0".to_string(),
        ));
    }

    if config.audio.channels != 1 {
        return Err(ConfigError::ValidationError(format!(
            "Audio channels must be 1 (mono), got {}",
            config.audio.channels
        )));
    }

    if config.audio.max_words_per_chunk == 0 {
        return Err(ConfigError::ValidationError(
            "max_words_per_chunk cannot be 0".to_string(),
        ));
    }

    VoiceLabel::new(config.voice.default_label.as_str()).map_err(|e| {
        ConfigError::ValidationError(format!("Invalid default voice label: {}", e))
    })?;

    if config.voice.default_transcript.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Default voice transcript cannot be empty".to_string(),
        ));
    }

    if config.storage.max_upload_size == 0 {
        return Err(ConfigError::ValidationError(
            "max_upload_size cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Engine: {:?} ({})", config.engine.kind, config.engine.url);
    tracing::info!("Engine Timeout: {}s", config.engine.timeout_secs);
    tracing::info!("Warmup: {}", config.engine.warmup);
    tracing::info!(
        "Canonical Audio: {} Hz, {} channel(s)",
        config.audio.sample_rate,
        config.audio.channels
    );
    tracing::info!(
        "Chunking: {} words, crossfade {}ms",
        config.audio.max_words_per_chunk,
        config.audio.crossfade_ms
    );
    tracing::info!("Default Voice: {}", config.voice.default_label);
    tracing::info!("Voices Directory: {:?}", config.storage.voices_dir);
    tracing::info!("Work Directory: {:?}", config.storage.work_dir);
    tracing::info!("Transcript Cache: {:?}", config.storage.cache_path);
    tracing::info!("Max Upload Size: {} bytes", config.storage.max_upload_size);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_engine_url() {
        let mut config = AppConfig::default();
        config.engine.url = String::new();
        assert!(validate_config(&config).is_err());

        config.engine.kind = EngineKind::Fake;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_bad_label() {
        let mut config = AppConfig::default();
        config.voice.default_label = "../etc".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_chunk_size() {
        let mut config = AppConfig::default();
        config.audio.max_words_per_chunk = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_stereo() {
        let mut config = AppConfig::default();
        config.audio.channels = 2;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("echovox.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9090

[engine]
kind = "fake"
warmup = false

[audio]
crossfade_ms = 20

[storage]
voices_dir = "/srv/voices"
"#,
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.engine.kind, EngineKind::Fake);
        assert!(!config.engine.warmup);
        assert_eq!(config.audio.crossfade_ms, 20);
        assert_eq!(config.audio.sample_rate, 22050);
        assert_eq!(config.storage.voices_dir, std::path::PathBuf::from("/srv/voices"));
        assert_eq!(config.voice.default_label, "default_en");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[audio]\nchannels = 6\n").unwrap();

        assert!(matches!(
            load_config_from_path(Some(&path)),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
