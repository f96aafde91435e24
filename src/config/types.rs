//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 推理引擎配置
    #[serde(default)]
    pub engine: EngineConfig,

    /// 音频配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 默认音色配置
    #[serde(default)]
    pub voice: VoiceConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5060
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 引擎类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// 外部模型服务
    Http,
    /// 本地假引擎（离线调试）
    Fake,
}

impl Default for EngineKind {
    fn default() -> Self {
        Self::Http
    }
}

/// 推理引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub kind: EngineKind,

    /// 模型服务基础 URL
    #[serde(default = "default_engine_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,

    /// 启动时是否预热
    #[serde(default = "default_warmup")]
    pub warmup: bool,

    /// 预热文本
    #[serde(default = "default_warmup_text")]
    pub warmup_text: String,
}

fn default_engine_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_engine_timeout() -> u64 {
    120
}

fn default_warmup() -> bool {
    true
}

fn default_warmup_text() -> String {
    "This is a warmup sentence.".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::default(),
            url: default_engine_url(),
            timeout_secs: default_engine_timeout(),
            warmup: default_warmup(),
            warmup_text: default_warmup_text(),
        }
    }
}

/// 音频配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// 规范采样率（Hz）
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// 规范声道数，只允许单声道
    #[serde(default = "default_channels")]
    pub channels: u8,

    /// 每个文本块的最大单词数
    #[serde(default = "default_max_words_per_chunk")]
    pub max_words_per_chunk: usize,

    /// 片段之间的交叉淡化时长（毫秒）
    #[serde(default = "default_crossfade_ms")]
    pub crossfade_ms: u32,
}

fn default_sample_rate() -> u32 {
    22050
}

fn default_channels() -> u8 {
    1 // 单声道
}

fn default_max_words_per_chunk() -> usize {
    100
}

fn default_crossfade_ms() -> u32 {
    50
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            max_words_per_chunk: default_max_words_per_chunk(),
            crossfade_ms: default_crossfade_ms(),
        }
    }
}

/// 默认音色配置
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    /// 内置默认音色标签
    #[serde(default = "default_label")]
    pub default_label: String,

    /// 默认音色参考音频的转写文本
    #[serde(default = "default_transcript")]
    pub default_transcript: String,

    /// 默认音色的源音频，启动时缺少 `<default_label>.wav` 则由此生成
    #[serde(default)]
    pub default_source: Option<PathBuf>,
}

fn default_label() -> String {
    "default_en".to_string()
}

fn default_transcript() -> String {
    "Some call me nature, others call me mother nature.".to_string()
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            default_label: default_label(),
            default_transcript: default_transcript(),
            default_source: None,
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 参考音频存储目录
    #[serde(default = "default_voices_dir")]
    pub voices_dir: PathBuf,

    /// 请求级临时文件目录
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// 转写缓存数据库路径
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// 上传文件最大大小（字节），默认 5MB
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_voices_dir() -> PathBuf {
    PathBuf::from("resources")
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("data/transcripts.sled")
}

fn default_max_upload_size() -> u64 {
    5 * 1024 * 1024 // 5 MB
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            voices_dir: default_voices_dir(),
            work_dir: default_work_dir(),
            cache_path: default_cache_path(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
