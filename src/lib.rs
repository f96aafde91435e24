//! Echovox - 参考音色驱动的 TTS 编排服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - 文本分块
//! - Voice: 音色标签、格式、参考音色
//! - Speech: 合成片段与交叉淡化拼接
//!
//! 应用层 (application/):
//! - Ports: 端口定义（InferenceEngine, Transcriber, AudioConverter, VoiceStore, TranscriptCache）
//! - Services: VoiceResolver, SynthesisOrchestrator
//! - Commands / Queries: CQRS 处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Adapters: 模型服务客户端、symphonia 转换器、文件音色存储
//! - Persistence: Sled 转写缓存

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
