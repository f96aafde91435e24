//! 应用服务 - 合成流水线
//!
//! - VoiceResolver: 参考音色解析
//! - SynthesisOrchestrator: 分块推理与拼接

mod synthesis_orchestrator;
mod voice_resolver;

pub use synthesis_orchestrator::{OrchestratorConfig, SynthesisOrchestrator, SynthesisOutput};
pub use voice_resolver::{DefaultVoice, ResolvedWaveform, VoiceResolver};
