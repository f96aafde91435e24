//! Synthesis Orchestrator - 多片段合成编排
//!
//! 文本分块 → 逐块推理（共享参考音色）→ 交叉淡化拼接

use std::path::Path;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{InferRequest, InferenceEnginePort};
use crate::domain::speech::{stitch, StitchedAudio, SynthesisSegment};
use crate::domain::voice::{Speed, VoiceReference};
use crate::domain::{segment, TextChunk};

/// 编排器配置
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// 每块最大词数
    pub max_words_per_chunk: usize,
    /// 块间交叉淡化时长（毫秒）
    pub crossfade_ms: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_words_per_chunk: crate::domain::DEFAULT_MAX_WORDS_PER_CHUNK,
            crossfade_ms: crate::domain::speech::DEFAULT_CROSSFADE_MS,
        }
    }
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    pub audio: StitchedAudio,
    pub chunk_count: usize,
}

pub struct SynthesisOrchestrator {
    engine: Arc<dyn InferenceEnginePort>,
    config: OrchestratorConfig,
}

impl SynthesisOrchestrator {
    pub fn new(engine: Arc<dyn InferenceEnginePort>, config: OrchestratorConfig) -> Self {
        Self { engine, config }
    }

    /// 合成整段文本
    ///
    /// 块严格按顺序逐个推理；任一块失败则整个请求失败，不返回部分结果
    pub async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceReference,
        speed: Speed,
    ) -> Result<SynthesisOutput, ApplicationError> {
        let chunks = segment(text, self.config.max_words_per_chunk);
        let chunk_count = chunks.len();

        tracing::info!(
            voice = %voice.label(),
            chunks = chunk_count,
            speed = speed.value(),
            "Synthesizing speech"
        );

        let mut segments = Vec::with_capacity(chunk_count);
        for chunk in &chunks {
            tracing::info!("Processing chunk {}/{}", chunk.index + 1, chunk_count);
            let segment = self
                .infer_chunk(chunk, voice.waveform(), voice.transcript(), speed)
                .await?;
            segments.push(segment);
        }

        let audio = stitch(segments, self.config.crossfade_ms)?;

        tracing::debug!(
            chunks = chunk_count,
            duration_ms = audio.duration_ms(),
            "Stitched synthesis output"
        );

        Ok(SynthesisOutput { audio, chunk_count })
    }

    /// 以参考波形重新生成一段已知文本
    ///
    /// transcript 同时作为参考文本和生成文本，保留原音频的节奏
    pub async fn regenerate(
        &self,
        reference_audio: &Path,
        transcript: &str,
        speed: Speed,
    ) -> Result<SynthesisOutput, ApplicationError> {
        let chunk = TextChunk {
            index: 0,
            word_count: crate::domain::word_count(transcript),
            text: transcript.to_string(),
        };
        let segment = self
            .infer_chunk(&chunk, reference_audio, transcript, speed)
            .await?;
        let audio = stitch(vec![segment], self.config.crossfade_ms)?;

        Ok(SynthesisOutput {
            audio,
            chunk_count: 1,
        })
    }

    async fn infer_chunk(
        &self,
        chunk: &TextChunk,
        reference_audio: &Path,
        reference_text: &str,
        speed: Speed,
    ) -> Result<SynthesisSegment, ApplicationError> {
        let request = InferRequest {
            reference_audio: reference_audio.to_path_buf(),
            reference_text: reference_text.to_string(),
            gen_text: chunk.text.clone(),
            speed: speed.value(),
        };

        let response = self.engine.infer(request).await.map_err(|e| {
            tracing::error!(chunk = chunk.index, error = %e, "Chunk inference failed");
            ApplicationError::SynthesisError(format!("chunk {} failed: {}", chunk.index, e))
        })?;

        Ok(SynthesisSegment::new(
            chunk.index,
            response.samples,
            response.sample_rate,
        ))
    }
}
