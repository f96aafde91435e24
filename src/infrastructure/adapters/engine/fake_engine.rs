//! Fake Inference Engine - 用于测试 / 离线运行的推理引擎
//!
//! 不调用模型服务：每个单词生成一段正弦音，转写返回固定文本

use async_trait::async_trait;
use std::path::Path;

use crate::application::ports::{
    InferRequest, InferResponse, InferenceEnginePort, TranscriberPort, TtsError,
};

/// Fake Inference Engine 配置
#[derive(Debug, Clone)]
pub struct FakeInferenceEngineConfig {
    /// 输出采样率
    pub sample_rate: u32,
    /// 每个单词的时长（毫秒），按语速缩放
    pub ms_per_word: u32,
    /// 正弦音频率
    pub tone_hz: f32,
    /// 转写固定返回的文本
    pub transcript: String,
    /// 模拟推理延迟（毫秒）
    pub latency_ms: u64,
}

impl Default for FakeInferenceEngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            ms_per_word: 120,
            tone_hz: 220.0,
            transcript: "This is a fake transcription.".to_string(),
            latency_ms: 0,
        }
    }
}

/// Fake Inference Engine
pub struct FakeInferenceEngine {
    config: FakeInferenceEngineConfig,
}

impl FakeInferenceEngine {
    pub fn new(config: FakeInferenceEngineConfig) -> Self {
        tracing::info!(
            sample_rate = config.sample_rate,
            ms_per_word = config.ms_per_word,
            "FakeInferenceEngine initialized"
        );
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeInferenceEngineConfig::default())
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }
}

#[async_trait]
impl InferenceEnginePort for FakeInferenceEngine {
    async fn infer(&self, request: InferRequest) -> Result<InferResponse, TtsError> {
        if request.gen_text.trim().is_empty() {
            return Err(TtsError::InvalidInput("gen_text is empty".to_string()));
        }
        if request.speed <= 0.0 {
            return Err(TtsError::InvalidInput(format!("speed {}", request.speed)));
        }

        tracing::debug!(
            gen_len = request.gen_text.len(),
            reference = %request.reference_audio.display(),
            "FakeInferenceEngine: generating tone"
        );

        self.simulate_latency().await;

        let words = request.gen_text.split_whitespace().count() as f64;
        let frames = (words * self.config.ms_per_word as f64 * self.config.sample_rate as f64
            / 1000.0
            / request.speed as f64)
            .round() as usize;
        let step = 2.0 * std::f32::consts::PI * self.config.tone_hz / self.config.sample_rate as f32;
        let samples = (0..frames).map(|i| (i as f32 * step).sin() * 0.3).collect();

        Ok(InferResponse {
            samples,
            sample_rate: self.config.sample_rate,
        })
    }

    fn name(&self) -> &str {
        "fake"
    }
}

#[async_trait]
impl TranscriberPort for FakeInferenceEngine {
    async fn transcribe(&self, audio: &Path) -> Result<String, TtsError> {
        if !audio.exists() {
            return Err(TtsError::InvalidInput(format!(
                "{} does not exist",
                audio.display()
            )));
        }
        self.simulate_latency().await;
        Ok(self.config.transcript.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str, speed: f32) -> InferRequest {
        InferRequest {
            reference_audio: "ref.wav".into(),
            reference_text: "ref".to_string(),
            gen_text: text.to_string(),
            speed,
        }
    }

    #[tokio::test]
    async fn test_length_scales_with_words_and_speed() {
        let engine = FakeInferenceEngine::with_defaults();

        let one = engine.infer(request("hello", 1.0)).await.unwrap();
        let four = engine.infer(request("one two three four", 1.0)).await.unwrap();
        let fast = engine.infer(request("one two three four", 2.0)).await.unwrap();

        assert_eq!(one.sample_rate, 22050);
        assert_eq!(one.samples.len(), 2646); // 120ms @ 22050
        assert_eq!(four.samples.len(), 4 * 2646);
        assert_eq!(fast.samples.len(), 2 * 2646);
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let engine = FakeInferenceEngine::with_defaults();
        assert!(matches!(
            engine.infer(request("   ", 1.0)).await,
            Err(TtsError::InvalidInput(_))
        ));
    }
}
