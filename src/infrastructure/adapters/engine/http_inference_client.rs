//! HTTP Inference Client - 调用外部模型服务
//!
//! 同时实现 InferenceEnginePort 与 TranscriberPort
//!
//! 外部模型服务 API:
//! POST {base_url}/infer       multipart: ref_audio(file), ref_text, gen_text, speed → audio/wav
//! POST {base_url}/transcribe  multipart: audio(file) → {"text": "..."}
//! GET  {base_url}/health

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    AudioConverterPort, InferRequest, InferResponse, InferenceEnginePort, TranscriberPort,
    TtsError,
};

/// 转写响应体
#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    text: String,
}

/// HTTP 推理客户端配置
#[derive(Debug, Clone)]
pub struct HttpInferenceClientConfig {
    /// 模型服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpInferenceClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
        }
    }
}

impl HttpInferenceClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP 推理客户端
///
/// 返回的 WAV 通过 AudioConverterPort 解码为单声道样本
pub struct HttpInferenceClient {
    client: Client,
    config: HttpInferenceClientConfig,
    converter: Arc<dyn AudioConverterPort>,
    name: String,
}

impl HttpInferenceClient {
    pub fn new(
        config: HttpInferenceClientConfig,
        converter: Arc<dyn AudioConverterPort>,
    ) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let config = HttpInferenceClientConfig { base_url, ..config };
        let name = format!("http:{}", config.base_url);

        Ok(Self {
            client,
            config,
            converter,
            name,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    async fn audio_part(path: &Path) -> Result<Part, TtsError> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            TtsError::InvalidInput(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.wav".to_string());

        Part::bytes(data)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| TtsError::InvalidInput(e.to_string()))
    }

    async fn send(&self, path: &str, form: Form) -> Result<reqwest::Response, TtsError> {
        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        Ok(response)
    }
}

fn map_request_error(e: reqwest::Error) -> TtsError {
    if e.is_timeout() {
        TtsError::Timeout
    } else if e.is_connect() {
        TtsError::NetworkError(format!("Cannot connect to model service: {}", e))
    } else {
        TtsError::NetworkError(e.to_string())
    }
}

#[async_trait]
impl InferenceEnginePort for HttpInferenceClient {
    async fn infer(&self, request: InferRequest) -> Result<InferResponse, TtsError> {
        tracing::debug!(
            url = %self.url("infer"),
            gen_len = request.gen_text.len(),
            reference = %request.reference_audio.display(),
            speed = request.speed,
            "Sending infer request"
        );

        let form = Form::new()
            .part("ref_audio", Self::audio_part(&request.reference_audio).await?)
            .text("ref_text", request.reference_text)
            .text("gen_text", request.gen_text)
            .text("speed", request.speed.to_string());

        let audio_data = self
            .send("infer", form)
            .await?
            .bytes()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read audio: {}", e)))?;

        let waveform = self
            .converter
            .decode_wav(&audio_data)
            .map_err(|e| TtsError::InvalidResponse(format!("Undecodable audio: {}", e)))?;

        tracing::debug!(
            audio_size = audio_data.len(),
            samples = waveform.samples.len(),
            sample_rate = waveform.sample_rate,
            "Inference completed"
        );

        Ok(InferResponse {
            samples: waveform.samples,
            sample_rate: waveform.sample_rate,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.url("health"))
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl TranscriberPort for HttpInferenceClient {
    async fn transcribe(&self, audio: &Path) -> Result<String, TtsError> {
        let form = Form::new().part("audio", Self::audio_part(audio).await?);

        let body: TranscribeResponse = self
            .send("transcribe", form)
            .await?
            .json()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Invalid transcription: {}", e)))?;

        tracing::debug!(audio = %audio.display(), text_len = body.text.len(), "Transcribed");
        Ok(body.text)
    }
}
