//! Speech Command Handlers

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::commands::{ChangeVoice, SynthesizeSpeech};
use crate::application::error::ApplicationError;
use crate::application::ports::{AudioConverterPort, CanonicalFormat, TranscriberPort};
use crate::application::scratch::RequestScratch;
use crate::application::services::{SynthesisOrchestrator, SynthesisOutput, VoiceResolver};
use crate::domain::voice::{AudioFormat, Speed, VoiceLabel};

/// 合成结果（WAV）
#[derive(Debug, Clone)]
pub struct SynthesizedSpeech {
    pub voice: String,
    pub wav_data: Vec<u8>,
    pub sample_rate: u32,
    pub duration_ms: u64,
    pub chunk_count: usize,
}

fn encode_output(
    converter: &dyn AudioConverterPort,
    voice: &VoiceLabel,
    output: SynthesisOutput,
) -> Result<SynthesizedSpeech, ApplicationError> {
    let wav_data = converter
        .encode_wav(&output.audio.samples, output.audio.sample_rate)
        .map_err(|e| ApplicationError::internal(format!("Failed to encode output: {}", e)))?;

    Ok(SynthesizedSpeech {
        voice: voice.to_string(),
        wav_data,
        sample_rate: output.audio.sample_rate,
        duration_ms: output.audio.duration_ms(),
        chunk_count: output.chunk_count,
    })
}

// ============================================================================
// SynthesizeSpeech
// ============================================================================

/// SynthesizeSpeech Handler
pub struct SynthesizeSpeechHandler {
    resolver: Arc<VoiceResolver>,
    orchestrator: Arc<SynthesisOrchestrator>,
    converter: Arc<dyn AudioConverterPort>,
    work_dir: PathBuf,
}

impl SynthesizeSpeechHandler {
    pub fn new(
        resolver: Arc<VoiceResolver>,
        orchestrator: Arc<SynthesisOrchestrator>,
        converter: Arc<dyn AudioConverterPort>,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            resolver,
            orchestrator,
            converter,
            work_dir,
        }
    }

    pub async fn handle(
        &self,
        command: SynthesizeSpeech,
    ) -> Result<SynthesizedSpeech, ApplicationError> {
        if command.text.trim().is_empty() {
            return Err(ApplicationError::validation("Text is required"));
        }

        let label = match command.voice {
            Some(voice) => VoiceLabel::new(voice)?,
            None => self.resolver.default_voice().label.clone(),
        };
        let speed = command.speed.map(Speed::new).transpose()?.unwrap_or_default();

        tracing::info!(voice = %label, text_len = command.text.len(), "Generating speech");

        let scratch = RequestScratch::create_in(&self.work_dir)?;
        let voice = self.resolver.resolve(&label, &scratch).await?;
        let output = self
            .orchestrator
            .synthesize(&command.text, &voice, speed)
            .await?;

        encode_output(self.converter.as_ref(), &label, output)
    }
}

// ============================================================================
// ChangeVoice
// ============================================================================

/// ChangeVoice Handler
pub struct ChangeVoiceHandler {
    resolver: Arc<VoiceResolver>,
    orchestrator: Arc<SynthesisOrchestrator>,
    converter: Arc<dyn AudioConverterPort>,
    transcriber: Arc<dyn TranscriberPort>,
    canonical: CanonicalFormat,
    max_upload_size: u64,
    work_dir: PathBuf,
}

impl ChangeVoiceHandler {
    pub fn new(
        resolver: Arc<VoiceResolver>,
        orchestrator: Arc<SynthesisOrchestrator>,
        converter: Arc<dyn AudioConverterPort>,
        transcriber: Arc<dyn TranscriberPort>,
        canonical: CanonicalFormat,
        max_upload_size: u64,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            resolver,
            orchestrator,
            converter,
            transcriber,
            canonical,
            max_upload_size,
            work_dir,
        }
    }

    pub async fn handle(&self, command: ChangeVoice) -> Result<SynthesizedSpeech, ApplicationError> {
        let label = VoiceLabel::new(command.reference_speaker)?;

        if command.audio_data.is_empty() {
            return Err(ApplicationError::validation("Audio file is required"));
        }
        if command.audio_data.len() as u64 > self.max_upload_size {
            return Err(ApplicationError::validation(format!(
                "File size is over limit. Max size is {} bytes.",
                self.max_upload_size
            )));
        }

        let extension = command
            .file_name
            .as_deref()
            .and_then(AudioFormat::from_file_name)
            .unwrap_or(AudioFormat::Wav)
            .extension();

        tracing::info!(voice = %label, size = command.audio_data.len(), "Changing voice");

        let scratch = RequestScratch::create_in(&self.work_dir)?;
        let input_path = scratch.file(&format!("input.{}", extension));
        tokio::fs::write(&input_path, &command.audio_data).await?;

        let canonical_input = scratch.file("input_canonical.wav");
        self.converter
            .convert(&input_path, &canonical_input, self.canonical)
            .await?;

        let transcript = self
            .transcriber
            .transcribe(&canonical_input)
            .await
            .map_err(|e| {
                ApplicationError::ExternalServiceError(format!("Failed to transcribe input: {}", e))
            })?
            .trim()
            .to_string();

        if transcript.is_empty() {
            return Err(ApplicationError::validation("No speech detected in input audio"));
        }

        tracing::debug!(transcript_len = transcript.len(), "Input transcribed");

        let reference = self.resolver.resolve_waveform(&label, &scratch).await?;
        let output = self
            .orchestrator
            .regenerate(&reference.path, &transcript, Speed::default())
            .await?;

        encode_output(self.converter.as_ref(), &label, output)
    }
}
