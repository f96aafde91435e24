//! Speech HTTP Handlers
//!
//! 返回 audio/wav，附带 X-Engine / X-Chunk-Count / X-Audio-Duration-Ms 响应头

use axum::{
    body::Body,
    extract::{Multipart, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use std::sync::Arc;

use crate::application::{ChangeVoice, SynthesizeSpeech, SynthesizedSpeech};
use crate::infrastructure::http::dto::{BaseSynthesizeQuery, SynthesizeQuery};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub const CHUNK_COUNT_HEADER: &str = "x-chunk-count";
pub const AUDIO_DURATION_HEADER: &str = "x-audio-duration-ms";
pub const ENGINE_HEADER: &str = "x-engine";

fn audio_response(speech: SynthesizedSpeech, engine: &str) -> Result<Response, ApiError> {
    let engine = HeaderValue::from_str(engine)
        .map_err(|e| ApiError::Internal(format!("Invalid engine name '{}': {}", engine, e)))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/wav")
        .header(header::CONTENT_LENGTH, speech.wav_data.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}.wav\"", speech.voice),
        )
        .header(ENGINE_HEADER, engine)
        .header(CHUNK_COUNT_HEADER, HeaderValue::from(speech.chunk_count))
        .header(AUDIO_DURATION_HEADER, HeaderValue::from(speech.duration_ms))
        .body(Body::from(speech.wav_data))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}

/// 以指定音色合成
pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SynthesizeQuery>,
) -> Result<Response, ApiError> {
    let command = SynthesizeSpeech {
        text: query.text,
        voice: query.voice.filter(|v| !v.trim().is_empty()),
        speed: query.speed,
    };

    let speech = state.synthesize_handler.handle(command).await?;

    tracing::info!(
        voice = %speech.voice,
        chunks = speech.chunk_count,
        duration_ms = speech.duration_ms,
        "Speech synthesized"
    );

    audio_response(speech, state.engine.name())
}

/// 以内置默认音色合成
pub async fn synthesize_base(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BaseSynthesizeQuery>,
) -> Result<Response, ApiError> {
    let command = SynthesizeSpeech {
        text: query.text,
        voice: None,
        speed: query.speed,
    };

    let speech = state.synthesize_handler.handle(command).await?;
    audio_response(speech, state.engine.name())
}

/// 变声：保留输入内容，换成参考音色
pub async fn change_voice(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut reference_speaker: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut audio_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "reference_speaker" => {
                reference_speaker = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read reference_speaker: {}", e))
                })?);
            }
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                audio_data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    let reference_speaker = reference_speaker
        .ok_or_else(|| ApiError::BadRequest("reference_speaker is required".to_string()))?;
    let audio_data =
        audio_data.ok_or_else(|| ApiError::BadRequest("Audio file is required".to_string()))?;

    let speech = state
        .change_voice_handler
        .handle(ChangeVoice {
            reference_speaker,
            file_name,
            audio_data,
        })
        .await?;

    tracing::info!(
        voice = %speech.voice,
        duration_ms = speech.duration_ms,
        "Voice changed"
    );

    audio_response(speech, state.engine.name())
}
