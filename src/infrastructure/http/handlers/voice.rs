//! Voice HTTP Handlers

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;

use crate::application::{ListVoices, UploadVoice};
use crate::infrastructure::http::dto::{ApiResponse, UploadVoiceResponseDto, VoiceResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 上传参考音频
pub async fn upload_voice(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadVoiceResponseDto>>, ApiError> {
    let mut label: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut audio_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "audio_file_label" => {
                label = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read audio_file_label: {}", e))
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

    let label =
        label.ok_or_else(|| ApiError::BadRequest("audio_file_label is required".to_string()))?;
    let audio_data =
        audio_data.ok_or_else(|| ApiError::BadRequest("Audio file is required".to_string()))?;

    let command = UploadVoice {
        label,
        file_name: file_name.unwrap_or_default(),
        audio_data,
    };

    let result = state.upload_voice_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(result.into())))
}

/// 获取音色列表
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<VoiceResponse>>>, ApiError> {
    let result = state.list_voices_handler.handle(ListVoices).await?;

    Ok(Json(ApiResponse::success(
        result.into_iter().map(VoiceResponse::from).collect(),
    )))
}
