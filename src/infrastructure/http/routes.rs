//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping               GET   健康检查
//! - /api/tts/synthesize     GET   以指定音色合成（text, voice, speed）
//! - /api/tts/base           GET   以默认音色合成（text, speed）
//! - /api/tts/change_voice   POST  变声（multipart: reference_speaker, file）
//! - /api/voice/upload       POST  上传参考音频（multipart: audio_file_label, file）
//! - /api/voice/list         GET   列出所有音色

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/tts", tts_routes())
        .nest("/voice", voice_routes())
}

/// TTS 路由
fn tts_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/synthesize", get(handlers::synthesize))
        .route("/base", get(handlers::synthesize_base))
        .route("/change_voice", post(handlers::change_voice))
}

/// Voice 路由
fn voice_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload", post(handlers::upload_voice))
        .route("/list", get(handlers::list_voices))
}
