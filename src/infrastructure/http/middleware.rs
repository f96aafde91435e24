//! HTTP Middleware
//!
//! 请求计时与 HTTP 状态码错误日志

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;

/// 处理耗时响应头（秒）
pub const ELAPSED_TIME_HEADER: &str = "x-elapsed-time";

/// 请求计时中间件
///
/// 为每个响应写入 `X-Elapsed-Time`，状态码为 4xx / 5xx 时记录日志。
/// 业务错误（errno != 0）在 ApiError::into_response() 中记录
pub async fn timing_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let mut response = next.run(request).await;
    let elapsed = started.elapsed();
    let status = response.status();

    if let Ok(value) = HeaderValue::from_str(&format!("{:.3}", elapsed.as_secs_f64())) {
        response.headers_mut().insert(ELAPSED_TIME_HEADER, value);
    }

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "HTTP client error"
        );
    } else {
        tracing::debug!(
            method = %method,
            uri = %uri,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    async fn ok_handler() -> &'static str {
        "OK"
    }

    async fn error_handler() -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/ok", get(ok_handler))
            .route("/error", get(error_handler))
            .layer(axum::middleware::from_fn(timing_middleware))
    }

    #[tokio::test]
    async fn test_elapsed_header_on_success() {
        let app = create_test_router();
        let request = HttpRequest::builder().uri("/ok").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let elapsed: f64 = response.headers()[ELAPSED_TIME_HEADER]
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!(elapsed >= 0.0);
    }

    #[tokio::test]
    async fn test_elapsed_header_on_error() {
        let app = create_test_router();
        let request = HttpRequest::builder().uri("/error").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key(ELAPSED_TIME_HEADER));
    }

    #[tokio::test]
    async fn test_unknown_route_is_timed() {
        let app = create_test_router();
        let request = HttpRequest::builder().uri("/missing").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
