//! API 에러 응답 타입.
//!
//! 모든 에러는 같은 JSON 형식으로 응답합니다:
//!
//! ```json
//! { "code": "UNKNOWN_COIN", "message": "coin is not in the coin list: DOGE" }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use coinfeed_data::DataError;
use serde::{Deserialize, Serialize};

/// API 에러 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "UNKNOWN_OPERATION", "STORE_UNAVAILABLE")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// 핸들러 에러.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("coin is not in the coin list: {0}")]
    UnknownCoin(String),

    #[error("store unavailable: {0}")]
    Store(#[from] DataError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownOperation(_) | Self::UnknownCoin(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownOperation(_) => "UNKNOWN_OPERATION",
            Self::UnknownCoin(_) => "UNKNOWN_COIN",
            Self::Store(_) => "STORE_UNAVAILABLE",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Store(e) = &self {
            tracing::error!(error = %e, "저장소 조회 실패");
        }

        let body = ApiErrorResponse::new(self.code(), self.to_string());
        (self.status_code(), Json(body)).into_response()
    }
}
