//! 헬스 체크 endpoint.
//!
//! 저장소가 PING에 응답하면 200, 아니면 503을 반환합니다.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" | "unhealthy"
    pub status: String,
    /// 저장소 상태 ("up" | "down")
    pub store: String,
    pub version: String,
    pub uptime_secs: i64,
    /// 현재 시간 (ISO 8601)
    pub timestamp: String,
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store_up = match state.store.health_check().await {
        Ok(up) => up,
        Err(e) => {
            tracing::warn!(error = %e, "저장소 헬스 체크 실패");
            false
        }
    };

    let (status_code, status, store) = if store_up {
        (StatusCode::OK, "healthy", "up")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "down")
    };

    let response = HealthResponse {
        status: status.to_string(),
        store: store.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get_json, seeded_store, state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_healthy_store() {
        let (status, body) = get_json(state(seeded_store().await), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["store"], "up");
    }

    #[tokio::test]
    async fn test_unreachable_store_is_503() {
        let store = seeded_store().await;
        store.set_available(false);
        let (status, body) = get_json(state(store), "/health").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["store"], "down");
    }
}
