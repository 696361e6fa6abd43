//! coinfeed 조회 API.
//!
//! 수집기가 채운 캐시를 읽기 전용으로 노출합니다. upstream API는 호출하지 않습니다.
//!
//! - `GET /coinglass/{operation}?coin=SYM`
//! - `GET /coingecko?id=SYM`
//! - `GET /health`

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::ApiConfig;
pub use error::{ApiError, ApiErrorResponse};
pub use state::AppState;

/// 라우터 생성.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/coinglass/{operation}", get(routes::get_coinglass))
        .route("/coingecko", get(routes::get_coingecko))
        .route("/health", get(routes::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// 조회 전용이므로 GET만 허용합니다.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any)
}
