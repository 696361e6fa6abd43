//! coinfeed 조회 API 서버.

use std::sync::Arc;

use anyhow::Context;
use coinfeed_api::{create_router, ApiConfig, AppState};
use coinfeed_core::logging::{init_logging, LogConfig};
use coinfeed_core::CoinUniverse;
use coinfeed_data::RedisStore;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(LogConfig::default().with_env_format())
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    let config = ApiConfig::from_env();

    let universe = CoinUniverse::load(&config.coin_list_file)
        .with_context(|| format!("coin list 로드 실패: {}", config.coin_list_file.display()))?;

    let store = RedisStore::connect(&config.redis)
        .await
        .with_context(|| format!("저장소 연결 실패: {}", config.redis.url))?;
    info!(url = %config.redis.url, "저장소 연결 성공");

    let state = Arc::new(AppState::new(Arc::new(store), Arc::new(universe)));
    let app = create_router(state);

    let addr = config.socket_addr().context("API_HOST/API_PORT가 올바르지 않습니다")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("{} 바인드 실패", addr))?;
    info!(%addr, "Coinfeed API 서버 시작");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Ctrl+C 또는 SIGTERM 대기.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => warn!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
