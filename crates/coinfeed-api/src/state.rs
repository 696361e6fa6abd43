//! 핸들러 공유 상태.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use coinfeed_core::CoinUniverse;
use coinfeed_data::SharedStore;

/// 애플리케이션 상태
pub struct AppState {
    /// 캐시 저장소 (읽기 전용으로 사용)
    pub store: SharedStore,
    /// Coinglass 조회 대상 심볼
    pub universe: Arc<CoinUniverse>,
    /// 서버 시작 시각
    pub started_at: DateTime<Utc>,
    /// API 버전
    pub version: String,
}

impl AppState {
    pub fn new(store: SharedStore, universe: Arc<CoinUniverse>) -> Self {
        Self {
            store,
            universe,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 업타임 (초)
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
