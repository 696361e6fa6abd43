//! API 라우트.

pub mod coingecko;
pub mod coinglass;
pub mod health;

use coinfeed_data::LatestValues;
use serde_json::Value;

pub use coingecko::{get_coingecko, IdQuery};
pub use coinglass::{get_coinglass, CoinQuery};
pub use health::{health_check, HealthResponse};

/// 단일 조회는 값 또는 `null`, 그 외에는 배열로 응답합니다.
fn render(latest: LatestValues, single: bool) -> Value {
    if single {
        latest.first().cloned().unwrap_or(Value::Null)
    } else {
        Value::Array(latest.into_values())
    }
}
