//! coinfeed 시장 데이터 수집기.
//!
//! 주기적으로 upstream API를 호출하여 key-value 저장소의 캐시를 갱신합니다:
//! - CoinGecko 시장 목록 (페이지 1..=6)
//! - Coinglass funding rate (U/C), open interest (심볼 단위)

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use stats::{CycleReport, FetchStats, ResourceStats};
