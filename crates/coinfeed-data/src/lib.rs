//! 시장 데이터 저장소 접근과 upstream 데이터 제공자.
//!
//! - [`store`]: 공유 key-value 저장소 (Redis / 메모리)
//! - [`provider`]: Coinglass, CoinGecko HTTP 어댑터
//! - [`query`]: namespace 단위 최신값 조회

pub mod error;
pub mod provider;
pub mod query;
pub mod store;

pub use error::{DataError, Result, UpstreamError, UpstreamStatus};
pub use provider::{
    CoingeckoClient, CoinglassClient, MarketPageSource, MarketRecord, SymbolSource,
};
pub use query::{get_latest, CachedValue, KeySelector, LatestValues};
pub use store::{KeyValueStore, MemoryStore, RedisConfig, RedisStore, SharedStore};
