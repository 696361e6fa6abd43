//! coinfeed 핵심 도메인 타입.
//!
//! 이 crate는 수집기(collector)와 조회 API가 공유하는 타입을 제공합니다:
//! - 리소스 타입 (funding rate, open interest, coin market)
//! - 캐시 키 규칙 (`{namespace}.{identifier}`)
//! - 코인 심볼 유니버스 (coin list 파일)
//! - 로깅 초기화

pub mod error;
pub mod logging;
pub mod resource;
pub mod universe;

pub use error::{CoreError, Result};
pub use resource::{
    cache_key, namespace_pattern, CoinglassMetric, Identifier, ResourceType, COINGECKO_PAGES,
    COINGECKO_PER_PAGE,
};
pub use universe::{CoinUniverse, Symbol};
