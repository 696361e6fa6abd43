//! upstream 시장 데이터 제공자.
//!
//! 두 가지 API 계열을 지원합니다:
//! - **Coinglass**: `coinglassSecret` 헤더가 필요한 선물 지표 API. 응답 본문을 그대로 저장합니다.
//! - **CoinGecko**: 인증 없는 페이지 단위 시장 목록 API. JSON 배열을 레코드로 파싱합니다.
//!
//! 200 응답만 성공입니다. 모든 시도는 로그 한 줄을 남깁니다.

pub mod coingecko;
pub mod coinglass;

use async_trait::async_trait;
use coinfeed_core::{CoinglassMetric, Identifier, Symbol};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::UpstreamError;

pub use coingecko::CoingeckoClient;
pub use coinglass::CoinglassClient;

/// 심볼 단위 지표 소스 (Coinglass 계열).
#[async_trait]
pub trait SymbolSource: Send + Sync {
    /// 한 심볼의 지표를 조회하여 응답 본문을 그대로 반환합니다.
    async fn fetch_symbol(
        &self,
        metric: CoinglassMetric,
        symbol: &Symbol,
    ) -> Result<String, UpstreamError>;
}

/// 페이지 단위 시장 목록 소스 (CoinGecko 계열).
#[async_trait]
pub trait MarketPageSource: Send + Sync {
    /// 한 페이지의 시장 레코드를 순서대로 반환합니다.
    async fn fetch_page(&self, page: u32) -> Result<Vec<MarketRecord>, UpstreamError>;
}

/// CoinGecko 시장 레코드.
///
/// `symbol` 외의 필드는 그대로 보존하여 재직렬화해도 값이 바뀌지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    /// 코인 심볼 (CoinGecko는 소문자로 제공)
    pub symbol: String,
    /// 나머지 필드
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl MarketRecord {
    /// 캐시 키에 쓰이는 대문자 심볼.
    pub fn cache_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }
}

/// GET 요청을 보내고 200 여부를 판정합니다.
///
/// 실패 시 url과 상태를 error 로그로 남깁니다.
pub(crate) async fn send_checked(
    request: reqwest::RequestBuilder,
    source: &'static str,
    url: &str,
    identifier: &Identifier,
) -> Result<reqwest::Response, UpstreamError> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(source, url = %url, error = %e, "upstream 요청 실패 (전송 오류)");
            return Err(UpstreamError::transport(identifier.clone(), e));
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        tracing::error!(
            source,
            url = %url,
            status = status.as_u16(),
            "upstream 요청 실패"
        );
        return Err(UpstreamError::http(identifier.clone(), status.as_u16()));
    }

    Ok(response)
}

/// 200 응답의 본문을 텍스트로 읽습니다.
pub(crate) async fn read_body(
    response: reqwest::Response,
    source: &'static str,
    url: &str,
    identifier: &Identifier,
) -> Result<String, UpstreamError> {
    response.text().await.map_err(|e| {
        tracing::error!(source, url = %url, error = %e, "upstream 응답 본문 읽기 실패");
        UpstreamError::decode(identifier.clone(), e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_record_keeps_unknown_fields() {
        let json = r#"{"id":"bitcoin","symbol":"btc","current_price":67000.5,"roi":null}"#;
        let record: MarketRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.symbol, "btc");
        assert_eq!(record.cache_symbol(), "BTC");
        assert_eq!(record.fields["id"], "bitcoin");

        let expected: Value = serde_json::from_str(json).unwrap();
        let reserialized = serde_json::to_value(&record).unwrap();
        assert_eq!(expected, reserialized);
    }

    #[test]
    fn test_market_record_requires_symbol() {
        let result: Result<MarketRecord, _> = serde_json::from_str(r#"{"id":"bitcoin"}"#);
        assert!(result.is_err());
    }
}
