//! CoinGecko 시장 목록 API 클라이언트.
//!
//! 인증 없이 시가총액 순으로 페이지당 250개 레코드를 조회합니다.

use std::time::Duration;

use async_trait::async_trait;
use coinfeed_core::{Identifier, COINGECKO_PER_PAGE};

use super::{read_body, send_checked, MarketPageSource, MarketRecord};
use crate::error::UpstreamError;

const SOURCE: &str = "coingecko";

/// CoinGecko 공개 API 클라이언트.
#[derive(Debug, Clone)]
pub struct CoingeckoClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoingeckoClient {
    /// 기본 Base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.coingecko.com";

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// 페이지 요청 URL.
    pub fn url(&self, page: u32) -> String {
        format!(
            "{}/api/v3/coins/markets?vs_currency=usd&order=market_cap_desc&per_page={}&page={}&sparkline=false",
            self.base_url, COINGECKO_PER_PAGE, page
        )
    }
}

#[async_trait]
impl MarketPageSource for CoingeckoClient {
    async fn fetch_page(&self, page: u32) -> Result<Vec<MarketRecord>, UpstreamError> {
        let url = self.url(page);
        let identifier = Identifier::Page(page);

        let response = send_checked(self.client.get(&url), SOURCE, &url, &identifier).await?;
        let body = read_body(response, SOURCE, &url, &identifier).await?;

        let records: Vec<MarketRecord> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(source = SOURCE, url = %url, error = %e, "CoinGecko 응답 파싱 실패");
            UpstreamError::decode(identifier.clone(), e)
        })?;

        tracing::info!(source = SOURCE, url = %url, records = records.len(), "CoinGecko 요청 완료");
        Ok(records)
    }
}
