//! Coinglass 선물 지표 API 클라이언트.
//!
//! 모든 요청에 `coinglassSecret` 헤더로 정적 secret을 전달합니다.
//! 응답 본문은 파싱하지 않고 텍스트 그대로 반환합니다.

use std::time::Duration;

use async_trait::async_trait;
use coinfeed_core::{CoinglassMetric, Identifier, Symbol};
use secrecy::{ExposeSecret, SecretString};

use super::{read_body, send_checked, SymbolSource};
use crate::error::UpstreamError;

const SOURCE: &str = "coinglass";

/// Coinglass Open API 클라이언트.
pub struct CoinglassClient {
    client: reqwest::Client,
    base_url: String,
    secret: SecretString,
}

impl CoinglassClient {
    /// secret 헤더 이름.
    pub const SECRET_HEADER: &'static str = "coinglassSecret";

    /// 기본 Base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://open-api.coinglass.com";

    /// 새 클라이언트 생성.
    ///
    /// # Arguments
    /// * `base_url` - API Base URL (끝의 `/`는 제거됨)
    /// * `secret` - `coinglassSecret` 헤더 값
    /// * `timeout` - 요청 타임아웃
    pub fn new(
        base_url: impl Into<String>,
        secret: SecretString,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret,
        })
    }

    /// 지표/심볼에 해당하는 요청 URL.
    pub fn url(&self, metric: CoinglassMetric, symbol: &Symbol) -> String {
        let path = match metric {
            CoinglassMetric::FundingRatesU => {
                format!("/api/pro/v1/futures/funding_rates_chart?symbol={}&type=U", symbol)
            }
            CoinglassMetric::FundingRatesC => {
                format!("/api/pro/v1/futures/funding_rates_chart?symbol={}&type=C", symbol)
            }
            CoinglassMetric::OpenInterest => {
                format!("/api/pro/v1/futures/openInterest?interval=0&symbol={}", symbol)
            }
        };
        format!("{}{}", self.base_url, path)
    }
}

impl std::fmt::Debug for CoinglassClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinglassClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SymbolSource for CoinglassClient {
    async fn fetch_symbol(
        &self,
        metric: CoinglassMetric,
        symbol: &Symbol,
    ) -> Result<String, UpstreamError> {
        let url = self.url(metric, symbol);
        let identifier = Identifier::Symbol(symbol.clone());

        let request = self
            .client
            .get(&url)
            .header(Self::SECRET_HEADER, self.secret.expose_secret());

        let response = send_checked(request, SOURCE, &url, &identifier).await?;
        let body = read_body(response, SOURCE, &url, &identifier).await?;

        tracing::info!(source = SOURCE, url = %url, "Coinglass 요청 완료");
        Ok(body)
    }
}
