//! 리소스 타입과 캐시 키 규칙.
//!
//! 모든 캐시 항목은 `{namespace}.{identifier}` 형식의 키로 저장됩니다.
//! namespace는 리소스 타입 이름이며, identifier는 코인 심볼입니다.
//!
//! ```text
//! funding_rates_u.BTC   ← Coinglass (secret 헤더 필요)
//! open_interest.ETH     ← Coinglass
//! coingecko.XRP         ← CoinGecko (공개, 페이지 단위)
//! ```

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::universe::Symbol;

/// CoinGecko markets 엔드포인트의 유효 페이지 범위.
pub const COINGECKO_PAGES: RangeInclusive<u32> = 1..=6;

/// CoinGecko 페이지당 레코드 수.
pub const COINGECKO_PER_PAGE: u32 = 250;

/// Coinglass 지표 종류.
///
/// 선언 순서가 곧 수집 순서입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinglassMetric {
    /// USDT 마진 funding rate
    FundingRatesU,
    /// 코인 마진 funding rate
    FundingRatesC,
    /// 미결제약정
    OpenInterest,
}

impl CoinglassMetric {
    /// 수집 순서대로 모든 지표 반환.
    pub const ALL: [CoinglassMetric; 3] = [
        CoinglassMetric::FundingRatesU,
        CoinglassMetric::FundingRatesC,
        CoinglassMetric::OpenInterest,
    ];

    /// 캐시 키 prefix.
    pub fn namespace(&self) -> &'static str {
        match self {
            CoinglassMetric::FundingRatesU => "funding_rates_u",
            CoinglassMetric::FundingRatesC => "funding_rates_c",
            CoinglassMetric::OpenInterest => "open_interest",
        }
    }
}

impl fmt::Display for CoinglassMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())
    }
}

impl FromStr for CoinglassMetric {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoinglassMetric::ALL
            .into_iter()
            .find(|m| m.namespace() == s)
            .ok_or_else(|| CoreError::UnknownResource(s.to_string()))
    }
}

/// 수집 대상 리소스 타입.
///
/// 어떤 upstream 어댑터를 쓸지와 캐시 namespace를 결정합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ResourceType {
    /// Coinglass 선물 지표 (secret 헤더, raw text 응답)
    Coinglass(CoinglassMetric),
    /// CoinGecko 코인 시장 목록 (공개, 페이지 단위 JSON 배열)
    CoinMarkets,
}

impl ResourceType {
    /// 한 사이클에서 수집하는 순서대로 모든 리소스 타입 반환.
    pub fn all() -> [ResourceType; 4] {
        [
            ResourceType::CoinMarkets,
            ResourceType::Coinglass(CoinglassMetric::FundingRatesU),
            ResourceType::Coinglass(CoinglassMetric::FundingRatesC),
            ResourceType::Coinglass(CoinglassMetric::OpenInterest),
        ]
    }

    /// 캐시 키 prefix.
    pub fn namespace(&self) -> &'static str {
        match self {
            ResourceType::Coinglass(metric) => metric.namespace(),
            ResourceType::CoinMarkets => "coingecko",
        }
    }
}

impl From<CoinglassMetric> for ResourceType {
    fn from(metric: CoinglassMetric) -> Self {
        ResourceType::Coinglass(metric)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())
    }
}

impl FromStr for ResourceType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::all()
            .into_iter()
            .find(|r| r.namespace() == s)
            .ok_or_else(|| CoreError::UnknownResource(s.to_string()))
    }
}

impl From<ResourceType> for String {
    fn from(resource: ResourceType) -> Self {
        resource.namespace().to_string()
    }
}

impl TryFrom<String> for ResourceType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 단일 요청의 식별자 (코인 심볼 또는 페이지 번호).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    Symbol(Symbol),
    Page(u32),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Symbol(symbol) => write!(f, "{}", symbol),
            Identifier::Page(page) => write!(f, "page {}", page),
        }
    }
}

impl From<Symbol> for Identifier {
    fn from(symbol: Symbol) -> Self {
        Identifier::Symbol(symbol)
    }
}

impl From<u32> for Identifier {
    fn from(page: u32) -> Self {
        Identifier::Page(page)
    }
}

/// 캐시 키 생성: `{namespace}.{identifier}`.
pub fn cache_key(namespace: &str, identifier: impl fmt::Display) -> String {
    format!("{}.{}", namespace, identifier)
}

/// namespace 전체를 조회하는 KEYS 패턴.
pub fn namespace_pattern(namespace: &str) -> String {
    format!("{}.*", namespace)
}
