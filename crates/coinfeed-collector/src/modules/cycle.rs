//! 수집 사이클.
//!
//! 한 사이클은 리소스 타입을 고정된 순서로 처리합니다:
//!
//! 1. CoinGecko 시장 목록 (페이지 1..=6) → `coingecko.{SYMBOL}`
//! 2. Coinglass 지표 (funding_rates_u → funding_rates_c → open_interest) → `{namespace}.{symbol}`
//!
//! 리소스마다 저장소 쓰기는 MSET 한 번입니다. 성공이 하나도 없으면 쓰기를 보내지 않으므로
//! 이전 캐시 값이 그대로 남습니다. upstream 실패는 사이클 밖으로 나가지 않고,
//! 저장소 실패만 이번 사이클을 중단시킵니다.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use coinfeed_core::{
    cache_key, CoinUniverse, CoinglassMetric, ResourceType, Symbol, COINGECKO_PAGES,
};
use coinfeed_data::{CoingeckoClient, CoinglassClient, MarketPageSource, SharedStore, SymbolSource};

use super::batch_fetch::{fetch_in_batches, BatchSettings};
use crate::config::CollectorConfig;
use crate::error::CollectorError;
use crate::stats::{CycleReport, ResourceStats};
use crate::Result;

/// 스케줄러가 실행하는 사이클.
#[async_trait]
pub trait CycleRunner: Send + Sync {
    /// 사이클 한 번 실행.
    async fn run_cycle(&self) -> Result<CycleReport>;
}

/// 저장소와 upstream 소스를 묶은 수집 사이클.
pub struct IngestionCycle {
    store: SharedStore,
    markets: Arc<dyn MarketPageSource>,
    symbols: Arc<dyn SymbolSource>,
    universe: Arc<CoinUniverse>,
    settings: BatchSettings,
}

impl IngestionCycle {
    pub fn new(
        store: SharedStore,
        markets: Arc<dyn MarketPageSource>,
        symbols: Arc<dyn SymbolSource>,
        universe: Arc<CoinUniverse>,
        settings: BatchSettings,
    ) -> Self {
        Self {
            store,
            markets,
            symbols,
            universe,
            settings,
        }
    }

    /// 설정으로부터 실제 HTTP 클라이언트를 구성합니다.
    ///
    /// coin list와 secret을 여기서 로드하므로, 잘못된 설정은 첫 사이클 전에 실패합니다.
    pub fn from_config(config: &CollectorConfig, store: SharedStore) -> Result<Self> {
        let universe = config.load_universe()?;
        let secret = config.load_secret()?;
        let timeout = config.sources.http_timeout();

        let coinglass = CoinglassClient::new(&config.sources.coinglass_base_url, secret, timeout)
            .map_err(|e| CollectorError::DataSource(format!("Coinglass 클라이언트 생성 실패: {}", e)))?;
        let coingecko = CoingeckoClient::new(&config.sources.coingecko_base_url, timeout)
            .map_err(|e| CollectorError::DataSource(format!("CoinGecko 클라이언트 생성 실패: {}", e)))?;

        Ok(Self::new(
            store,
            Arc::new(coingecko),
            Arc::new(coinglass),
            Arc::new(universe),
            BatchSettings::new(config.fetch.concurrent_requests, config.fetch.cooldown()),
        ))
    }

    /// 전체 리소스를 순서대로 수집합니다.
    pub async fn run(&self) -> Result<CycleReport> {
        let started = Instant::now();
        let mut report = CycleReport::new(Utc::now());

        tracing::info!(
            symbols = self.universe.len(),
            concurrency = self.settings.concurrency,
            "사이클 시작"
        );

        report.resources.push(self.collect_markets().await?);
        for metric in CoinglassMetric::ALL {
            // 리소스 사이에도 청크 사이와 같은 간격을 둠
            self.cool_down().await;
            report.resources.push(self.collect_metric(metric).await?);
        }

        report.elapsed = started.elapsed();
        report.log_summary();
        Ok(report)
    }

    /// CoinGecko 시장 목록 수집.
    async fn collect_markets(&self) -> Result<ResourceStats> {
        let started = Instant::now();
        let resource = ResourceType::CoinMarkets;
        let pages: Vec<u32> = COINGECKO_PAGES.collect();

        let outcome =
            fetch_in_batches(&pages, &self.settings, |page| self.markets.fetch_page(page)).await;

        // 페이지 순서대로 덮어쓰므로 중복 심볼은 뒤 페이지 값이 남음
        let mut entries = BTreeMap::new();
        for records in outcome.results.values() {
            for record in records {
                let key = cache_key(resource.namespace(), record.cache_symbol());
                entries.insert(key, serde_json::to_string(record)?);
            }
        }

        let mut stats = ResourceStats::new(resource);
        stats.fetch = outcome.stats;
        stats.written = self.write(resource, entries.into_iter().collect()).await?;
        stats.elapsed = started.elapsed();
        finish(&stats);

        Ok(stats)
    }

    /// Coinglass 지표 하나를 전체 심볼에 대해 수집.
    async fn collect_metric(&self, metric: CoinglassMetric) -> Result<ResourceStats> {
        let started = Instant::now();
        let resource = ResourceType::from(metric);
        let source = &self.symbols;

        let outcome = fetch_in_batches(self.universe.symbols(), &self.settings, |symbol: Symbol| {
            async move { source.fetch_symbol(metric, &symbol).await }
        })
        .await;

        let entries: Vec<(String, String)> = outcome
            .results
            .into_iter()
            .map(|(symbol, body)| (cache_key(metric.namespace(), &symbol), body))
            .collect();

        let mut stats = ResourceStats::new(resource);
        stats.fetch = outcome.stats;
        stats.written = self.write(resource, entries).await?;
        stats.elapsed = started.elapsed();
        finish(&stats);

        Ok(stats)
    }

    async fn cool_down(&self) {
        if !self.settings.cooldown.is_zero() {
            tokio::time::sleep(self.settings.cooldown).await;
        }
    }

    /// 리소스 하나의 결과를 MSET 한 번으로 저장합니다. 비어 있으면 보내지 않습니다.
    async fn write(&self, resource: ResourceType, entries: Vec<(String, String)>) -> Result<usize> {
        if entries.is_empty() {
            tracing::debug!(resource = %resource, "저장할 항목 없음, 쓰기 생략");
            return Ok(0);
        }

        self.store.set_many(&entries).await.map_err(|e| {
            tracing::error!(resource = %resource, error = %e, "저장소 쓰기 실패");
            CollectorError::Store(e)
        })?;

        Ok(entries.len())
    }
}

#[async_trait]
impl CycleRunner for IngestionCycle {
    async fn run_cycle(&self) -> Result<CycleReport> {
        self.run().await
    }
}

fn finish(stats: &ResourceStats) {
    stats.log_summary();
    if stats.fetch.all_failed() {
        tracing::warn!(
            resource = %stats.resource,
            attempted = stats.fetch.attempted,
            "모든 요청이 실패했습니다. 이전 캐시 값을 유지합니다"
        );
    }
}
