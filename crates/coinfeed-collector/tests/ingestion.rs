//! 수집 사이클 통합 테스트.
//!
//! 가짜 upstream 소스와 메모리 저장소로 사이클 → 저장 → 조회 흐름을 검증합니다.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use coinfeed_collector::modules::{BatchSettings, IngestionCycle, Scheduler};
use coinfeed_collector::CollectorError;
use coinfeed_core::{CoinUniverse, CoinglassMetric, Identifier, Symbol};
use coinfeed_data::{
    get_latest, KeySelector, MarketPageSource, MarketRecord, MemoryStore, SymbolSource,
    UpstreamError,
};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

/// 페이지별 고정 응답. `failing`에 있는 페이지는 503.
struct StaticMarkets {
    failing: HashSet<u32>,
    down: AtomicBool,
}

impl StaticMarkets {
    fn new(failing: &[u32]) -> Self {
        Self {
            failing: failing.iter().copied().collect(),
            down: AtomicBool::new(false),
        }
    }

    fn record(page: u32) -> Value {
        json!({
            "id": format!("coin-{}", page),
            "symbol": format!("p{}", page),
            "current_price": 1000.5 * page as f64,
            "market_cap_rank": page,
            "roi": null
        })
    }
}

#[async_trait]
impl MarketPageSource for StaticMarkets {
    async fn fetch_page(&self, page: u32) -> Result<Vec<MarketRecord>, UpstreamError> {
        if self.down.load(Ordering::SeqCst) || self.failing.contains(&page) {
            return Err(UpstreamError::http(Identifier::Page(page), 503));
        }
        Ok(vec![serde_json::from_value(Self::record(page)).unwrap()])
    }
}

/// 심볼별 고정 응답. `failing`에 있는 심볼은 500.
struct StaticSymbols {
    failing: HashSet<String>,
    down: AtomicBool,
}

impl StaticSymbols {
    fn new(failing: &[&str]) -> Self {
        Self {
            failing: failing.iter().map(|s| s.to_string()).collect(),
            down: AtomicBool::new(false),
        }
    }

    fn body(metric: CoinglassMetric, symbol: &str) -> Value {
        json!({
            "success": true,
            "data": [{ "exchangeName": "Binance", "symbol": symbol, "metric": metric.namespace() }]
        })
    }
}

#[async_trait]
impl SymbolSource for StaticSymbols {
    async fn fetch_symbol(
        &self,
        metric: CoinglassMetric,
        symbol: &Symbol,
    ) -> Result<String, UpstreamError> {
        if self.down.load(Ordering::SeqCst) || self.failing.contains(symbol.as_str()) {
            return Err(UpstreamError::http(Identifier::from(symbol.clone()), 500));
        }
        Ok(Self::body(metric, symbol.as_str()).to_string())
    }
}

struct Harness {
    store: Arc<MemoryStore>,
    markets: Arc<StaticMarkets>,
    symbols: Arc<StaticSymbols>,
    cycle: IngestionCycle,
}

fn harness(failing_pages: &[u32], failing_symbols: &[&str]) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let markets = Arc::new(StaticMarkets::new(failing_pages));
    let symbols = Arc::new(StaticSymbols::new(failing_symbols));
    let universe = Arc::new(CoinUniverse::parse("BTC\nETH\nXRP\n").unwrap());

    let cycle = IngestionCycle::new(
        store.clone(),
        markets.clone(),
        symbols.clone(),
        universe,
        BatchSettings::new(2, Duration::ZERO),
    );

    Harness {
        store,
        markets,
        symbols,
        cycle,
    }
}

#[tokio::test]
async fn failed_page_is_skipped_and_others_are_written() {
    let h = harness(&[3], &[]);
    let report = h.cycle.run().await.unwrap();

    let keys: HashSet<String> = h
        .store
        .snapshot()
        .await
        .into_keys()
        .filter(|k| k.starts_with("coingecko."))
        .collect();
    let expected: HashSet<String> = [1, 2, 4, 5, 6]
        .iter()
        .map(|p| format!("coingecko.P{}", p))
        .collect();

    assert_eq!(keys, expected);
    let markets = report.resource(coinfeed_core::ResourceType::CoinMarkets).unwrap();
    assert_eq!(markets.fetch.failed, 1);
    assert_eq!(markets.fetch.chunks, 3);
}

#[tokio::test]
async fn failed_symbol_does_not_block_the_rest() {
    let h = harness(&[], &["ETH"]);
    h.cycle.run().await.unwrap();

    let snapshot = h.store.snapshot().await;
    for metric in CoinglassMetric::ALL {
        let ns = metric.namespace();
        assert!(snapshot.contains_key(&format!("{}.BTC", ns)));
        assert!(snapshot.contains_key(&format!("{}.XRP", ns)));
        assert!(!snapshot.contains_key(&format!("{}.ETH", ns)));
    }
}

#[tokio::test]
async fn total_failure_keeps_previous_values() {
    let h = harness(&[], &[]);
    h.cycle.run().await.unwrap();
    let before = h.store.snapshot().await;
    let writes_before = h.store.bulk_writes();

    h.markets.down.store(true, Ordering::SeqCst);
    h.symbols.down.store(true, Ordering::SeqCst);
    let report = h.cycle.run().await.unwrap();

    assert_eq!(h.store.snapshot().await, before);
    assert_eq!(h.store.bulk_writes(), writes_before);
    assert_eq!(report.total_written(), 0);
    assert_eq!(report.failed_resources().len(), 4);
}

#[tokio::test]
async fn repeated_cycles_are_idempotent() {
    let h = harness(&[], &["XRP"]);
    h.cycle.run().await.unwrap();
    let first = h.store.snapshot().await;

    h.cycle.run().await.unwrap();
    assert_eq!(h.store.snapshot().await, first);
}

#[tokio::test]
async fn stored_record_round_trips_through_query() {
    let h = harness(&[], &[]);
    h.cycle.run().await.unwrap();

    let latest = get_latest(h.store.as_ref(), "coingecko", KeySelector::One("P4".to_string()))
        .await
        .unwrap();
    assert_eq!(latest.first(), Some(&StaticMarkets::record(4)));

    let latest = get_latest(
        h.store.as_ref(),
        "funding_rates_c",
        KeySelector::One("BTC".to_string()),
    )
    .await
    .unwrap();
    assert_eq!(
        latest.first(),
        Some(&StaticSymbols::body(CoinglassMetric::FundingRatesC, "BTC"))
    );
}

#[tokio::test]
async fn namespace_read_returns_every_cached_symbol() {
    let h = harness(&[], &[]);
    h.cycle.run().await.unwrap();

    let latest = get_latest(h.store.as_ref(), "open_interest", KeySelector::All)
        .await
        .unwrap();

    let symbols: HashSet<String> = latest
        .into_values()
        .iter()
        .map(|v| v["data"][0]["symbol"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        symbols,
        HashSet::from(["BTC".to_string(), "ETH".to_string(), "XRP".to_string()])
    );
}

#[tokio::test(start_paused = true)]
async fn store_outage_fails_cycle_but_scheduler_keeps_ticking() {
    let h = harness(&[], &[]);
    h.store.set_available(false);

    let err = h.cycle.run().await.unwrap_err();
    assert!(matches!(err, CollectorError::Store(_)));

    let store = h.store.clone();
    let mut scheduler = Scheduler::new(h.cycle, Duration::from_millis(20));
    let token = CancellationToken::new();

    let restore = {
        let token = token.clone();
        async move {
            // 첫 사이클은 실패, 저장소 복구 후 다음 사이클은 성공
            tokio::time::sleep(Duration::from_millis(5)).await;
            store.set_available(true);
            tokio::time::sleep(Duration::from_millis(40)).await;
            token.cancel();
        }
    };
    tokio::join!(scheduler.run(token), restore);

    assert!(scheduler.failed_cycles() >= 1);
    assert!(scheduler.completed_cycles() >= 1);

    assert!(h.store.snapshot().await.contains_key("open_interest.BTC"));
}

/// 첫 호출에서 저장소를 끊어 버리는 심볼 소스.
struct SeversStore {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl SymbolSource for SeversStore {
    async fn fetch_symbol(
        &self,
        metric: CoinglassMetric,
        symbol: &Symbol,
    ) -> Result<String, UpstreamError> {
        self.store.set_available(false);
        Ok(StaticSymbols::body(metric, symbol.as_str()).to_string())
    }
}

#[tokio::test]
async fn store_outage_mid_cycle_keeps_earlier_resources() {
    let store = Arc::new(MemoryStore::new());
    let cycle = IngestionCycle::new(
        store.clone(),
        Arc::new(StaticMarkets::new(&[])),
        Arc::new(SeversStore {
            store: store.clone(),
        }),
        Arc::new(CoinUniverse::parse("BTC\nETH\nXRP\n").unwrap()),
        BatchSettings::new(2, Duration::ZERO),
    );

    let err = cycle.run().await.unwrap_err();
    assert!(matches!(err, CollectorError::Store(_)));

    // 시장 목록 MSET만 반영되고 첫 지표는 기록되지 않음
    assert_eq!(store.bulk_writes(), 1);
    let snapshot = store.snapshot().await;
    for page in 1..=6 {
        assert!(snapshot.contains_key(&format!("coingecko.P{}", page)));
    }
    assert!(!snapshot.keys().any(|k| k.starts_with("funding_rates_u.")));
    assert!(!snapshot.keys().any(|k| !k.starts_with("coingecko.")));
}
