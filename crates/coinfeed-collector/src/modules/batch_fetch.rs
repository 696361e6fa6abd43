//! Rate-limited 배치 수집 모듈.
//!
//! 식별자 목록을 최대 K개씩 청크로 나누어 처리합니다:
//!
//! ```text
//! [BTC ETH] ──fan-out/fan-in──> cooldown ──> [XRP] ──fan-out/fan-in──> 끝 (cooldown 없음)
//! ```
//!
//! - 청크 안의 요청은 동시에 실행되고, 모두 끝난 뒤에야 다음 청크가 시작됩니다.
//! - 실패한 요청은 형제 요청이나 다음 청크를 취소하지 않고, 결과에서만 빠집니다.
//! - 실패 로그는 어댑터가 남기므로 여기서는 debug 레벨로만 기록합니다.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use coinfeed_data::UpstreamError;
use futures::future::join_all;

use crate::stats::FetchStats;

/// 청크 크기와 청크 사이 대기 시간
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSettings {
    /// 청크당 최대 동시 요청 수 (0이면 1로 취급)
    pub concurrency: usize,
    /// 청크 사이 대기 시간
    pub cooldown: Duration,
}

impl BatchSettings {
    pub fn new(concurrency: usize, cooldown: Duration) -> Self {
        Self {
            concurrency,
            cooldown,
        }
    }

    fn chunk_size(&self) -> usize {
        self.concurrency.max(1)
    }
}

/// 배치 수집 결과
#[derive(Debug)]
pub struct BatchOutcome<I, T> {
    /// 성공한 식별자별 결과
    pub results: BTreeMap<I, T>,
    pub stats: FetchStats,
}

/// 입력 순서를 유지한 채 크기 K 이하의 청크로 나눕니다.
pub fn plan_chunks<'a, I>(ids: &'a [I], settings: &BatchSettings) -> Vec<&'a [I]> {
    ids.chunks(settings.chunk_size()).collect()
}

/// 식별자 목록을 청크 단위로 수집합니다.
///
/// # 인자
/// * `ids` - 수집할 식별자 (순서 유지)
/// * `settings` - 청크 크기와 대기 시간
/// * `fetch` - 식별자 하나를 조회하는 함수
pub async fn fetch_in_batches<I, T, F, Fut>(
    ids: &[I],
    settings: &BatchSettings,
    fetch: F,
) -> BatchOutcome<I, T>
where
    I: Ord + Clone,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, UpstreamError>>,
{
    let chunks = plan_chunks(ids, settings);
    let chunk_count = chunks.len();

    let mut results = BTreeMap::new();
    let mut stats = FetchStats::default();

    for (idx, chunk) in chunks.into_iter().enumerate() {
        tracing::debug!(
            chunk = idx + 1,
            total_chunks = chunk_count,
            size = chunk.len(),
            "청크 요청 시작"
        );

        // fan-out
        let pending = chunk.iter().cloned().map(|id| {
            let request = fetch(id.clone());
            async move { (id, request.await) }
        });

        // fan-in: 청크 전체가 끝날 때까지 대기
        for (id, result) in join_all(pending).await {
            stats.attempted += 1;
            match result {
                Ok(value) => {
                    stats.succeeded += 1;
                    results.insert(id, value);
                }
                Err(e) => {
                    stats.failed += 1;
                    tracing::debug!(error = %e, "요청 실패, 이번 사이클에서 제외");
                }
            }
        }
        stats.chunks += 1;

        // 마지막 청크 뒤에는 대기하지 않음
        if idx + 1 < chunk_count && !settings.cooldown.is_zero() {
            tokio::time::sleep(settings.cooldown).await;
        }
    }

    BatchOutcome { results, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinfeed_core::{Identifier, Symbol};
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Start(&'static str),
        End(&'static str),
    }

    fn fail(id: &str, code: u16) -> UpstreamError {
        UpstreamError::http(Identifier::Symbol(Symbol::parse(id).unwrap()), code)
    }

    #[tokio::test]
    async fn test_failed_fetch_is_omitted() {
        let ids = vec!["BTC", "ETH", "XRP"];
        let settings = BatchSettings::new(2, Duration::ZERO);

        let outcome = fetch_in_batches(&ids, &settings, |id| async move {
            if id == "ETH" {
                Err(fail(id, 500))
            } else {
                Ok(format!("payload-{}", id))
            }
        })
        .await;

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results["BTC"], "payload-BTC");
        assert_eq!(outcome.results["XRP"], "payload-XRP");
        assert!(!outcome.results.contains_key("ETH"));
        assert_eq!(
            outcome.stats,
            FetchStats {
                attempted: 3,
                succeeded: 2,
                failed: 1,
                chunks: 2
            }
        );
    }

    #[test]
    fn test_plan_chunks_example() {
        let ids = vec!["BTC", "ETH", "XRP"];
        let chunks = plan_chunks(&ids, &BatchSettings::new(2, Duration::ZERO));
        assert_eq!(chunks, vec![&["BTC", "ETH"][..], &["XRP"][..]]);
    }

    #[test]
    fn test_zero_concurrency_treated_as_one() {
        let ids = vec![1, 2, 3];
        assert_eq!(plan_chunks(&ids, &BatchSettings::new(0, Duration::ZERO)).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_chunk_waits_for_full_fan_in() {
        let ids = vec!["BTC", "ETH", "XRP"];
        let settings = BatchSettings::new(2, Duration::ZERO);
        let events = Arc::new(Mutex::new(Vec::new()));

        fetch_in_batches(&ids, &settings, |id| {
            let events = Arc::clone(&events);
            async move {
                events.lock().unwrap().push(Event::Start(id));
                // BTC가 가장 늦게 끝남
                let delay = if id == "BTC" { 300 } else { 10 };
                tokio::time::sleep(Duration::from_millis(delay)).await;
                events.lock().unwrap().push(Event::End(id));
                Ok::<_, UpstreamError>(())
            }
        })
        .await;

        let events = events.lock().unwrap().clone();
        let xrp_start = events
            .iter()
            .position(|e| *e == Event::Start("XRP"))
            .unwrap();
        let btc_end = events.iter().position(|e| *e == Event::End("BTC")).unwrap();
        let eth_end = events.iter().position(|e| *e == Event::End("ETH")).unwrap();

        assert!(xrp_start > btc_end);
        assert!(xrp_start > eth_end);
        // 같은 청크는 동시에 시작
        assert_eq!(&events[..2], &[Event::Start("BTC"), Event::Start("ETH")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_between_chunks_only() {
        let ids: Vec<u32> = (1..=5).collect();
        let settings = BatchSettings::new(2, Duration::from_secs(3));
        let start = Instant::now();

        let outcome = fetch_in_batches(&ids, &settings, |page| async move {
            Ok::<_, UpstreamError>(page)
        })
        .await;

        // 3개 청크 → 대기 2회
        assert_eq!(outcome.stats.chunks, 3);
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_chunk_has_no_cooldown() {
        let ids: Vec<u32> = (1..=6).collect();
        let settings = BatchSettings::new(10, Duration::from_secs(3));
        let start = Instant::now();

        let outcome = fetch_in_batches(&ids, &settings, |page| async move {
            Ok::<_, UpstreamError>(page * 10)
        })
        .await;

        assert_eq!(outcome.results.len(), 6);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let ids: Vec<u32> = Vec::new();
        let outcome = fetch_in_batches(&ids, &BatchSettings::new(3, Duration::ZERO), |p| async move {
            Ok::<_, UpstreamError>(p)
        })
        .await;

        assert!(outcome.results.is_empty());
        assert_eq!(outcome.stats, FetchStats::default());
    }

    #[tokio::test]
    async fn test_failure_in_earlier_chunk_does_not_block_later_chunks() {
        let ids: Vec<u32> = (1..=6).collect();
        let settings = BatchSettings::new(2, Duration::ZERO);

        let outcome = fetch_in_batches(&ids, &settings, |page| async move {
            if page <= 2 {
                Err(UpstreamError::http(Identifier::Page(page), 503))
            } else {
                Ok(page)
            }
        })
        .await;

        assert_eq!(outcome.results.keys().copied().collect::<Vec<_>>(), vec![3, 4, 5, 6]);
    }

    proptest! {
        #[test]
        fn prop_chunk_partition(n in 0usize..200, k in 1usize..25) {
            let ids: Vec<usize> = (0..n).collect();
            let chunks = plan_chunks(&ids, &BatchSettings::new(k, Duration::ZERO));

            prop_assert_eq!(chunks.len(), n.div_ceil(k));
            prop_assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= k));

            // 마지막 청크만 작을 수 있음
            if let Some((_, init)) = chunks.split_last() {
                prop_assert!(init.iter().all(|c| c.len() == k));
            }

            // 순서 유지
            let flattened: Vec<usize> = chunks.concat();
            prop_assert_eq!(flattened, ids);
        }
    }
}
