//! 주기 실행 스케줄러.
//!
//! 시작 즉시 사이클을 한 번 실행하고, 이후에는 이전 사이클이 끝난 시점부터
//! `interval`만큼 기다린 뒤 다음 사이클을 실행합니다. 사이클은 인라인으로 실행되므로
//! 겹치지 않으며, 느린 사이클은 다음 실행을 그만큼 늦춥니다.
//!
//! 종료 토큰은 대기 중에만 확인합니다. 진행 중인 사이클은 끝까지 실행됩니다.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::cycle::CycleRunner;
use crate::stats::CycleReport;

/// 사이클 스케줄러
pub struct Scheduler<R> {
    runner: R,
    interval: Duration,
    completed: u64,
    failed: u64,
    last_report: Option<CycleReport>,
}

impl<R: CycleRunner> Scheduler<R> {
    pub fn new(runner: R, interval: Duration) -> Self {
        Self {
            runner,
            interval,
            completed: 0,
            failed: 0,
            last_report: None,
        }
    }

    /// 성공한 사이클 수
    pub fn completed_cycles(&self) -> u64 {
        self.completed
    }

    /// 실패한 사이클 수 (저장소 에러)
    pub fn failed_cycles(&self) -> u64 {
        self.failed
    }

    /// 마지막으로 성공한 사이클의 리포트
    pub fn last_report(&self) -> Option<&CycleReport> {
        self.last_report.as_ref()
    }

    /// 사이클 한 번 실행. 에러는 로그만 남기고 삼킵니다.
    pub async fn tick(&mut self) {
        match self.runner.run_cycle().await {
            Ok(report) => {
                self.completed += 1;
                self.last_report = Some(report);
            }
            Err(e) => {
                self.failed += 1;
                tracing::error!(error = %e, failed_cycles = self.failed, "사이클 실패, 다음 주기에 재시도");
            }
        }
    }

    /// 종료 토큰이 취소될 때까지 반복 실행합니다.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "=== 스케줄러 시작 ==="
        );

        loop {
            self.tick().await;

            let deadline = Instant::now() + self.interval;
            tracing::info!(
                next_in_secs = self.interval.as_secs(),
                completed = self.completed,
                failed = self.failed,
                "다음 사이클 대기"
            );

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    tracing::info!("종료 신호 수신, 스케줄러 종료 중...");
                    break;
                }
                _ = tokio::time::sleep_until(deadline) => {}
            }
        }

        tracing::info!(
            completed = self.completed,
            failed = self.failed,
            "=== 스케줄러 종료 ==="
        );
    }
}
