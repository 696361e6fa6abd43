//! 수집 통계 구조체.
//!
//! 사이클마다 리소스별 성공/실패 수를 기록합니다. 건너뛰기-계속 정책은 그대로 두고,
//! 장기간 전체 실패를 로그에서 바로 확인할 수 있게 하는 헬스 신호입니다.

use chrono::{DateTime, Utc};
use coinfeed_core::ResourceType;
use serde::Serialize;
use std::time::Duration;

/// 배치 수집 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FetchStats {
    /// 총 요청 수
    pub attempted: usize,
    /// 성공 수
    pub succeeded: usize,
    /// 실패 수
    pub failed: usize,
    /// 실행된 청크 수
    pub chunks: usize,
}

impl FetchStats {
    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            (self.succeeded as f64 / self.attempted as f64) * 100.0
        }
    }

    /// 요청이 있었지만 모두 실패했는지 여부
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.succeeded == 0
    }
}

/// 리소스 하나의 수집 결과
#[derive(Debug, Clone, Serialize)]
pub struct ResourceStats {
    pub resource: ResourceType,
    pub fetch: FetchStats,
    /// 저장소에 기록된 키 수
    pub written: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl ResourceStats {
    pub fn new(resource: ResourceType) -> Self {
        Self {
            resource,
            fetch: FetchStats::default(),
            written: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self) {
        tracing::info!(
            resource = %self.resource,
            attempted = self.fetch.attempted,
            succeeded = self.fetch.succeeded,
            failed = self.fetch.failed,
            chunks = self.fetch.chunks,
            written = self.written,
            success_rate = format!("{:.1}%", self.fetch.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "리소스 수집 완료"
        );
    }
}

/// 사이클 전체 결과
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub resources: Vec<ResourceStats>,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CycleReport {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            resources: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// 리소스 결과 조회
    pub fn resource(&self, resource: ResourceType) -> Option<&ResourceStats> {
        self.resources.iter().find(|r| r.resource == resource)
    }

    pub fn total_succeeded(&self) -> usize {
        self.resources.iter().map(|r| r.fetch.succeeded).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.resources.iter().map(|r| r.fetch.failed).sum()
    }

    pub fn total_written(&self) -> usize {
        self.resources.iter().map(|r| r.written).sum()
    }

    /// 전체 실패한 리소스 목록
    pub fn failed_resources(&self) -> Vec<ResourceType> {
        self.resources
            .iter()
            .filter(|r| r.fetch.all_failed())
            .map(|r| r.resource)
            .collect()
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self) {
        let failed_resources: Vec<String> =
            self.failed_resources().iter().map(|r| r.to_string()).collect();

        tracing::info!(
            started_at = %self.started_at.to_rfc3339(),
            succeeded = self.total_succeeded(),
            failed = self.total_failed(),
            written = self.total_written(),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "사이클 완료"
        );

        if !failed_resources.is_empty() {
            tracing::warn!(
                resources = ?failed_resources,
                "일부 리소스의 요청이 모두 실패했습니다. 이전 캐시 값이 유지됩니다"
            );
        }
    }
}
