//! namespace 단위 최신값 조회.
//!
//! 저장된 JSON 텍스트를 값마다 독립적으로 파싱합니다. 파싱 실패나 누락된 키는
//! 결과 목록에서 빠지지만, 오류를 던지지 않고 `missing`/`undecodable`에 기록하여
//! "데이터가 없어서 빈 결과"와 "전부 파싱 실패라서 빈 결과"를 구분할 수 있게 합니다.
//!
//! 파싱에 실패한 키는 삭제하거나 복구하지 않습니다. 다음 수집이 덮어쓸 때까지
//! 조회 결과에서 계속 빠집니다.

use coinfeed_core::cache_key;
use serde_json::Value;

use crate::error::Result;
use crate::store::KeyValueStore;

/// 조회 대상 선택.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySelector {
    /// 단일 식별자
    One(String),
    /// 지정한 식별자 목록 (순서 유지)
    Many(Vec<String>),
    /// namespace 전체 (순서 보장 없음)
    All,
}

/// 디코딩된 캐시 값.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedValue {
    pub key: String,
    pub value: Value,
}

/// 조회 결과.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestValues {
    /// 성공적으로 디코딩된 값
    pub values: Vec<CachedValue>,
    /// 저장소에 없는 키
    pub missing: Vec<String>,
    /// JSON으로 파싱할 수 없는 키
    pub undecodable: Vec<String>,
}

impl LatestValues {
    /// 건너뛴 키 수.
    pub fn skipped(&self) -> usize {
        self.missing.len() + self.undecodable.len()
    }

    /// 첫 번째 값 (단일 조회용).
    pub fn first(&self) -> Option<&Value> {
        self.values.first().map(|v| &v.value)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values.into_iter().map(|v| v.value).collect()
    }
}

/// namespace에서 최신값을 조회합니다.
///
/// 저장소 연결 오류만 `Err`로 반환됩니다.
pub async fn get_latest(
    store: &dyn KeyValueStore,
    namespace: &str,
    selector: KeySelector,
) -> Result<LatestValues> {
    let keys: Vec<String> = match selector {
        KeySelector::One(id) => vec![cache_key(namespace, id)],
        KeySelector::Many(ids) => ids.iter().map(|id| cache_key(namespace, id)).collect(),
        KeySelector::All => store.keys_in_namespace(namespace).await?,
    };

    let raw_values = store.get_many(&keys).await?;

    let mut result = LatestValues::default();
    for (key, raw) in keys.into_iter().zip(raw_values) {
        let Some(bytes) = raw else {
            result.missing.push(key);
            continue;
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => result.values.push(CachedValue { key, value }),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "캐시 값 파싱 실패, 건너뜀");
                result.undecodable.push(key);
            }
        }
    }

    if !result.undecodable.is_empty() {
        tracing::warn!(
            namespace,
            undecodable = result.undecodable.len(),
            "파싱할 수 없는 캐시 값이 있습니다"
        );
    }

    Ok(result)
}
