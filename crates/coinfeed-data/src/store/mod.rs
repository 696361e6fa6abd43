//! 공유 key-value 저장소.
//!
//! 수집기는 이 저장소의 유일한 writer이며, 조회 API는 읽기만 합니다.
//! 키는 `{namespace}.{identifier}`, 값은 UTF-8 JSON 텍스트입니다.

pub mod memory;
pub mod redis;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub use self::memory::MemoryStore;
pub use self::redis::{RedisConfig, RedisStore};

/// 저장소 계약 (GET / MGET / MSET / KEYS / PING).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 단일 키 조회. 없으면 `None`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// 여러 키 조회. 결과는 `keys`와 같은 순서입니다.
    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<Vec<u8>>>>;

    /// 여러 키를 한 번의 명령으로 저장합니다.
    ///
    /// `entries`가 비어 있으면 아무 명령도 보내지 않습니다.
    async fn set_many(&self, entries: &[(String, String)]) -> Result<()>;

    /// namespace에 속한 모든 키 (순서 보장 없음).
    async fn keys_in_namespace(&self, namespace: &str) -> Result<Vec<String>>;

    /// 저장소 상태 확인.
    async fn health_check(&self) -> Result<bool>;
}

/// 핸들러/태스크 간에 공유되는 저장소 핸들.
pub type SharedStore = Arc<dyn KeyValueStore>;
