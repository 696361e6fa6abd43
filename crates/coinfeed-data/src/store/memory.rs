//! 메모리 저장소 구현.
//!
//! 단일 프로세스 dry-run과 테스트에서 Redis 대신 사용합니다.
//! `set_available(false)`로 저장소 장애를 흉내낼 수 있습니다.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::KeyValueStore;
use crate::error::{DataError, Result};

/// 메모리 기반 key-value 저장소.
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    bulk_writes: AtomicUsize,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            bulk_writes: AtomicUsize::new(0),
            available: AtomicBool::new(true),
        }
    }

    /// 저장소 연결 가능 여부를 설정합니다.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// 지금까지 실행된 MSET 횟수.
    pub fn bulk_writes(&self) -> usize {
        self.bulk_writes.load(Ordering::SeqCst)
    }

    /// 전체 내용 복사본.
    pub async fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.entries.read().await.clone()
    }

    /// 원시 바이트를 직접 기록합니다 (MSET 횟수에 포함되지 않음).
    pub async fn insert_raw(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.entries.write().await.insert(key.into(), value.into());
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DataError::CacheError("memory store unavailable".to_string()))
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_available()?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<Vec<u8>>>> {
        self.ensure_available()?;
        let entries = self.entries.read().await;
        Ok(keys.iter().map(|key| entries.get(key).cloned()).collect())
    }

    async fn set_many(&self, entries: &[(String, String)]) -> Result<()> {
        self.ensure_available()?;
        if entries.is_empty() {
            return Ok(());
        }

        let mut map = self.entries.write().await;
        for (key, value) in entries {
            map.insert(key.clone(), value.clone().into_bytes());
        }
        self.bulk_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn keys_in_namespace(&self, namespace: &str) -> Result<Vec<String>> {
        self.ensure_available()?;
        let prefix = format!("{}.", namespace);
        Ok(self
            .entries
            .read()
            .await
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.available.load(Ordering::SeqCst))
    }
}
