//! 환경변수 기반 설정 모듈.
//!
//! 설정은 프로세스 시작 시 한 번 생성되어 참조로 전달됩니다.

use std::path::PathBuf;
use std::time::Duration;

use coinfeed_core::CoinUniverse;
use coinfeed_data::{CoingeckoClient, CoinglassClient, RedisConfig};
use secrecy::{ExposeSecret, SecretString};

use crate::error::CollectorError;
use crate::Result;

/// Collector 전체 설정
#[derive(Debug)]
pub struct CollectorConfig {
    /// 저장소 설정
    pub redis: RedisConfig,
    /// 스케줄 설정
    pub schedule: ScheduleConfig,
    /// 배치 수집 설정
    pub fetch: FetchConfig,
    /// upstream 소스 설정
    pub sources: SourceConfig,
}

/// 스케줄 설정
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// 사이클 간격 (초 단위)
    pub refresh_rate_secs: u64,
}

/// 배치 수집 설정
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// 청크당 동시 요청 수
    pub concurrent_requests: usize,
    /// 청크 사이 대기 시간 (초 단위)
    pub inter_request_secs: u64,
}

/// upstream 소스 설정
#[derive(Debug)]
pub struct SourceConfig {
    /// 줄 단위 coin list 파일
    pub coin_list_file: PathBuf,
    /// 첫 줄이 Coinglass secret인 파일
    pub secret_file: PathBuf,
    /// secret 직접 지정 (설정 시 파일보다 우선)
    pub coinglass_secret: Option<SecretString>,
    /// Coinglass Base URL
    pub coinglass_base_url: String,
    /// CoinGecko Base URL
    pub coingecko_base_url: String,
    /// HTTP 요청 타임아웃 (초 단위)
    pub http_timeout_secs: u64,
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드 (`.env` 파일 포함)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정 로드
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };

        let config = Self {
            redis: RedisConfig {
                url: env.string("REDIS_URL", &RedisConfig::default().url),
            },
            schedule: ScheduleConfig {
                refresh_rate_secs: env.parse("REFRESH_RATE", 3600),
            },
            fetch: FetchConfig {
                concurrent_requests: env.parse("CONCURRENT_REQUESTS", 10),
                inter_request_secs: env.parse("INTER_REQUEST_TIME", 3),
            },
            sources: SourceConfig {
                coin_list_file: env.string("COIN_LIST_FILE", "/coin_list").into(),
                secret_file: env.string("SECRET_FILE", "/run/secrets/keys").into(),
                coinglass_secret: (env.lookup)("COINGLASS_SECRET")
                    .filter(|s| !s.trim().is_empty())
                    .map(|s| SecretString::from(s.trim().to_string())),
                coinglass_base_url: env
                    .string("COINGLASS_BASE_URL", CoinglassClient::DEFAULT_BASE_URL),
                coingecko_base_url: env
                    .string("COINGECKO_BASE_URL", CoingeckoClient::DEFAULT_BASE_URL),
                http_timeout_secs: env.parse("HTTP_TIMEOUT_SECS", 30),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// 불변식 검증
    pub fn validate(&self) -> Result<()> {
        if self.fetch.concurrent_requests == 0 {
            return Err(CollectorError::Config(
                "CONCURRENT_REQUESTS는 1 이상이어야 합니다".to_string(),
            ));
        }
        if self.schedule.refresh_rate_secs == 0 {
            return Err(CollectorError::Config(
                "REFRESH_RATE는 1 이상이어야 합니다".to_string(),
            ));
        }
        if self.sources.http_timeout_secs == 0 {
            return Err(CollectorError::Config(
                "HTTP_TIMEOUT_SECS는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }

    /// coin list 파일 로드
    pub fn load_universe(&self) -> Result<CoinUniverse> {
        Ok(CoinUniverse::load(&self.sources.coin_list_file)?)
    }

    /// Coinglass secret 로드.
    ///
    /// `COINGLASS_SECRET`이 있으면 그대로 사용하고, 없으면 secret 파일의 첫 줄을 읽습니다.
    pub fn load_secret(&self) -> Result<SecretString> {
        if let Some(secret) = &self.sources.coinglass_secret {
            return Ok(SecretString::from(secret.expose_secret().to_string()));
        }

        let path = &self.sources.secret_file;
        let content = std::fs::read_to_string(path).map_err(|e| {
            CollectorError::Config(format!("secret 파일을 읽을 수 없습니다 ({}): {}", path.display(), e))
        })?;

        let first_line = content.lines().next().unwrap_or_default().trim();
        if first_line.is_empty() {
            return Err(CollectorError::Config(format!(
                "secret 파일이 비어 있습니다: {}",
                path.display()
            )));
        }

        Ok(SecretString::from(first_line.to_string()))
    }
}

impl ScheduleConfig {
    /// 사이클 간격을 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.refresh_rate_secs)
    }
}

impl FetchConfig {
    /// 청크 사이 대기 시간을 Duration으로 반환
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.inter_request_secs)
    }
}

impl SourceConfig {
    /// HTTP 타임아웃을 Duration으로 반환
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, key: &str, default: &str) -> String {
        (self.lookup)(key).unwrap_or_else(|| default.to_string())
    }

    /// 값을 파싱 (실패 시 경고 후 기본값 사용)
    fn parse<T>(&self, key: &str, default: T) -> T
    where
        T: std::str::FromStr + std::fmt::Display,
    {
        match (self.lookup)(key) {
            None => default,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(key, value = %raw, default = %default, "환경변수 파싱 실패, 기본값 사용");
                default
            }),
        }
    }
}
