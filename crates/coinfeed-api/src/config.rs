//! API 서버 설정.

use std::net::SocketAddr;
use std::path::PathBuf;

use coinfeed_data::RedisConfig;

/// API 서버 설정
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// 바인드 호스트
    pub host: String,
    /// 바인드 포트
    pub port: u16,
    /// 저장소 설정
    pub redis: RedisConfig,
    /// coin list 파일 (Coinglass 전체 조회 대상)
    pub coin_list_file: PathBuf,
}

impl ApiConfig {
    /// 환경변수에서 설정 로드 (`.env` 파일 포함)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("API_PORT") {
            None => 8000,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "API_PORT 파싱 실패, 기본값 8000 사용");
                8000
            }),
        };

        Self {
            host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            redis: RedisConfig {
                url: lookup("REDIS_URL").unwrap_or_else(|| RedisConfig::default().url),
            },
            coin_list_file: lookup("COIN_LIST_FILE")
                .unwrap_or_else(|| "/coin_list".to_string())
                .into(),
        }
    }

    /// 바인드 주소
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
