//! 데이터 모듈 오류 타입.

use std::fmt;

use coinfeed_core::Identifier;
use thiserror::Error;

/// 저장소 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 저장소 연결/명령 오류
    #[error("Cache error: {0}")]
    CacheError(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<redis::RedisError> for DataError {
    fn from(err: redis::RedisError) -> Self {
        DataError::CacheError(err.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

/// upstream 응답 상태.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamStatus {
    /// 200이 아닌 HTTP 상태 코드
    Http(u16),
    /// 연결 실패, 타임아웃 등 전송 계층 오류
    Transport(String),
    /// 200 응답이지만 본문을 읽거나 파싱할 수 없음
    Decode(String),
}

impl fmt::Display for UpstreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamStatus::Http(code) => write!(f, "status code {}", code),
            UpstreamStatus::Transport(msg) => write!(f, "transport failure: {}", msg),
            UpstreamStatus::Decode(msg) => write!(f, "malformed body: {}", msg),
        }
    }
}

/// 단일 upstream 요청 실패.
///
/// 사이클을 중단시키지 않습니다. 해당 식별자만 이번 사이클 결과에서 빠집니다.
#[derive(Debug, Clone, Error)]
#[error("the request for {identifier} failed with {status}")]
pub struct UpstreamError {
    pub identifier: Identifier,
    pub status: UpstreamStatus,
}

impl UpstreamError {
    pub fn http(identifier: Identifier, code: u16) -> Self {
        Self {
            identifier,
            status: UpstreamStatus::Http(code),
        }
    }

    pub fn transport(identifier: Identifier, message: impl fmt::Display) -> Self {
        Self {
            identifier,
            status: UpstreamStatus::Transport(message.to_string()),
        }
    }

    pub fn decode(identifier: Identifier, message: impl fmt::Display) -> Self {
        Self {
            identifier,
            status: UpstreamStatus::Decode(message.to_string()),
        }
    }

    /// HTTP 상태 코드 (전송/파싱 실패면 None).
    pub fn status_code(&self) -> Option<u16> {
        match self.status {
            UpstreamStatus::Http(code) => Some(code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_message() {
        let err = UpstreamError::http(Identifier::Page(3), 500);
        assert_eq!(err.to_string(), "the request for page 3 failed with status code 500");
        assert_eq!(err.status_code(), Some(500));

        let err = UpstreamError::transport(Identifier::Page(1), "connection reset");
        assert_eq!(err.status_code(), None);
    }
}
