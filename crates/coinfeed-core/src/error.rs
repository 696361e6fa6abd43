//! 코어 오류 타입.

use std::path::PathBuf;

use thiserror::Error;

/// 도메인 타입 생성/로드 오류.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 심볼 형식 오류
    #[error("Invalid symbol '{value}' at line {line}: {reason}")]
    InvalidSymbol {
        line: usize,
        value: String,
        reason: &'static str,
    },

    /// 중복 심볼
    #[error("Duplicate symbol '{symbol}' at line {line}")]
    DuplicateSymbol { line: usize, symbol: String },

    /// coin list에 심볼이 하나도 없음
    #[error("Coin universe is empty")]
    EmptyUniverse,

    /// 알 수 없는 리소스 타입 이름
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// 파일 읽기 실패
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
