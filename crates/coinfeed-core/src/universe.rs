//! 코인 심볼 유니버스.
//!
//! Coinglass 리소스의 수집 대상은 줄 단위 coin list 파일에서 한 번만 로드됩니다.
//! 로드 시점에 모든 심볼을 검증하여, 잘못된 항목은 요청 시점이 아니라
//! 프로세스 시작 시점에 실패합니다.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// 검증된 코인 심볼 (예: `BTC`, `1000SHIB`).
///
/// ASCII 영숫자만 허용합니다. `.`은 캐시 키 구분자이고 `*`, `?`, `[`는
/// KEYS 패턴 문자이므로 허용하면 키 규칙이 깨집니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Symbol(String);

impl Symbol {
    /// 문자열을 심볼로 검증합니다.
    pub fn parse(value: &str) -> Result<Self> {
        Self::parse_at(value, 0)
    }

    fn parse_at(value: &str, line: usize) -> Result<Self> {
        let reason = if value.is_empty() {
            Some("empty symbol")
        } else if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            Some("only ASCII letters and digits are allowed")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(CoreError::InvalidSymbol {
                line,
                value: value.to_string(),
                reason,
            }),
            None => Ok(Self(value.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl TryFrom<String> for Symbol {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Symbol::parse(&value)
    }
}

/// 수집 대상 코인 심볼 집합 (파일 순서 유지).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinUniverse {
    symbols: Vec<Symbol>,
}

impl CoinUniverse {
    /// 줄 단위 텍스트에서 유니버스를 생성합니다.
    ///
    /// 각 줄은 trim되고, 빈 줄은 무시합니다. 잘못된 심볼이나 중복은 오류입니다.
    pub fn parse(text: &str) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut symbols = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let value = raw.trim();
            if value.is_empty() {
                continue;
            }

            let symbol = Symbol::parse_at(value, line)?;
            if !seen.insert(symbol.clone()) {
                return Err(CoreError::DuplicateSymbol {
                    line,
                    symbol: symbol.0,
                });
            }
            symbols.push(symbol);
        }

        if symbols.is_empty() {
            return Err(CoreError::EmptyUniverse);
        }

        Ok(Self { symbols })
    }

    /// 파일에서 유니버스를 로드합니다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let universe = Self::parse(&text)?;
        tracing::info!(
            path = %path.display(),
            count = universe.len(),
            "coin list 로드 완료"
        );
        Ok(universe)
    }

    /// 파일 순서대로 심볼 반환.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// 이름으로 심볼을 찾습니다 (대소문자 구분).
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.as_str() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// 생성 시 검증되므로 항상 false.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}
