//! Coinglass 지표 조회 endpoint.
//!
//! `GET /coinglass/{operation}?coin=SYM`
//!
//! - `operation`: `funding_rates_u`, `funding_rates_c`, `open_interest`
//! - `coin` 지정 시 해당 심볼 값 하나 (없으면 `null`)
//! - 미지정 시 coin list 전체 심볼의 값 배열 (coin list 순서)

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use coinfeed_core::CoinglassMetric;
use coinfeed_data::{get_latest, KeySelector};
use serde::Deserialize;
use serde_json::Value;

use super::render;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CoinQuery {
    pub coin: Option<String>,
}

pub async fn get_coinglass(
    State(state): State<Arc<AppState>>,
    Path(operation): Path<String>,
    Query(query): Query<CoinQuery>,
) -> Result<Json<Value>, ApiError> {
    let metric: CoinglassMetric = operation
        .parse()
        .map_err(|_| ApiError::UnknownOperation(operation.clone()))?;

    let selector = match query.coin {
        Some(coin) => {
            let symbol = state
                .universe
                .get(&coin)
                .ok_or_else(|| ApiError::UnknownCoin(coin.clone()))?;
            KeySelector::One(symbol.to_string())
        }
        None => KeySelector::Many(state.universe.iter().map(|s| s.to_string()).collect()),
    };
    let single = matches!(selector, KeySelector::One(_));

    let latest = get_latest(state.store.as_ref(), metric.namespace(), selector).await?;
    tracing::debug!(
        operation = %metric,
        values = latest.values.len(),
        skipped = latest.skipped(),
        "coinglass 조회"
    );

    Ok(Json(render(latest, single)))
}
