//! CoinGecko 시장 데이터 조회 endpoint.
//!
//! `GET /coingecko?id=SYM`. `id`는 대소문자를 구분하지 않습니다.
//! 미지정 시 `coingecko.*` 전체를 순서 보장 없이 반환합니다.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use coinfeed_core::ResourceType;
use coinfeed_data::{get_latest, KeySelector};
use serde::Deserialize;
use serde_json::Value;

use super::render;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

pub async fn get_coingecko(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Value>, ApiError> {
    let selector = match query.id {
        Some(id) => KeySelector::One(id.trim().to_uppercase()),
        None => KeySelector::All,
    };
    let single = matches!(selector, KeySelector::One(_));

    let latest = get_latest(
        state.store.as_ref(),
        ResourceType::CoinMarkets.namespace(),
        selector,
    )
    .await?;

    Ok(Json(render(latest, single)))
}
