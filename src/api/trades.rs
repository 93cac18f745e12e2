use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::drafts::{draft_response, DraftResponse};
use super::AppState;
use crate::db::StoredTrade;
use crate::domain::TradeDraft;
use crate::error::AppError;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TradesResponse {
    pub trades: Vec<StoredTrade>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDraftResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub draft: DraftResponse,
}

/// Finalize a draft, check the plan quota and store the resulting record.
pub async fn create_trade(
    State(state): State<AppState>,
    Json(draft): Json<TradeDraft>,
) -> Result<(StatusCode, Json<StoredTrade>), AppError> {
    let record = state.reducer.finalize(&draft)?;

    let used = state.repo.count_trades().await?;
    if let Err(e) = state.plan_limits.check_trade_quota(used).await {
        warn!(used, error = %e, "trade rejected by plan limits");
        return Err(e.into());
    }

    let stored = state.repo.insert_trade(&record).await?;
    if let Some(margin) = record.quantity_usd.positive() {
        state.suggestions.record(margin);
    }

    info!(id = %stored.id, symbol = %record.symbol, status = %record.status, "trade stored");
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn list_trades(
    Query(params): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<Json<TradesResponse>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }

    let trades = state.repo.list_trades(limit).await?;
    Ok(Json(TradesResponse { trades }))
}

pub async fn get_trade(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StoredTrade>, AppError> {
    let id = parse_trade_id(&id)?;
    let stored = state
        .repo
        .get_trade(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("trade {}", id)))?;
    Ok(Json(stored))
}

/// Re-finalize an edited draft and replace the stored record.
pub async fn update_trade(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(draft): Json<TradeDraft>,
) -> Result<Json<StoredTrade>, AppError> {
    let id = parse_trade_id(&id)?;
    let record = state.reducer.finalize(&draft)?;

    let stored = state
        .repo
        .update_trade(id, &record)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("trade {}", id)))?;

    info!(id = %id, symbol = %record.symbol, "trade updated");
    Ok(Json(stored))
}

/// Load a stored trade back into an editable draft.
pub async fn get_trade_draft(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TradeDraftResponse>, AppError> {
    let id = parse_trade_id(&id)?;
    let stored = state
        .repo
        .get_trade(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("trade {}", id)))?;

    let draft = state.reducer.hydrate(stored.record);
    Ok(Json(TradeDraftResponse {
        id,
        draft: draft_response(&state, draft),
    }))
}

fn parse_trade_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("invalid trade id: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trade_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_trade_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_trade_id("nope"),
            Err(AppError::BadRequest(_))
        ));
    }
}
