use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::collaborators::format_money;
use crate::domain::{Decimal, Direction, Field, TradeDraft, TradeStatus};
use crate::engine::{live_duration_hours, validate, DraftEvent};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewDraftRequest {
    pub status: Option<TradeStatus>,
    pub direction: Option<Direction>,
    pub symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub draft: TradeDraft,
    #[serde(default)]
    pub events: Vec<DraftEvent>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub draft: TradeDraft,
    /// First unmet submission rule, if any.
    pub validation_error: Option<String>,
    pub currency_symbol: String,
    pub display: MoneyDisplay,
    /// Hours since open for running trades, measured now.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_duration_hours: Option<Decimal>,
}

/// Money fields pre-formatted with the currency symbol.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyDisplay {
    pub total_notional: Option<String>,
    pub pnl: Option<String>,
    pub pnl_after_fee: Option<String>,
    pub fee_amount: Option<String>,
    pub expected_profit: Option<String>,
    pub expected_loss: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub reason: Option<String>,
}

pub async fn new_draft(
    State(state): State<AppState>,
    body: Option<Json<NewDraftRequest>>,
) -> Json<DraftResponse> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let status = request.status.unwrap_or_default();

    let mut draft = state.reducer.new_draft(status, Utc::now());
    if let Some(direction) = request.direction {
        draft = state
            .reducer
            .apply(&draft, DraftEvent::SetDirection { direction });
    }
    if let Some(symbol) = request.symbol {
        draft = state.reducer.apply(&draft, DraftEvent::SetSymbol { symbol });
    }

    Json(draft_response(&state, draft))
}

pub async fn apply_events(
    State(state): State<AppState>,
    Json(request): Json<ApplyRequest>,
) -> Json<DraftResponse> {
    let draft = state.reducer.apply_all(&request.draft, request.events);
    Json(draft_response(&state, draft))
}

pub async fn validate_draft(
    State(state): State<AppState>,
    Json(draft): Json<TradeDraft>,
) -> Json<ValidateResponse> {
    let draft = state.reducer.recompute(&draft);
    let response = match validate(&draft) {
        Ok(()) => ValidateResponse {
            valid: true,
            reason: None,
        },
        Err(err) => ValidateResponse {
            valid: false,
            reason: Some(err.to_string()),
        },
    };
    Json(response)
}

pub(crate) fn draft_response(state: &AppState, draft: TradeDraft) -> DraftResponse {
    let symbol = state.currency_symbol();
    let money = |field: Field| field.value().map(|v| format_money(&symbol, v));

    let display = MoneyDisplay {
        total_notional: money(draft.total_notional),
        pnl: money(draft.pnl),
        pnl_after_fee: money(draft.pnl_after_fee),
        fee_amount: money(draft.fee_amount),
        expected_profit: money(draft.expected_profit),
        expected_loss: money(draft.expected_loss),
    };
    let live_duration_hours = (draft.status == TradeStatus::Running)
        .then(|| live_duration_hours(draft.open_time, Utc::now()));

    DraftResponse {
        validation_error: validate(&draft).err().map(|e| e.to_string()),
        currency_symbol: symbol.clone(),
        display,
        live_duration_hours,
        draft,
    }
}
