use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::domain::Decimal;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantitySuggestionsResponse {
    /// Recently used margins, newest first.
    pub quantities: Vec<Decimal>,
    pub currency_symbol: String,
}

pub async fn get_quantity_suggestions(
    State(state): State<AppState>,
) -> Json<QuantitySuggestionsResponse> {
    Json(QuantitySuggestionsResponse {
        quantities: state.suggestions.recent(),
        currency_symbol: state.currency_symbol(),
    })
}
