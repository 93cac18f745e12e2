pub mod drafts;
pub mod health;
pub mod suggestions;
pub mod trades;

use crate::collaborators::{
    CurrencyLookup, InMemoryQuantitySuggestions, PlanLimits, QuantitySuggestions,
    StaticCurrencyLookup, StaticPlanLimits,
};
use crate::config::Config;
use crate::db::Repository;
use crate::engine::TradeDraftReducer;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub reducer: Arc<TradeDraftReducer>,
    pub plan_limits: Arc<dyn PlanLimits>,
    pub suggestions: Arc<dyn QuantitySuggestions>,
    pub currency: Arc<dyn CurrencyLookup>,
    pub config: Config,
}

impl AppState {
    /// State backed by the reference collaborators, configured from `config`.
    pub fn new(repo: Arc<Repository>, config: Config) -> Self {
        Self {
            repo,
            reducer: Arc::new(TradeDraftReducer::new(config.draft_defaults())),
            plan_limits: Arc::new(StaticPlanLimits::new(config.plan_max_trades)),
            suggestions: Arc::new(InMemoryQuantitySuggestions::new(config.suggestion_capacity)),
            currency: Arc::new(StaticCurrencyLookup),
            config,
        }
    }

    pub fn with_plan_limits(mut self, plan_limits: Arc<dyn PlanLimits>) -> Self {
        self.plan_limits = plan_limits;
        self
    }

    /// Display symbol of the configured account currency.
    pub fn currency_symbol(&self) -> String {
        self.currency.symbol_for(&self.config.currency)
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/drafts", post(drafts::new_draft))
        .route("/v1/drafts/apply", post(drafts::apply_events))
        .route("/v1/drafts/validate", post(drafts::validate_draft))
        .route(
            "/v1/trades",
            get(trades::list_trades).post(trades::create_trade),
        )
        .route(
            "/v1/trades/:id",
            get(trades::get_trade).put(trades::update_trade),
        )
        .route("/v1/trades/:id/draft", get(trades::get_trade_draft))
        .route(
            "/v1/suggestions/quantities",
            get(suggestions::get_quantity_suggestions),
        )
        .layer(cors)
        .with_state(state)
}
