pub mod api;
pub mod collaborators;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;

pub use collaborators::{CurrencyLookup, PlanLimits, QuantitySuggestions};
pub use config::Config;
pub use db::{init_db, Repository, StoredTrade};
pub use domain::{
    Decimal, Direction, FeeMode, Field, Leg, LegKind, LegList, LegMode, TradeDraft, TradeRecord,
    TradeStatus,
};
pub use engine::{DraftEvent, TradeDraftReducer, ValidationError};
pub use error::AppError;
