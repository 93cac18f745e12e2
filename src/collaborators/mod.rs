//! Services the engine relies on but does not own.
//!
//! Each concern is a trait so the API layer can swap the reference
//! implementations shipped here for real ones.

pub mod currency;
pub mod plan_limits;
pub mod suggestions;

pub use currency::{format_money, CurrencyLookup, StaticCurrencyLookup};
pub use plan_limits::{PlanLimitError, PlanLimits, StaticPlanLimits};
pub use suggestions::{InMemoryQuantitySuggestions, QuantitySuggestions};
