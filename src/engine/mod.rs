//! Pure computation engine for trade drafts.
//!
//! Nothing in here performs I/O. Every function takes values and returns new
//! values, so the whole pipeline can be exercised without a runtime.

pub mod allocation;
pub mod average;
pub mod event;
pub mod metrics;
pub mod price;
pub mod reducer;
pub mod validation;

pub use allocation::{apply_allocation, remove_leg};
pub use average::{resolve_price, weighted_average};
pub use event::DraftEvent;
pub use metrics::{duration_hours, live_duration_hours, DerivedMetrics, MetricsInput};
pub use price::price_from_percent;
pub use reducer::{recompute, DraftDefaults, TradeDraftReducer};
pub use validation::{validate, ValidationError};
