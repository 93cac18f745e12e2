//! Domain types for the trade builder.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper and the optional `Field`
//! - Domain primitives: Direction, TradeStatus, FeeMode, LegMode, LegKind
//! - Legs and the shared `LegList`
//! - The editable `TradeDraft` and the flat `TradeRecord` handed to storage

pub mod decimal;
pub mod draft;
pub mod field;
pub mod leg;
pub mod primitives;
pub mod record;

pub use decimal::Decimal;
pub use draft::TradeDraft;
pub use field::Field;
pub use leg::{Leg, LegList};
pub use primitives::{Direction, FeeMode, LegKind, LegMode, TradeStatus};
pub use record::TradeRecord;
