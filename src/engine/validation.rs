//! Pre-submit validation gate.
//!
//! Edits are never blocked; these rules only decide whether a draft may be
//! handed to the submission boundary. The first failing rule wins.

use crate::domain::{LegList, TradeDraft, TradeStatus};
use thiserror::Error;

/// The first unmet submission rule. `Display` is the user-facing reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Symbol is required")]
    MissingSymbol,
    #[error("Margin must be greater than zero")]
    InvalidMargin,
    #[error("Leverage must be greater than zero")]
    InvalidLeverage,
    #[error("At least one entry with a price is required")]
    MissingEntry,
    #[error("At least one exit price or percentage is required")]
    MissingExit,
    #[error("At least one stop-loss price or percentage is required")]
    MissingStopLoss,
    #[error("At least one take-profit price or percentage is required")]
    MissingTakeProfit,
    #[error("PnL is required for quick trades")]
    MissingPnl,
    #[error("Close time is required for {0} trades")]
    MissingCloseTime(TradeStatus),
    #[error("Running trades cannot have a close time")]
    UnexpectedCloseTime,
    #[error("Close time cannot be before open time")]
    CloseBeforeOpen,
}

pub fn validate(draft: &TradeDraft) -> Result<(), ValidationError> {
    if draft.symbol.trim().is_empty() {
        return Err(ValidationError::MissingSymbol);
    }
    if draft.notional_margin.positive().is_none() {
        return Err(ValidationError::InvalidMargin);
    }
    if draft.leverage.positive().is_none() {
        return Err(ValidationError::InvalidLeverage);
    }

    match draft.status {
        TradeStatus::Running => {
            require_entry(&draft.entries)?;
            require_target(&draft.stop_losses, ValidationError::MissingStopLoss)?;
            require_target(&draft.take_profits, ValidationError::MissingTakeProfit)?;
            if draft.close_time.is_some() {
                return Err(ValidationError::UnexpectedCloseTime);
            }
        }
        TradeStatus::Closed => {
            require_entry(&draft.entries)?;
            require_target(&draft.exits, ValidationError::MissingExit)?;
            if draft.close_time.is_none() {
                return Err(ValidationError::MissingCloseTime(draft.status));
            }
        }
        TradeStatus::Quick => {
            if draft.pnl.is_unset() {
                return Err(ValidationError::MissingPnl);
            }
            if draft.close_time.is_none() {
                return Err(ValidationError::MissingCloseTime(draft.status));
            }
        }
    }

    if let (Some(open), Some(close)) = (draft.open_time, draft.close_time) {
        if close < open {
            return Err(ValidationError::CloseBeforeOpen);
        }
    }

    Ok(())
}

fn require_entry(entries: &LegList) -> Result<(), ValidationError> {
    if entries.iter().any(|leg| leg.has_price()) {
        Ok(())
    } else {
        Err(ValidationError::MissingEntry)
    }
}

fn require_target(legs: &LegList, missing: ValidationError) -> Result<(), ValidationError> {
    if legs.iter().any(|leg| leg.has_target()) {
        Ok(())
    } else {
        Err(missing)
    }
}
