//! The mutable, not-yet-persisted trade record being edited.

use crate::domain::{Decimal, Direction, FeeMode, Field, LegKind, LegList, TradeStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A trade draft.
///
/// Only `TradeDraftReducer` mutates a draft, and it always publishes a new
/// value, so a reader never observes a half-recomputed draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradeDraft {
    pub symbol: String,
    pub direction: Direction,
    pub status: TradeStatus,

    /// Margin in account currency.
    pub notional_margin: Field,
    pub leverage: Field,
    /// margin * leverage.
    pub total_notional: Field,

    pub entries: LegList,
    pub exits: LegList,
    pub stop_losses: LegList,
    pub take_profits: LegList,

    pub avg_entry_price: Field,
    pub avg_exit_price: Field,
    pub avg_stop_loss_price: Field,
    pub avg_take_profit_price: Field,

    pub open_time: Option<DateTime<Utc>>,
    pub close_time: Option<DateTime<Utc>>,

    pub fee_mode: FeeMode,
    pub fee_value: Field,

    // Derived metrics. `pnl` doubles as the user input for quick trades.
    pub fee_amount: Field,
    pub pnl: Field,
    pub pnl_after_fee: Field,
    pub expected_profit: Field,
    pub expected_loss: Field,
    /// Rendered as `1:x.xx`, empty when not computable.
    pub risk_reward_ratio: String,
    pub duration_hours: Decimal,
}

impl TradeDraft {
    /// A blank draft for `status`, with the leg arrays that status uses seeded.
    pub fn for_status(status: TradeStatus) -> Self {
        let mut draft = TradeDraft {
            leverage: Field::Value(Decimal::one()),
            ..TradeDraft::default()
        };
        draft.reset_for_status(status);
        draft
    }

    pub fn legs(&self, kind: LegKind) -> &LegList {
        match kind {
            LegKind::Entries => &self.entries,
            LegKind::Exits => &self.exits,
            LegKind::StopLosses => &self.stop_losses,
            LegKind::TakeProfits => &self.take_profits,
        }
    }

    pub fn legs_mut(&mut self, kind: LegKind) -> &mut LegList {
        match kind {
            LegKind::Entries => &mut self.entries,
            LegKind::Exits => &mut self.exits,
            LegKind::StopLosses => &mut self.stop_losses,
            LegKind::TakeProfits => &mut self.take_profits,
        }
    }

    /// Hard reset on entering `status`.
    ///
    /// Leg data from the previous status is discarded, never reinterpreted.
    pub fn reset_for_status(&mut self, status: TradeStatus) {
        self.status = status;
        for kind in LegKind::ALL {
            *self.legs_mut(kind) = if status.uses(kind) {
                LegList::seeded()
            } else {
                LegList::new()
            };
        }

        self.avg_entry_price = Field::Unset;
        self.avg_exit_price = Field::Unset;
        self.avg_stop_loss_price = Field::Unset;
        self.avg_take_profit_price = Field::Unset;

        self.close_time = None;
        self.fee_amount = Field::Unset;
        self.pnl = Field::Unset;
        self.pnl_after_fee = Field::Unset;
        self.expected_profit = Field::Unset;
        self.expected_loss = Field::Unset;
        self.risk_reward_ratio = String::new();
        self.duration_hours = Decimal::zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Leg;

    #[test]
    fn test_for_status_seeds_active_lists() {
        let running = TradeDraft::for_status(TradeStatus::Running);
        assert_eq!(running.entries.len(), 1);
        assert!(running.exits.is_empty());
        assert_eq!(running.stop_losses.len(), 1);
        assert_eq!(running.take_profits.len(), 1);
        assert_eq!(running.leverage, Field::Value(Decimal::one()));

        let closed = TradeDraft::for_status(TradeStatus::Closed);
        assert_eq!(closed.exits.len(), 1);

        let quick = TradeDraft::for_status(TradeStatus::Quick);
        assert!(LegKind::ALL.iter().all(|k| quick.legs(*k).is_empty()));
    }

    #[test]
    fn test_reset_clears_close_time_and_derived_fields() {
        let mut draft = TradeDraft::for_status(TradeStatus::Closed);
        draft.close_time = Some(Utc::now());
        draft.pnl = Field::Value(Decimal::hundred());
        draft.risk_reward_ratio = "1:2.00".to_string();
        draft.exits.append(Leg::seed());

        draft.reset_for_status(TradeStatus::Running);

        assert_eq!(draft.close_time, None);
        assert!(draft.pnl.is_unset());
        assert!(draft.risk_reward_ratio.is_empty());
        assert!(draft.exits.is_empty());
    }

    #[test]
    fn test_draft_json_uses_camel_case() {
        let draft = TradeDraft::for_status(TradeStatus::Running);
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("notionalMargin").is_some());
        assert!(json.get("stopLosses").is_some());
        assert_eq!(json["status"], "running");
    }
}
