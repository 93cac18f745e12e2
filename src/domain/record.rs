//! Flat trade record handed to the submission boundary.
//!
//! Field names mirror the persisted trade document so no further translation
//! is needed between the engine and storage.

use crate::domain::{
    Decimal, Direction, FeeMode, Field, Leg, LegKind, LegList, TradeDraft, TradeStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Missing fields decode to their defaults, so documents written before a
/// field existed still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradeRecord {
    pub symbol: String,
    pub direction: Direction,
    pub status: TradeStatus,
    #[serde(rename = "quantityUSD")]
    pub quantity_usd: Field,
    pub leverage: Field,
    pub total_quantity: Field,
    pub entries: Vec<Leg>,
    pub exits: Vec<Leg>,
    #[serde(rename = "sls")]
    pub stop_losses: Vec<Leg>,
    #[serde(rename = "tps")]
    pub take_profits: Vec<Leg>,
    pub avg_entry_price: Field,
    pub avg_exit_price: Field,
    #[serde(rename = "avgSLPrice")]
    pub avg_stop_loss_price: Field,
    #[serde(rename = "avgTPPrice")]
    pub avg_take_profit_price: Field,
    pub pnl: Field,
    pub pnl_after_fee: Field,
    pub fee_type: FeeMode,
    pub fee_value: Field,
    pub fees: Field,
    pub expected_profit: Field,
    pub expected_loss: Field,
    pub rr: String,
    pub duration: Decimal,
    pub open_time: Option<DateTime<Utc>>,
    pub close_time: Option<DateTime<Utc>>,
}

impl TradeRecord {
    /// Flatten a draft, dropping blank leg slots.
    pub fn from_draft(draft: &TradeDraft) -> Self {
        TradeRecord {
            symbol: draft.symbol.trim().to_string(),
            direction: draft.direction,
            status: draft.status,
            quantity_usd: draft.notional_margin,
            leverage: draft.leverage,
            total_quantity: draft.total_notional,
            entries: draft.entries.filled(),
            exits: draft.exits.filled(),
            stop_losses: draft.stop_losses.filled(),
            take_profits: draft.take_profits.filled(),
            avg_entry_price: draft.avg_entry_price,
            avg_exit_price: draft.avg_exit_price,
            avg_stop_loss_price: draft.avg_stop_loss_price,
            avg_take_profit_price: draft.avg_take_profit_price,
            pnl: draft.pnl,
            pnl_after_fee: draft.pnl_after_fee,
            fee_type: draft.fee_mode,
            fee_value: draft.fee_value,
            fees: draft.fee_amount,
            expected_profit: draft.expected_profit,
            expected_loss: draft.expected_loss,
            rr: draft.risk_reward_ratio.clone(),
            duration: draft.duration_hours,
            open_time: draft.open_time,
            close_time: draft.close_time,
        }
    }

    /// Map a persisted record back into draft shape for editing.
    ///
    /// Active leg arrays are reopened: an empty one gets its seed slot and an
    /// under-allocated one gets a trailing blank slot. Derived fields are
    /// copied as stored; callers recompute before use.
    pub fn into_draft(self) -> TradeDraft {
        let status = self.status;
        let mut draft = TradeDraft {
            symbol: self.symbol,
            direction: self.direction,
            status,
            notional_margin: self.quantity_usd,
            leverage: self.leverage,
            total_notional: self.total_quantity,
            entries: LegList::from_legs(self.entries),
            exits: LegList::from_legs(self.exits),
            stop_losses: LegList::from_legs(self.stop_losses),
            take_profits: LegList::from_legs(self.take_profits),
            avg_entry_price: self.avg_entry_price,
            avg_exit_price: self.avg_exit_price,
            avg_stop_loss_price: self.avg_stop_loss_price,
            avg_take_profit_price: self.avg_take_profit_price,
            open_time: self.open_time,
            close_time: self.close_time,
            fee_mode: self.fee_type,
            fee_value: self.fee_value,
            fee_amount: self.fees,
            pnl: self.pnl,
            pnl_after_fee: self.pnl_after_fee,
            expected_profit: self.expected_profit,
            expected_loss: self.expected_loss,
            risk_reward_ratio: self.rr,
            duration_hours: self.duration,
        };

        for kind in LegKind::ALL {
            let legs = draft.legs_mut(kind);
            if !status.uses(kind) {
                *legs = LegList::new();
            } else if legs.is_empty() {
                *legs = LegList::seeded();
            } else if legs.total_allocation() < Decimal::hundred() {
                let mode = legs.last().map(|leg| leg.mode).unwrap_or_default();
                legs.append(Leg::empty(mode));
            }
        }

        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LegMode;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn running_draft() -> TradeDraft {
        let mut draft = TradeDraft::for_status(TradeStatus::Running);
        draft.symbol = "  BTCUSDT ".to_string();
        draft.notional_margin = Field::Value(d("1000"));
        draft.entries = LegList::from_legs(vec![
            Leg::priced(d("100"), d("60")),
            Leg::empty(LegMode::Price),
        ]);
        draft
    }

    #[test]
    fn test_from_draft_drops_blank_slots_and_trims_symbol() {
        let record = TradeRecord::from_draft(&running_draft());
        assert_eq!(record.symbol, "BTCUSDT");
        assert_eq!(record.entries.len(), 1);
        assert_eq!(record.quantity_usd, Field::Value(d("1000")));
    }

    #[test]
    fn test_into_draft_reopens_under_allocated_lists() {
        let record = TradeRecord::from_draft(&running_draft());
        let draft = record.into_draft();
        assert_eq!(draft.entries.len(), 2);
        assert!(draft.entries.last().unwrap().is_empty());
        assert!(draft.exits.is_empty());
    }

    #[test]
    fn test_into_draft_seeds_missing_active_lists() {
        let mut record = TradeRecord::from_draft(&running_draft());
        record.stop_losses.clear();
        let draft = record.into_draft();
        assert_eq!(draft.stop_losses, LegList::seeded());
    }

    #[test]
    fn test_record_field_names_match_persisted_document() {
        let json = serde_json::to_value(TradeRecord::from_draft(&running_draft())).unwrap();
        for key in [
            "quantityUSD",
            "totalQuantity",
            "sls",
            "tps",
            "avgSLPrice",
            "avgTPPrice",
            "feeType",
            "fees",
            "rr",
            "duration",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_record_accepts_legacy_string_numbers() {
        let json = r#"{
            "symbol": "ETH", "direction": "short", "status": "quick",
            "quantityUSD": "250", "leverage": "5", "totalQuantity": "1250",
            "avgEntryPrice": "", "avgExitPrice": "", "avgSLPrice": "", "avgTPPrice": "",
            "pnl": "-12.5", "pnlAfterFee": "", "feeValue": "", "fees": "",
            "expectedProfit": "", "expectedLoss": "",
            "openTime": null, "closeTime": "2024-01-02T00:00:00Z"
        }"#;
        let record: TradeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.pnl, Field::Value(d("-12.5")));
        assert!(record.avg_entry_price.is_unset());
        assert_eq!(record.fee_type, FeeMode::None);
    }

    #[test]
    fn test_partial_document_decodes_with_defaults() {
        let json = r#"{
            "symbol": "SOL", "direction": "long", "status": "closed",
            "quantityUSD": "100", "pnl": "7.5",
            "entries": [{"mode": "price", "price": "20", "allocation": "100"}]
        }"#;
        let record: TradeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.fees, Field::Unset);
        assert_eq!(record.fee_value, Field::Unset);
        assert!(record.leverage.is_unset());
        assert!(record.exits.is_empty());
        assert_eq!(record.rr, "");
        assert_eq!(record.duration, Decimal::zero());

        let draft = record.into_draft();
        assert_eq!(draft.entries.len(), 1);
        assert_eq!(draft.exits, LegList::seeded());
    }
}
