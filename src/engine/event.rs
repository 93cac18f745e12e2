//! Mutation events accepted by the draft reducer.

use crate::domain::{Direction, FeeMode, Field, LegKind, LegMode, TradeStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user edit. Serialized as `{"type": "setMargin", "value": "250"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DraftEvent {
    SetSymbol {
        symbol: String,
    },
    SetDirection {
        direction: Direction,
    },
    /// Selecting a different status hard-resets every leg array.
    SetStatus {
        status: TradeStatus,
    },
    SetMargin {
        value: Field,
    },
    SetLeverage {
        value: Field,
    },
    SetOpenTime {
        value: Option<DateTime<Utc>>,
    },
    SetCloseTime {
        value: Option<DateTime<Utc>>,
    },
    SetFeeMode {
        mode: FeeMode,
    },
    SetFeeValue {
        value: Field,
    },
    /// Direct PnL input, honoured for quick trades only.
    SetPnl {
        value: Field,
    },
    SetLegPrice {
        kind: LegKind,
        index: usize,
        value: Field,
    },
    SetLegPercent {
        kind: LegKind,
        index: usize,
        value: Field,
    },
    SetLegMode {
        kind: LegKind,
        index: usize,
        mode: LegMode,
    },
    /// Allocation committed on blur. Runs the clamp/append/truncate rules.
    CommitAllocation {
        kind: LegKind,
        index: usize,
        value: Field,
    },
    RemoveLeg {
        kind: LegKind,
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Decimal;

    #[test]
    fn test_event_wire_format() {
        let event: DraftEvent = serde_json::from_str(
            r#"{"type": "commitAllocation", "kind": "stopLosses", "index": 1, "value": "40"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            DraftEvent::CommitAllocation {
                kind: LegKind::StopLosses,
                index: 1,
                value: Field::Value(Decimal::from_str_canonical("40").unwrap()),
            }
        );
    }

    #[test]
    fn test_blank_value_means_unset() {
        let event: DraftEvent =
            serde_json::from_str(r#"{"type": "setMargin", "value": ""}"#).unwrap();
        assert_eq!(event, DraftEvent::SetMargin { value: Field::Unset });
    }

    #[test]
    fn test_status_event_roundtrip_tag() {
        let json = serde_json::to_value(DraftEvent::SetStatus {
            status: TradeStatus::Quick,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"type": "setStatus", "status": "quick"}));
    }
}
