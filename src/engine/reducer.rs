//! The draft reducer: `(draft, event) -> draft`.
//!
//! Every event is applied to a copy of the current draft, the copy is fully
//! recomputed, and only then returned. Callers swap the new value in whole,
//! so there is no window in which leg quantities, averages and metrics
//! disagree with the inputs.

use crate::domain::{
    Decimal, FeeMode, Field, Leg, LegKind, LegMode, TradeDraft, TradeRecord, TradeStatus,
};
use crate::engine::allocation::{apply_allocation, remove_leg};
use crate::engine::average::weighted_average;
use crate::engine::event::DraftEvent;
use crate::engine::metrics::{DerivedMetrics, MetricsInput};
use crate::engine::validation::{validate, ValidationError};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Values a fresh draft starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftDefaults {
    pub leverage: Decimal,
    pub fee_mode: FeeMode,
    pub fee_value: Decimal,
}

impl Default for DraftDefaults {
    fn default() -> Self {
        DraftDefaults {
            leverage: Decimal::one(),
            fee_mode: FeeMode::None,
            fee_value: Decimal::zero(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TradeDraftReducer {
    defaults: DraftDefaults,
}

impl TradeDraftReducer {
    pub fn new(defaults: DraftDefaults) -> Self {
        TradeDraftReducer { defaults }
    }

    pub fn defaults(&self) -> &DraftDefaults {
        &self.defaults
    }

    /// A fresh draft for `status`, opened at `now`.
    pub fn new_draft(&self, status: TradeStatus, now: DateTime<Utc>) -> TradeDraft {
        let mut draft = TradeDraft::for_status(status);
        draft.leverage = Field::Value(self.defaults.leverage);
        draft.fee_mode = self.defaults.fee_mode;
        draft.fee_value = Field::Value(self.defaults.fee_value);
        draft.open_time = Some(now);
        recompute(&draft)
    }

    /// Apply one event and return the recomputed draft.
    ///
    /// Events that do not apply to the draft's current shape are ignored;
    /// the result is then just the recomputed input.
    pub fn apply(&self, draft: &TradeDraft, event: DraftEvent) -> TradeDraft {
        let mut next = draft.clone();
        mutate(&mut next, event);
        recompute(&next)
    }

    pub fn apply_all<I>(&self, draft: &TradeDraft, events: I) -> TradeDraft
    where
        I: IntoIterator<Item = DraftEvent>,
    {
        events
            .into_iter()
            .fold(recompute(draft), |current, event| self.apply(&current, event))
    }

    pub fn recompute(&self, draft: &TradeDraft) -> TradeDraft {
        recompute(draft)
    }

    /// Rebuild an editable draft from a stored record.
    pub fn hydrate(&self, record: TradeRecord) -> TradeDraft {
        recompute(&record.into_draft())
    }

    /// Recompute, validate and flatten `draft` for submission.
    pub fn finalize(&self, draft: &TradeDraft) -> Result<TradeRecord, ValidationError> {
        let draft = recompute(draft);
        validate(&draft)?;
        Ok(TradeRecord::from_draft(&draft))
    }
}

/// Recompute every derived field of `draft` from its inputs.
///
/// Order matters: notional feeds the leg quantities, the entry average is the
/// reference for every percent-mode leg, and the metrics read the averages.
/// Running this twice yields the same draft.
pub fn recompute(draft: &TradeDraft) -> TradeDraft {
    let mut next = draft.clone();

    next.total_notional = match (next.notional_margin.positive(), next.leverage.positive()) {
        (Some(margin), Some(leverage)) => margin
            .checked_mul(leverage)
            .map(Decimal::round_money)
            .into(),
        _ => Field::Unset,
    };

    let notional = next.total_notional;
    for kind in LegKind::ALL {
        for leg in next.legs_mut(kind).legs_mut() {
            leg.quantity = leg_quantity(leg, notional);
        }
    }

    let direction = next.direction;
    next.avg_entry_price = weighted_average(&next.entries, Field::Unset, direction);
    let reference = next.avg_entry_price;
    next.avg_exit_price = weighted_average(&next.exits, reference, direction);
    next.avg_stop_loss_price = weighted_average(&next.stop_losses, reference, direction);
    next.avg_take_profit_price = weighted_average(&next.take_profits, reference, direction);

    DerivedMetrics::compute(&MetricsInput::from_draft(&next)).apply_to(&mut next);
    next
}

fn leg_quantity(leg: &Leg, notional: Field) -> Field {
    match (leg.allocation.value(), notional.value()) {
        (Some(allocation), Some(notional)) => allocation
            .checked_div(Decimal::hundred())
            .and_then(|share| share.checked_mul(notional))
            .map(Decimal::round_money)
            .into(),
        _ => Field::Unset,
    }
}

fn mutate(draft: &mut TradeDraft, event: DraftEvent) {
    match event {
        DraftEvent::SetSymbol { symbol } => draft.symbol = symbol,
        DraftEvent::SetDirection { direction } => draft.direction = direction,
        DraftEvent::SetStatus { status } => {
            if status == draft.status {
                return;
            }
            debug!(from = %draft.status, to = %status, "status changed, resetting legs");
            draft.reset_for_status(status);
        }
        DraftEvent::SetMargin { value } => draft.notional_margin = value,
        DraftEvent::SetLeverage { value } => draft.leverage = value,
        DraftEvent::SetOpenTime { value } => draft.open_time = value,
        DraftEvent::SetCloseTime { value } => draft.close_time = value,
        DraftEvent::SetFeeMode { mode } => draft.fee_mode = mode,
        DraftEvent::SetFeeValue { value } => draft.fee_value = value,
        DraftEvent::SetPnl { value } => {
            if draft.status == TradeStatus::Quick {
                draft.pnl = value;
            } else {
                debug!(status = %draft.status, "ignoring manual pnl outside quick trades");
            }
        }
        DraftEvent::SetLegPrice { kind, index, value } => {
            edit_leg(draft, kind, index, |leg| leg.price = value);
        }
        DraftEvent::SetLegPercent { kind, index, value } => {
            if !kind.supports_percent() {
                debug!(%kind, "percent input not supported");
                return;
            }
            edit_leg(draft, kind, index, |leg| leg.percent = value);
        }
        DraftEvent::SetLegMode { kind, index, mode } => {
            if !kind.supports_percent() {
                debug!(%kind, "mode switch not supported");
                return;
            }
            edit_leg(draft, kind, index, |leg| switch_mode(leg, mode));
        }
        DraftEvent::CommitAllocation { kind, index, value } => {
            if active(draft, kind) {
                let legs = draft.legs_mut(kind);
                *legs = apply_allocation(legs, index, value);
            }
        }
        DraftEvent::RemoveLeg { kind, index } => {
            if active(draft, kind) {
                let legs = draft.legs_mut(kind);
                *legs = remove_leg(legs, index);
            }
        }
    }
}

fn active(draft: &TradeDraft, kind: LegKind) -> bool {
    let uses = draft.status.uses(kind);
    if !uses {
        debug!(%kind, status = %draft.status, "leg list inactive for status");
    }
    uses
}

fn edit_leg(draft: &mut TradeDraft, kind: LegKind, index: usize, edit: impl FnOnce(&mut Leg)) {
    if !active(draft, kind) {
        return;
    }
    let legs = draft.legs_mut(kind);
    let Some(mut leg) = legs.get(index).cloned() else {
        debug!(%kind, index, len = legs.len(), "leg index out of range");
        return;
    };
    edit(&mut leg);
    legs.set_at(index, leg);
}

/// Switching modes clears the value that belonged to the old mode.
fn switch_mode(leg: &mut Leg, mode: LegMode) {
    if leg.mode == mode {
        return;
    }
    leg.mode = mode;
    match mode {
        LegMode::Price => leg.percent = Field::Unset,
        LegMode::Percent => leg.price = Field::Unset,
    }
}
