//! Derived metrics: duration, expected profit/loss, risk-reward, realized PnL
//! and fees.
//!
//! Every operand may be missing while a draft is being edited. A missing
//! operand leaves only the metric that needs it unset (or zero for the
//! duration). A result outside the decimal range is unset as well; nothing
//! here can fail or panic.

use crate::domain::{Decimal, Direction, FeeMode, Field, TradeDraft, TradeStatus};
use chrono::{DateTime, Utc};

const MS_PER_HOUR: i64 = 3_600_000;

/// Everything the metrics depend on, taken from a draft after averaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsInput {
    pub avg_entry: Field,
    pub avg_exit: Field,
    pub avg_stop_loss: Field,
    pub avg_take_profit: Field,
    pub total_notional: Field,
    pub notional_margin: Field,
    pub direction: Direction,
    pub status: TradeStatus,
    pub open_time: Option<DateTime<Utc>>,
    pub close_time: Option<DateTime<Utc>>,
    pub fee_mode: FeeMode,
    pub fee_value: Field,
    /// PnL entered by hand; only read for quick trades.
    pub manual_pnl: Field,
}

impl MetricsInput {
    pub fn from_draft(draft: &TradeDraft) -> Self {
        MetricsInput {
            avg_entry: draft.avg_entry_price,
            avg_exit: draft.avg_exit_price,
            avg_stop_loss: draft.avg_stop_loss_price,
            avg_take_profit: draft.avg_take_profit_price,
            total_notional: draft.total_notional,
            notional_margin: draft.notional_margin,
            direction: draft.direction,
            status: draft.status,
            open_time: draft.open_time,
            close_time: draft.close_time,
            fee_mode: draft.fee_mode,
            fee_value: draft.fee_value,
            manual_pnl: draft.pnl,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedMetrics {
    pub duration_hours: Decimal,
    pub expected_profit: Field,
    pub expected_loss: Field,
    pub risk_reward_ratio: String,
    pub pnl: Field,
    pub fee_amount: Field,
    pub pnl_after_fee: Field,
}

impl DerivedMetrics {
    pub fn compute(input: &MetricsInput) -> Self {
        let expected_profit = margin_scaled_move(
            input.avg_entry,
            input.avg_entry,
            input.avg_take_profit,
            input.notional_margin,
        );
        // Entry minus stop, so a long stop below entry reads as a positive risk.
        let expected_loss = margin_scaled_move(
            input.avg_entry,
            input.avg_stop_loss,
            input.avg_entry,
            input.notional_margin,
        );

        let pnl = match input.status {
            TradeStatus::Closed => realized_pnl(input),
            TradeStatus::Quick => input.manual_pnl,
            TradeStatus::Running => Field::Unset,
        };

        let fee_amount = fee_amount(input.fee_mode, input.fee_value, input.total_notional, pnl);
        let pnl_after_fee = match (input.total_notional.value(), fee_amount.value()) {
            (Some(notional), Some(fee)) => notional
                .checked_add(pnl.or_zero())
                .and_then(|gross| gross.checked_sub(fee))
                .map(Decimal::round_money)
                .into(),
            _ => Field::Unset,
        };

        DerivedMetrics {
            duration_hours: duration_hours(input.open_time, input.close_time),
            risk_reward_ratio: risk_reward_ratio(expected_profit, expected_loss),
            expected_profit,
            expected_loss,
            pnl,
            fee_amount,
            pnl_after_fee,
        }
    }

    /// Write the metrics into `draft`.
    pub fn apply_to(self, draft: &mut TradeDraft) {
        draft.duration_hours = self.duration_hours;
        draft.expected_profit = self.expected_profit;
        draft.expected_loss = self.expected_loss;
        draft.risk_reward_ratio = self.risk_reward_ratio;
        draft.pnl = self.pnl;
        draft.fee_amount = self.fee_amount;
        draft.pnl_after_fee = self.pnl_after_fee;
    }
}

/// Hours between open and close, 2 decimal places; zero if either is missing.
pub fn duration_hours(
    open_time: Option<DateTime<Utc>>,
    close_time: Option<DateTime<Utc>>,
) -> Decimal {
    match (open_time, close_time) {
        (Some(open), Some(close)) => {
            let elapsed_ms = (close - open).num_milliseconds();
            Decimal::from_i64(elapsed_ms)
                .checked_div(Decimal::from_i64(MS_PER_HOUR))
                .unwrap_or_default()
                .round_money()
        }
        _ => Decimal::zero(),
    }
}

/// Elapsed hours of a still-running trade, measured against `now`.
///
/// For display only; the stored duration only ever reflects the close time.
pub fn live_duration_hours(open_time: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Decimal {
    duration_hours(open_time, Some(now))
}

/// `(to - from) / entry` as a percentage, applied to the margin.
fn margin_scaled_move(entry: Field, from: Field, to: Field, margin: Field) -> Field {
    let (Some(entry), Some(from), Some(to), Some(margin)) =
        (entry.positive(), from.positive(), to.positive(), margin.value())
    else {
        return Field::Unset;
    };
    to.checked_sub(from)
        .and_then(|delta| percent_move(entry, delta))
        .and_then(|pct| percent_of(margin, pct))
        .map(Decimal::round_money)
        .into()
}

fn realized_pnl(input: &MetricsInput) -> Field {
    let (Some(entry), Some(exit), Some(margin)) = (
        input.avg_entry.positive(),
        input.avg_exit.positive(),
        input.notional_margin.value(),
    ) else {
        return Field::Unset;
    };
    exit.checked_sub(entry)
        .and_then(|delta| delta.checked_mul(Decimal::from_i64(input.direction.sign() as i64)))
        .and_then(|signed_move| percent_move(entry, signed_move))
        .and_then(|pct| percent_of(margin, pct))
        .map(Decimal::round_money)
        .into()
}

/// Entry-side fee, plus the exit-side fee once the PnL is known.
fn fee_amount(mode: FeeMode, value: Field, notional: Field, pnl: Field) -> Field {
    match mode {
        FeeMode::None => Field::Value(Decimal::zero().round_money()),
        FeeMode::Currency => value
            .value()
            .and_then(|flat| {
                if pnl.is_set() {
                    flat.checked_add(flat)
                } else {
                    Some(flat)
                }
            })
            .map(Decimal::round_money)
            .into(),
        FeeMode::Percent => {
            let (Some(rate), Some(notional)) = (value.value(), notional.value()) else {
                return Field::Unset;
            };
            let entry_fee = percent_of(notional, rate);
            let exit_fee = match pnl.value() {
                Some(pnl) => notional
                    .checked_add(pnl)
                    .and_then(|closing| percent_of(closing, rate)),
                None => Some(Decimal::zero()),
            };
            entry_fee
                .zip(exit_fee)
                .and_then(|(entry_fee, exit_fee)| entry_fee.checked_add(exit_fee))
                .map(Decimal::round_money)
                .into()
        }
    }
}

fn risk_reward_ratio(expected_profit: Field, expected_loss: Field) -> String {
    let (Some(profit), Some(loss)) = (expected_profit.non_zero(), expected_loss.non_zero()) else {
        return String::new();
    };
    match profit.checked_div(loss.abs()) {
        Some(rr) => format!("1:{}", rr.round_money()),
        None => String::new(),
    }
}

fn percent_move(entry: Decimal, delta: Decimal) -> Option<Decimal> {
    delta
        .checked_div(entry)
        .and_then(|ratio| ratio.checked_mul(Decimal::hundred()))
}

fn percent_of(base: Decimal, pct: Decimal) -> Option<Decimal> {
    base.checked_div(Decimal::hundred())
        .and_then(|share| share.checked_mul(pct))
}
