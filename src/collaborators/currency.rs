//! Currency code to display symbol.

use crate::domain::Decimal;
use std::fmt;

pub trait CurrencyLookup: Send + Sync + fmt::Debug {
    /// Display symbol for an ISO-ish currency code. Unknown codes map to the
    /// code itself.
    fn symbol_for(&self, code: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCurrencyLookup;

const SYMBOLS: &[(&str, &str)] = &[
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("INR", "₹"),
    ("JPY", "¥"),
    ("USDT", "₮"),
];

impl CurrencyLookup for StaticCurrencyLookup {
    fn symbol_for(&self, code: &str) -> String {
        let code = code.trim().to_ascii_uppercase();
        SYMBOLS
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, symbol)| symbol.to_string())
            .unwrap_or(code)
    }
}

/// `$1234.50`, `-$12.00`.
pub fn format_money(symbol: &str, value: Decimal) -> String {
    let rounded = value.round_money();
    if rounded.is_negative() {
        format!("-{}{}", symbol, rounded.abs())
    } else {
        format!("{}{}", symbol, rounded)
    }
}
