//! Percent offset to absolute price.

use crate::domain::{Decimal, Direction, Field};

/// Convert a percent offset from `reference` into an absolute price.
///
/// Long: `reference * (1 + percent / 100)`.
/// Short: `reference * (1 - percent / 100)`.
///
/// Returns `Unset` while the price is not yet computable: either input unset
/// or zero, a non-positive reference, or a result outside the decimal range.
/// The result follows the price rounding
/// rule of [`Decimal::round_price`].
pub fn price_from_percent(reference: Field, percent: Field, direction: Direction) -> Field {
    let (Some(reference), Some(percent)) = (reference.positive(), percent.non_zero()) else {
        return Field::Unset;
    };

    Decimal::from_i64(direction.sign() as i64)
        .checked_mul(percent)
        .and_then(|signed| signed.checked_div(Decimal::hundred()))
        .and_then(|offset| Decimal::one().checked_add(offset))
        .and_then(|factor| reference.checked_mul(factor))
        .map(Decimal::round_price)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(s: &str) -> Field {
        Field::Value(Decimal::from_str_canonical(s).unwrap())
    }

    #[test]
    fn test_long_offset_above_entry() {
        assert_eq!(
            price_from_percent(f("100"), f("10"), Direction::Long).to_string(),
            "110.00"
        );
    }

    #[test]
    fn test_long_negative_offset_below_entry() {
        assert_eq!(
            price_from_percent(f("100"), f("-5"), Direction::Long).to_string(),
            "95.00"
        );
    }

    #[test]
    fn test_short_offset() {
        assert_eq!(
            price_from_percent(f("100"), f("5"), Direction::Short).to_string(),
            "95.00"
        );
    }

    #[test]
    fn test_sub_unit_price_keeps_eight_places() {
        assert_eq!(
            price_from_percent(f("0.00012345"), f("3"), Direction::Long).to_string(),
            "0.00012715"
        );
        assert_eq!(
            price_from_percent(f("0.5"), f("10"), Direction::Long).to_string(),
            "0.55"
        );
    }

    #[test]
    fn test_not_computable_inputs() {
        assert_eq!(price_from_percent(Field::Unset, f("5"), Direction::Long), Field::Unset);
        assert_eq!(price_from_percent(f("100"), Field::Unset, Direction::Long), Field::Unset);
        assert_eq!(price_from_percent(f("0"), f("5"), Direction::Long), Field::Unset);
        assert_eq!(price_from_percent(f("100"), f("0"), Direction::Short), Field::Unset);
        assert_eq!(price_from_percent(f("-3"), f("5"), Direction::Short), Field::Unset);
    }
}
