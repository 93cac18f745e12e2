use crate::domain::{Decimal, Direction, Field, Leg, LegList, LegMode};
use crate::engine::price::price_from_percent;

/// Effective price of a leg: its own price, or the offset resolved against
/// `reference` for percent-mode legs.
pub fn resolve_price(leg: &Leg, reference: Field, direction: Direction) -> Field {
    match leg.mode {
        LegMode::Price => leg.price,
        LegMode::Percent => price_from_percent(reference, leg.percent, direction),
    }
}

/// Allocation-weighted average price over `legs`.
///
/// Legs with a non-positive price or allocation are left out of both sums.
/// Returns `Unset` when no leg qualifies or a sum overflows.
pub fn weighted_average(legs: &LegList, reference: Field, direction: Direction) -> Field {
    let sums = legs
        .iter()
        .filter_map(|leg| {
            let price = resolve_price(leg, reference, direction).positive()?;
            let allocation = leg.allocation.positive()?;
            Some((price, allocation))
        })
        .try_fold((Decimal::zero(), Decimal::zero()), |(w, t), (price, a)| {
            let weighted = w.checked_add(price.checked_mul(a)?)?;
            Some((weighted, t.checked_add(a)?))
        });

    sums.and_then(|(weighted, total)| weighted.checked_div(total))
        .map(Decimal::round_price)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn f(s: &str) -> Field {
        Field::Value(d(s))
    }

    #[test]
    fn test_weighted_entry_average() {
        let legs = LegList::from_legs(vec![
            Leg::priced(d("100"), d("60")),
            Leg::priced(d("110"), d("40")),
        ]);
        let avg = weighted_average(&legs, Field::Unset, Direction::Long);
        assert_eq!(avg.to_string(), "104.00");
    }

    #[test]
    fn test_unqualified_legs_are_excluded_not_zero_weighted() {
        let legs = LegList::from_legs(vec![
            Leg::priced(d("100"), d("50")),
            Leg::priced(d("0"), d("30")),
            Leg::empty(LegMode::Price),
            Leg {
                price: f("500"),
                ..Leg::empty(LegMode::Price)
            },
        ]);
        let avg = weighted_average(&legs, Field::Unset, Direction::Long);
        assert_eq!(avg, f("100"));
    }

    #[test]
    fn test_no_qualifying_leg_is_unset() {
        assert_eq!(
            weighted_average(&LegList::seeded(), Field::Unset, Direction::Long),
            Field::Unset
        );
        assert_eq!(
            weighted_average(&LegList::new(), f("100"), Direction::Short),
            Field::Unset
        );
    }

    #[test]
    fn test_percent_legs_resolve_against_reference() {
        let legs = LegList::from_legs(vec![
            Leg::offset(d("10"), d("50")),
            Leg::priced(d("120"), d("50")),
        ]);
        let avg = weighted_average(&legs, f("100"), Direction::Long);
        assert_eq!(avg.to_string(), "115.00");

        // Without a reference the percent leg drops out entirely.
        let avg = weighted_average(&legs, Field::Unset, Direction::Long);
        assert_eq!(avg.to_string(), "120.00");
    }

    #[test]
    fn test_short_stop_loss_by_percent() {
        let legs = LegList::from_legs(vec![Leg::offset(d("5"), d("100"))]);
        let avg = weighted_average(&legs, f("100"), Direction::Short);
        assert_eq!(avg.to_string(), "95.00");
    }
}
