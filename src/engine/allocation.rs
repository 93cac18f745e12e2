//! Allocation normalization and slot management for a leg list.
//!
//! Invariant: after every commit the allocations of a list sum to at most 100,
//! and an under-allocated list ends in a blank slot for further input. A commit
//! that brings the total up to 100 cuts the list right after the committed leg.

use crate::domain::{Decimal, Field, Leg, LegList, LegMode};

/// Commit `raw` as the allocation of the leg at `index`.
///
/// The value is clamped to what the other legs leave free. Unset or negative
/// input and out-of-range indices leave the list unchanged. Re-committing on a
/// list that was already at 100 never cuts it.
pub fn apply_allocation(legs: &LegList, index: usize, raw: Field) -> LegList {
    let Some(raw) = raw.value().filter(|v| !v.is_negative()) else {
        return legs.clone();
    };
    let Some(current) = legs.get(index) else {
        return legs.clone();
    };

    let previous_total = legs.total_allocation();
    let remaining = Decimal::hundred()
        .checked_sub(legs.allocation_excluding(index))
        .map_or(Decimal::zero(), |free| std::cmp::max(Decimal::zero(), free));
    let allocation = std::cmp::min(raw, remaining);

    let mut next = legs.clone();
    next.set_at(
        index,
        Leg {
            allocation: Field::Value(allocation),
            ..current.clone()
        },
    );

    let completes = previous_total < Decimal::hundred()
        && next.total_allocation() >= Decimal::hundred();
    if completes {
        next.truncate(index + 1);
    }
    ensure_open_slot(&mut next, current.mode);

    next
}

/// Remove the leg at `index`, keeping the list open for input.
///
/// The list never ends up without legs, and an under-allocated list always
/// ends in a blank slot.
pub fn remove_leg(legs: &LegList, index: usize) -> LegList {
    let mut next = legs.clone();
    let Some(removed) = next.remove(index) else {
        return next;
    };

    ensure_open_slot(&mut next, removed.mode);

    next
}

fn ensure_open_slot(legs: &mut LegList, mode: LegMode) {
    let needs_slot = legs.last().map_or(true, |last| !last.is_empty());
    if needs_slot && legs.total_allocation() < Decimal::hundred() {
        legs.append(Leg::empty(mode));
    }
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

    fn allocations(legs: &LegList) -> Vec<Field> {
        legs.iter().map(|leg| leg.allocation).collect()
    }

    #[test]
    fn test_commit_on_last_leg_appends_slot() {
        let legs = LegList::from_legs(vec![Leg::empty(LegMode::Price)]);
        let next = apply_allocation(&legs, 0, f("60"));
        assert_eq!(allocations(&next), vec![f("60"), Field::Unset]);
        assert!(next.last().unwrap().is_empty());
    }

    #[test]
    fn test_overflow_is_clamped_and_truncates() {
        let legs = LegList::from_legs(vec![
            Leg::priced(d("100"), d("80")),
            Leg::empty(LegMode::Price),
        ]);
        let next = apply_allocation(&legs, 1, f("30"));
        assert_eq!(allocations(&next), vec![f("80"), f("20")]);
    }

    #[test]
    fn test_completing_allocation_drops_later_slots() {
        let legs = LegList::from_legs(vec![
            Leg::priced(d("100"), d("50")),
            Leg::empty(LegMode::Price),
        ]);
        let next = apply_allocation(&legs, 0, f("100"));
        assert_eq!(allocations(&next), vec![f("100")]);
    }

    #[test]
    fn test_cut_below_hundred_reopens_a_slot() {
        let legs = LegList::from_legs(vec![
            Leg::priced(d("100"), d("50")),
            Leg::priced(d("105"), d("20")),
            Leg::empty(LegMode::Price),
        ]);
        let next = apply_allocation(&legs, 0, f("80"));
        assert_eq!(allocations(&next), vec![f("80"), Field::Unset]);
        assert!(next.last().unwrap().is_empty());
    }

    #[test]
    fn test_commit_sequence_on_seeded_list_keeps_slot_open() {
        let mut legs = LegList::seeded();
        for (index, value) in [(0, "30"), (1, "50"), (0, "90")] {
            legs = apply_allocation(&legs, index, f(value));
        }
        assert_eq!(legs.total_allocation(), d("50"));
        assert_eq!(allocations(&legs), vec![f("50"), Field::Unset]);
    }

    #[test]
    fn test_recommit_on_full_list_keeps_later_legs() {
        let legs = LegList::from_legs(vec![
            Leg::priced(d("100"), d("60")),
            Leg::priced(d("110"), d("40")),
        ]);
        let same = apply_allocation(&legs, 0, f("60"));
        assert_eq!(same, legs);

        let larger = apply_allocation(&legs, 0, f("75"));
        assert_eq!(allocations(&larger), vec![f("60"), f("40")]);
    }

    #[test]
    fn test_lowering_non_last_leg_of_full_list_reopens_slot() {
        let legs = LegList::from_legs(vec![
            Leg::priced(d("100"), d("60")),
            Leg::priced(d("110"), d("40")),
        ]);
        let next = apply_allocation(&legs, 0, f("50"));
        assert_eq!(allocations(&next), vec![f("50"), f("40"), Field::Unset]);
    }

    #[test]
    fn test_editing_non_last_leg_with_room_does_not_append() {
        let legs = LegList::from_legs(vec![
            Leg::priced(d("100"), d("50")),
            Leg::priced(d("105"), d("20")),
            Leg::empty(LegMode::Price),
        ]);
        let next = apply_allocation(&legs, 0, f("30"));
        assert_eq!(allocations(&next), vec![f("30"), f("20"), Field::Unset]);
    }

    #[test]
    fn test_rejected_inputs_are_noops() {
        let legs = LegList::from_legs(vec![
            Leg::priced(d("100"), d("40")),
            Leg::empty(LegMode::Price),
        ]);
        assert_eq!(apply_allocation(&legs, 1, Field::Unset), legs);
        assert_eq!(apply_allocation(&legs, 1, f("-5")), legs);
        assert_eq!(apply_allocation(&legs, 7, f("10")), legs);
    }

    #[test]
    fn test_appended_slot_inherits_mode() {
        let legs = LegList::from_legs(vec![Leg::offset(d("5"), d("100"))]);
        let next = apply_allocation(&legs, 0, f("50"));
        assert_eq!(next.last().unwrap().mode, LegMode::Percent);
    }

    #[test]
    fn test_remove_leg_reopens_list() {
        let legs = LegList::from_legs(vec![
            Leg::priced(d("100"), d("60")),
            Leg::priced(d("105"), d("40")),
        ]);
        let next = remove_leg(&legs, 1);
        assert_eq!(next.len(), 2);
        assert_eq!(next.total_allocation(), d("60"));
        assert!(next.last().unwrap().is_empty());

        let single = LegList::from_legs(vec![Leg::priced(d("100"), d("100"))]);
        let emptied = remove_leg(&single, 0);
        assert_eq!(emptied.len(), 1);
        assert!(emptied.get(0).unwrap().is_empty());
    }

    #[test]
    fn test_remove_leg_does_not_duplicate_blank_slot() {
        let legs = LegList::from_legs(vec![
            Leg::priced(d("100"), d("30")),
            Leg::priced(d("101"), d("30")),
            Leg::empty(LegMode::Price),
        ]);
        let next = remove_leg(&legs, 0);
        assert_eq!(next.len(), 2);
        assert!(next.last().unwrap().is_empty());
    }
}
