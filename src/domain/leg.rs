//! Order legs and the ordered leg list shared by all four leg arrays.

use crate::domain::{Decimal, Field, LegMode};
use serde::{Deserialize, Serialize};

/// One entry, exit, stop-loss or take-profit line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Leg {
    pub mode: LegMode,
    pub price: Field,
    /// Offset from the average entry price, used when `mode` is `Percent`.
    pub percent: Field,
    /// Share of the trade's notional in percent, within [0, 100].
    pub allocation: Field,
    /// allocation / 100 * total notional. Derived, never authoritative.
    pub quantity: Field,
}

impl Leg {
    /// A blank slot awaiting input.
    pub fn empty(mode: LegMode) -> Self {
        Leg {
            mode,
            ..Leg::default()
        }
    }

    /// The single slot a freshly initialised leg array starts with.
    pub fn seed() -> Self {
        Leg {
            allocation: Field::Value(Decimal::hundred()),
            ..Leg::default()
        }
    }

    pub fn priced(price: Decimal, allocation: Decimal) -> Self {
        Leg {
            mode: LegMode::Price,
            price: Field::Value(price),
            allocation: Field::Value(allocation),
            ..Leg::default()
        }
    }

    pub fn offset(percent: Decimal, allocation: Decimal) -> Self {
        Leg {
            mode: LegMode::Percent,
            percent: Field::Value(percent),
            allocation: Field::Value(allocation),
            ..Leg::default()
        }
    }

    /// True when price, percent and allocation are all unset.
    pub fn is_empty(&self) -> bool {
        self.price.is_unset() && self.percent.is_unset() && self.allocation.is_unset()
    }

    pub fn has_price(&self) -> bool {
        self.price.positive().is_some()
    }

    /// True when the leg carries something to resolve a price from.
    pub fn has_target(&self) -> bool {
        self.has_price() || self.percent.non_zero().is_some()
    }
}

/// Ordered list of legs.
///
/// All slot growth and shrinkage goes through `append`, `truncate` and
/// `set_at`, so the allocation rules live in one place for every array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegList(Vec<Leg>);

impl LegList {
    pub fn new() -> Self {
        LegList(Vec::new())
    }

    /// A list holding the single seed slot.
    pub fn seeded() -> Self {
        LegList(vec![Leg::seed()])
    }

    pub fn from_legs(legs: Vec<Leg>) -> Self {
        LegList(legs)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Leg> {
        self.0.get(index)
    }

    pub fn last(&self) -> Option<&Leg> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Leg> {
        self.0.iter()
    }

    pub fn is_last(&self, index: usize) -> bool {
        !self.0.is_empty() && index == self.0.len() - 1
    }

    pub fn append(&mut self, leg: Leg) {
        self.0.push(leg);
    }

    pub fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    /// Replace the leg at `index`. Returns false if the index is out of range.
    pub fn set_at(&mut self, index: usize, leg: Leg) -> bool {
        match self.0.get_mut(index) {
            Some(slot) => {
                *slot = leg;
                true
            }
            None => false,
        }
    }

    /// Remove the leg at `index`. Returns the removed leg, if any.
    pub fn remove(&mut self, index: usize) -> Option<Leg> {
        if index < self.0.len() {
            Some(self.0.remove(index))
        } else {
            None
        }
    }

    pub fn total_allocation(&self) -> Decimal {
        self.0.iter().map(|leg| leg.allocation.or_zero()).sum()
    }

    pub fn allocation_excluding(&self, index: usize) -> Decimal {
        self.0
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, leg)| leg.allocation.or_zero())
            .sum()
    }

    /// Legs that carry any input, dropping blank slots.
    pub fn filled(&self) -> Vec<Leg> {
        self.0.iter().filter(|leg| !leg.is_empty()).cloned().collect()
    }

    pub(crate) fn legs_mut(&mut self) -> std::slice::IterMut<'_, Leg> {
        self.0.iter_mut()
    }
}

impl<'a> IntoIterator for &'a LegList {
    type Item = &'a Leg;
    type IntoIter = std::slice::Iter<'a, Leg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
