//! Recently used margin amounts, offered back as quick-pick suggestions.

use crate::domain::Decimal;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;

pub const DEFAULT_CAPACITY: usize = 10;

pub trait QuantitySuggestions: Send + Sync + fmt::Debug {
    /// Remember `value` as the most recent quantity.
    fn record(&self, value: Decimal);

    /// Recent quantities, newest first.
    fn recent(&self) -> Vec<Decimal>;
}

/// Keeps the last `capacity` distinct values. Recording a value already
/// present moves it to the front.
#[derive(Debug)]
pub struct InMemoryQuantitySuggestions {
    capacity: usize,
    values: Mutex<VecDeque<Decimal>>,
}

impl InMemoryQuantitySuggestions {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }
}

impl Default for InMemoryQuantitySuggestions {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl QuantitySuggestions for InMemoryQuantitySuggestions {
    fn record(&self, value: Decimal) {
        if self.capacity == 0 || !value.is_positive() {
            return;
        }
        // Every update leaves the deque well formed, so poisoning is harmless.
        let mut values = match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.retain(|existing| *existing != value);
        values.push_front(value);
        values.truncate(self.capacity);
    }

    fn recent(&self) -> Vec<Decimal> {
        let values = match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.iter().copied().collect()
    }
}
