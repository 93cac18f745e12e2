//! Optional numeric form field.
//!
//! A `Field` is either `Unset` or holds a `Decimal`. It replaces the
//! empty-string sentinels of string-typed form inputs, so "zero" and
//! "not entered yet" are never confused.

use crate::domain::Decimal;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Field {
    #[default]
    Unset,
    Value(Decimal),
}

impl Field {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Field::Unset => None,
            Field::Value(v) => Some(*v),
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Field::Value(_))
    }

    pub fn is_unset(&self) -> bool {
        !self.is_set()
    }

    /// The value, if it is strictly greater than zero.
    pub fn positive(&self) -> Option<Decimal> {
        self.value().filter(|v| v.is_positive())
    }

    /// The value, if it is set and not zero.
    pub fn non_zero(&self) -> Option<Decimal> {
        self.value().filter(|v| !v.is_zero())
    }

    pub fn or_zero(&self) -> Decimal {
        self.value().unwrap_or_default()
    }

    pub fn map(self, f: impl FnOnce(Decimal) -> Decimal) -> Field {
        match self {
            Field::Unset => Field::Unset,
            Field::Value(v) => Field::Value(f(v)),
        }
    }
}

impl From<Decimal> for Field {
    fn from(value: Decimal) -> Self {
        Field::Value(value)
    }
}

impl From<Option<Decimal>> for Field {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(Field::Unset, Field::Value)
    }
}

/// Unset displays as the empty string.
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Unset => Ok(()),
            Field::Value(v) => write!(f, "{}", v),
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(Decimal),
            Text(String),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(Field::Unset),
            Some(Raw::Number(v)) => Ok(Field::Value(v)),
            Some(Raw::Text(s)) if s.trim().is_empty() => Ok(Field::Unset),
            Some(Raw::Text(s)) => Decimal::from_str_canonical(&s)
                .map(Field::Value)
                .map_err(|_| de::Error::custom(format!("invalid decimal: {:?}", s))),
        }
    }
}
