//! Domain primitives: Direction, TradeStatus, FeeMode, LegMode, LegKind.

use serde::{Deserialize, Serialize};

/// Trade direction: Long or Short.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Long,
    Short,
}

impl Direction {
    /// Signed multiplier for this direction (+1 for Long, -1 for Short).
    pub fn sign(&self) -> i32 {
        match self {
            Direction::Long => 1,
            Direction::Short => -1,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

/// Lifecycle status of a trade being logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    /// Position still open: entries plus planned stop-losses and take-profits.
    #[default]
    Running,
    /// Position closed through explicit exit legs.
    Closed,
    /// Closed trade logged by its PnL alone, without legs.
    Quick,
}

impl TradeStatus {
    /// Whether this status uses the given leg array.
    pub fn uses(&self, kind: LegKind) -> bool {
        match self {
            TradeStatus::Running => kind != LegKind::Exits,
            TradeStatus::Closed => true,
            TradeStatus::Quick => false,
        }
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeStatus::Running => write!(f, "running"),
            TradeStatus::Closed => write!(f, "closed"),
            TradeStatus::Quick => write!(f, "quick"),
        }
    }
}

/// How the fee value of a trade is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeMode {
    /// Percentage of the notional, charged on entry and on exit.
    Percent,
    /// Flat amount in account currency, charged on entry and on exit.
    Currency,
    #[default]
    None,
}

impl std::str::FromStr for FeeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percent" => Ok(FeeMode::Percent),
            "currency" => Ok(FeeMode::Currency),
            "none" => Ok(FeeMode::None),
            other => Err(format!("must be percent, currency, or none, got {}", other)),
        }
    }
}

/// Whether a leg is expressed as an absolute price or a percent offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegMode {
    #[default]
    Price,
    /// Offset from the average entry price.
    Percent,
}

/// The four leg arrays of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LegKind {
    Entries,
    Exits,
    StopLosses,
    TakeProfits,
}

impl LegKind {
    pub const ALL: [LegKind; 4] = [
        LegKind::Entries,
        LegKind::Exits,
        LegKind::StopLosses,
        LegKind::TakeProfits,
    ];

    /// Entries are always absolute prices; every other array may use offsets.
    pub fn supports_percent(&self) -> bool {
        *self != LegKind::Entries
    }
}

impl std::fmt::Display for LegKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LegKind::Entries => write!(f, "entries"),
            LegKind::Exits => write!(f, "exits"),
            LegKind::StopLosses => write!(f, "stopLosses"),
            LegKind::TakeProfits => write!(f, "takeProfits"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Long.sign(), 1);
        assert_eq!(Direction::Short.sign(), -1);
    }

    #[test]
    fn test_direction_serialization() {
        assert_eq!(serde_json::to_string(&Direction::Long).unwrap(), "\"long\"");
        assert_eq!(serde_json::to_string(&Direction::Short).unwrap(), "\"short\"");
    }

    #[test]
    fn test_status_leg_usage() {
        assert!(TradeStatus::Running.uses(LegKind::Entries));
        assert!(!TradeStatus::Running.uses(LegKind::Exits));
        assert!(TradeStatus::Running.uses(LegKind::StopLosses));
        assert!(TradeStatus::Closed.uses(LegKind::Exits));
        assert!(LegKind::ALL.iter().all(|k| !TradeStatus::Quick.uses(*k)));
    }

    #[test]
    fn test_fee_mode_from_str() {
        assert_eq!("percent".parse::<FeeMode>(), Ok(FeeMode::Percent));
        assert_eq!("none".parse::<FeeMode>(), Ok(FeeMode::None));
        assert!("flat".parse::<FeeMode>().is_err());
    }

    #[test]
    fn test_leg_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&LegKind::StopLosses).unwrap(),
            "\"stopLosses\""
        );
        assert!(!LegKind::Entries.supports_percent());
        assert!(LegKind::TakeProfits.supports_percent());
    }
}
