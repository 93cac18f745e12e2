//! Plan quota checks run before a trade is persisted.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanLimitError {
    #[error("Trade limit reached: {used} of {max} trades used")]
    TradeQuotaExceeded { used: i64, max: i64 },
    #[error("Plan check unavailable: {0}")]
    Unavailable(String),
}

/// Plan-limit policy.
///
/// Implementations may call out to a billing service, hence async.
#[async_trait]
pub trait PlanLimits: Send + Sync + fmt::Debug {
    /// Ok if one more trade may be stored given `trades_used` existing ones.
    async fn check_trade_quota(&self, trades_used: i64) -> Result<(), PlanLimitError>;
}

/// Fixed quota, `None` meaning unlimited.
#[derive(Debug, Clone, Default)]
pub struct StaticPlanLimits {
    pub max_trades: Option<i64>,
}

impl StaticPlanLimits {
    pub fn new(max_trades: Option<i64>) -> Self {
        Self { max_trades }
    }

    pub fn unlimited() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanLimits for StaticPlanLimits {
    async fn check_trade_quota(&self, trades_used: i64) -> Result<(), PlanLimitError> {
        match self.max_trades {
            Some(max) if trades_used >= max => {
                Err(PlanLimitError::TradeQuotaExceeded { used: trades_used, max })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_never_rejects() {
        let limits = StaticPlanLimits::unlimited();
        assert!(tokio_test::block_on(limits.check_trade_quota(1_000_000)).is_ok());
    }

    #[test]
    fn test_quota_rejects_at_limit() {
        let limits = StaticPlanLimits::new(Some(3));
        assert!(tokio_test::block_on(limits.check_trade_quota(2)).is_ok());
        assert_eq!(
            tokio_test::block_on(limits.check_trade_quota(3)),
            Err(PlanLimitError::TradeQuotaExceeded { used: 3, max: 3 })
        );
    }

    #[test]
    fn test_error_message() {
        let err = PlanLimitError::TradeQuotaExceeded { used: 5, max: 5 };
        assert_eq!(err.to_string(), "Trade limit reached: 5 of 5 trades used");
    }
}
