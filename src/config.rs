use crate::domain::{Decimal, FeeMode};
use crate::engine::DraftDefaults;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub default_leverage: Decimal,
    pub default_fee_mode: FeeMode,
    pub default_fee_value: Decimal,
    /// Trade quota of the plan; `None` means unlimited.
    pub plan_max_trades: Option<i64>,
    pub suggestion_capacity: usize,
    pub currency: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let default_leverage = parse_decimal(&env_map, "DEFAULT_LEVERAGE", "1")?;
        if !default_leverage.is_positive() {
            return Err(ConfigError::InvalidValue(
                "DEFAULT_LEVERAGE".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let default_fee_mode = env_map
            .get("DEFAULT_FEE_MODE")
            .map(|s| s.as_str())
            .unwrap_or("none")
            .parse::<FeeMode>()
            .map_err(|msg| ConfigError::InvalidValue("DEFAULT_FEE_MODE".to_string(), msg))?;

        let default_fee_value = parse_decimal(&env_map, "DEFAULT_FEE_VALUE", "0")?;
        if default_fee_value.is_negative() {
            return Err(ConfigError::InvalidValue(
                "DEFAULT_FEE_VALUE".to_string(),
                "must not be negative".to_string(),
            ));
        }

        let plan_max_trades = match env_map.get("PLAN_MAX_TRADES").map(|s| s.trim()) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i64>().ok().filter(|n| *n >= 0).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "PLAN_MAX_TRADES".to_string(),
                    "must be a non-negative integer".to_string(),
                )
            })?),
        };

        let suggestion_capacity = env_map
            .get("SUGGESTION_CAPACITY")
            .map(|s| s.as_str())
            .unwrap_or("10")
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "SUGGESTION_CAPACITY".to_string(),
                    "must be a valid usize".to_string(),
                )
            })?;

        let currency = env_map
            .get("CURRENCY")
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "USD".to_string());

        Ok(Config {
            port,
            database_path,
            default_leverage,
            default_fee_mode,
            default_fee_value,
            plan_max_trades,
            suggestion_capacity,
            currency,
        })
    }

    /// Starting values for new drafts.
    pub fn draft_defaults(&self) -> DraftDefaults {
        DraftDefaults {
            leverage: self.default_leverage,
            fee_mode: self.default_fee_mode,
            fee_value: self.default_fee_value,
        }
    }
}

fn parse_decimal(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
) -> Result<Decimal, ConfigError> {
    let raw = env_map.get(key).map(|s| s.as_str()).unwrap_or(default);
    Decimal::from_str_canonical(raw)
        .map_err(|_| ConfigError::InvalidValue(key.to_string(), "must be a decimal".to_string()))
}
