//! Configuration for the background accrual pipeline.

use crate::{env_or_default, env_required, ConfigError, FromEnv};

/// Settings for the accrual scanner and worker pool.
///
/// Loaded from environment variables:
/// - `ACCRUAL_SYSTEM_ADDRESS` (required) - base URL of the external accrual system
/// - `ACCRUAL_INTERVAL` (default `1`) - scan interval in seconds
/// - `ACCRUAL_UPDATERS_COUNT` (default `5`) - number of worker tasks
#[derive(Clone, Debug)]
pub struct AccrualConfig {
    pub system_address: String,
    pub interval_secs: u64,
    pub updaters_count: usize,
}

impl AccrualConfig {
    pub fn new(system_address: impl Into<String>, interval_secs: u64, updaters_count: usize) -> Self {
        Self {
            system_address: system_address.into(),
            interval_secs,
            updaters_count,
        }
    }
}

impl FromEnv for AccrualConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let system_address = env_required("ACCRUAL_SYSTEM_ADDRESS")?;

        let interval_secs = env_or_default("ACCRUAL_INTERVAL", "1")
            .parse::<u64>()
            .map_err(|e| ConfigError::ParseError {
                key: "ACCRUAL_INTERVAL".to_string(),
                details: e.to_string(),
            })?;

        let updaters_count = env_or_default("ACCRUAL_UPDATERS_COUNT", "5")
            .parse::<usize>()
            .map_err(|e| ConfigError::ParseError {
                key: "ACCRUAL_UPDATERS_COUNT".to_string(),
                details: e.to_string(),
            })?;

        if updaters_count == 0 {
            return Err(ConfigError::ParseError {
                key: "ACCRUAL_UPDATERS_COUNT".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            system_address,
            interval_secs,
            updaters_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_uses_defaults() {
        temp_env::with_vars(
            [
                ("ACCRUAL_SYSTEM_ADDRESS", Some("http://localhost:8080")),
                ("ACCRUAL_INTERVAL", None),
                ("ACCRUAL_UPDATERS_COUNT", None),
            ],
            || {
                let config = AccrualConfig::from_env().unwrap();
                assert_eq!(config.system_address, "http://localhost:8080");
                assert_eq!(config.interval_secs, 1);
                assert_eq!(config.updaters_count, 5);
            },
        );
    }

    #[test]
    fn from_env_reads_overrides() {
        temp_env::with_vars(
            [
                ("ACCRUAL_SYSTEM_ADDRESS", Some("http://accrual.internal")),
                ("ACCRUAL_INTERVAL", Some("10")),
                ("ACCRUAL_UPDATERS_COUNT", Some("8")),
            ],
            || {
                let config = AccrualConfig::from_env().unwrap();
                assert_eq!(config.system_address, "http://accrual.internal");
                assert_eq!(config.interval_secs, 10);
                assert_eq!(config.updaters_count, 8);
            },
        );
    }

    #[test]
    fn from_env_missing_address() {
        temp_env::with_var_unset("ACCRUAL_SYSTEM_ADDRESS", || {
            let result = AccrualConfig::from_env();
            assert!(result.is_err());
        });
    }

    #[test]
    fn from_env_rejects_zero_updaters() {
        temp_env::with_vars(
            [
                ("ACCRUAL_SYSTEM_ADDRESS", Some("http://localhost:8080")),
                ("ACCRUAL_UPDATERS_COUNT", Some("0")),
            ],
            || {
                let result = AccrualConfig::from_env();
                assert!(result.is_err());
            },
        );
    }
}
