use std::path::Path;

use rust_decimal::Decimal;

use crate::config::schema::ProductConfig;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ProductConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<ProductConfig, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: ProductConfig = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let compiled =
        jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
            message: format!("Failed to compile JSON schema: {}", e),
        })?;

    let error_messages: Vec<String> = compiled
        .iter_errors(json_value)
        .map(|e| format!("{} at {}", e, e.instance_path()))
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &ProductConfig) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.loan.annual_interest_rate <= Decimal::ZERO {
        return Err(ConfigError::Validation {
            message: "loan.annualInterestRate must be positive".to_string(),
        });
    }

    if config.loan.min_amount > config.loan.max_amount {
        return Err(ConfigError::Validation {
            message: format!(
                "loan.minAmount ({}) exceeds loan.maxAmount ({})",
                config.loan.min_amount, config.loan.max_amount
            ),
        });
    }

    if config.loan.tenures.is_empty() || config.loan.tenures.iter().any(|&t| t == 0) {
        return Err(ConfigError::Validation {
            message: "loan.tenures must be a non-empty list of positive month counts".to_string(),
        });
    }

    if config.ewa.max_withdrawal > config.ewa.monthly_salary {
        return Err(ConfigError::Validation {
            message: format!(
                "ewa.maxWithdrawal ({}) exceeds ewa.monthlySalary ({})",
                config.ewa.max_withdrawal, config.ewa.monthly_salary
            ),
        });
    }

    // Days past the 28th do not exist in every month.
    if !(1..=28).contains(&config.ewa.repayment_day) {
        return Err(ConfigError::Validation {
            message: format!(
                "ewa.repaymentDay ({}) must be between 1 and 28",
                config.ewa.repayment_day
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_minimal_config_gets_defaults() {
        let config = load_config_from_str(r#"{"version": "1.0"}"#).unwrap();
        assert_eq!(config.loan.annual_interest_rate, dec!(12.5));
        assert_eq!(config.ewa.max_withdrawal, 16000);
        assert_eq!(config.ewa.repayment_day, 25);
        assert_eq!(config.simulation.disbursement_ms, 3000);
    }

    #[test]
    fn test_overrides_apply() {
        let config = load_config_from_str(
            r#"{
                "version": "1.0",
                "loan": {"annualInterestRate": 10.0, "minAmount": 5000},
                "ewa": {"maxWithdrawal": 12000},
                "simulation": {"disbursementMs": 0}
            }"#,
        )
        .unwrap();
        assert_eq!(config.loan.annual_interest_rate, dec!(10.0));
        assert_eq!(config.loan.min_amount, 5000);
        assert_eq!(config.ewa.max_withdrawal, 12000);
        assert_eq!(config.simulation.disbursement_ms, 0);
        // Untouched fields keep defaults.
        assert_eq!(config.loan.max_amount, 500_000);
    }

    #[test]
    fn test_missing_version_fails_schema() {
        let err = load_config_from_str(r#"{"loan": {}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaValidation { .. }));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let err = load_config_from_str(r#"{"version": "2.0"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_inverted_amount_bounds_rejected() {
        let err = load_config_from_str(
            r#"{"version": "1.0", "loan": {"minAmount": 100000, "maxAmount": 50000}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_withdrawal_above_salary_rejected() {
        let err = load_config_from_str(
            r#"{"version": "1.0", "ewa": {"maxWithdrawal": 60000, "monthlySalary": 50000}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = load_config_from_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::ParseJson(_)));
    }
}
