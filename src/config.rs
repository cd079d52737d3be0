//! Run configuration for the batch binaries
//!
//! Read from environment variables, falling back to defaults:
//!   PORTFOLIO_PATH, PAYOFF_OUTPUT_PATH, CASHFLOW_OUTPUT_PATH, AS_OF_DATE

use chrono::{Local, NaiveDate};
use log::debug;
use std::path::PathBuf;

use crate::error::{LoanError, LoanResult};
use crate::loan::loader::DEFAULT_PORTFOLIO_PATH;

pub const DEFAULT_PAYOFF_OUTPUT_PATH: &str = "portfolio_payoffs.csv";
pub const DEFAULT_CASHFLOW_OUTPUT_PATH: &str = "portfolio_cashflows.csv";

/// Settings for a portfolio run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub portfolio_path: PathBuf,
    pub payoff_output_path: PathBuf,
    pub cashflow_output_path: PathBuf,
    /// Date payoff quotes are computed for
    pub as_of_date: NaiveDate,
}

impl RunConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> LoanResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> LoanResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        let as_of_date = match lookup("AS_OF_DATE").filter(|v| !v.trim().is_empty()) {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
                LoanError::invalid("AS_OF_DATE", format!("Expected YYYY-MM-DD, got '{}': {}", raw, e))
            })?,
            None => Local::now().date_naive(),
        };

        let config = Self {
            portfolio_path: path("PORTFOLIO_PATH", DEFAULT_PORTFOLIO_PATH),
            payoff_output_path: path("PAYOFF_OUTPUT_PATH", DEFAULT_PAYOFF_OUTPUT_PATH),
            cashflow_output_path: path("CASHFLOW_OUTPUT_PATH", DEFAULT_CASHFLOW_OUTPUT_PATH),
            as_of_date,
        };
        debug!("Resolved run config: {:?}", config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.portfolio_path, PathBuf::from(DEFAULT_PORTFOLIO_PATH));
        assert_eq!(config.payoff_output_path, PathBuf::from(DEFAULT_PAYOFF_OUTPUT_PATH));
        assert_eq!(config.cashflow_output_path, PathBuf::from(DEFAULT_CASHFLOW_OUTPUT_PATH));
    }

    #[test]
    fn test_overrides() {
        let config = RunConfig::from_lookup(lookup(&[
            ("PORTFOLIO_PATH", "/tmp/loans.csv"),
            ("AS_OF_DATE", "2024-06-30"),
            ("PAYOFF_OUTPUT_PATH", ""),
        ]))
        .unwrap();
        assert_eq!(config.portfolio_path, PathBuf::from("/tmp/loans.csv"));
        assert_eq!(config.as_of_date, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(config.payoff_output_path, PathBuf::from(DEFAULT_PAYOFF_OUTPUT_PATH));
    }

    #[test]
    fn test_bad_date_rejected() {
        let err = RunConfig::from_lookup(lookup(&[("AS_OF_DATE", "06/30/2024")])).unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { ref field, .. } if field == "AS_OF_DATE"));
    }
}
