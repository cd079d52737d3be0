//! Error types for the lending engine

use thiserror::Error;

/// Errors raised by schedule, fee and portfolio calculations
#[derive(Debug, Error)]
pub enum LoanError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Date overflow: {reason}")]
    DateOverflow { reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LoanError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        LoanError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate
pub type LoanResult<T> = Result<T, LoanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = LoanError::invalid("loan_amount", "Loan amount must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid input: loan_amount: Loan amount must be positive"
        );
    }
}
