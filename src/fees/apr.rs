//! Effective annual rate of borrowing

use serde::{Deserialize, Serialize};

use super::irr::LoanCashflows;
use crate::error::{LoanError, LoanResult};
use crate::money::round_cents;

/// Input for the simplified APR
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AprRequest {
    pub loan_amount: f64,
    pub total_fees: f64,
    pub total_interest: f64,
    pub term_months: u32,
}

/// Simplified APR as a percentage rounded to 2 decimals.
///
/// Spreads fees and interest evenly over the term:
/// `(fees + interest) / loan / years * 100`. This is a linear approximation,
/// not an IRR; see [`calculate_irr_apr`] for the cashflow-based rate.
pub fn calculate_apr(request: &AprRequest) -> LoanResult<f64> {
    if !request.loan_amount.is_finite() || request.loan_amount <= 0.0 {
        return Err(LoanError::invalid(
            "loan_amount",
            "Loan amount must be a positive number",
        ));
    }
    if request.term_months < 1 {
        return Err(LoanError::invalid(
            "term_months",
            "Term must be at least 1 month",
        ));
    }

    let years = request.term_months as f64 / 12.0;
    let cost = request.total_fees + request.total_interest;
    Ok(round_cents(cost / request.loan_amount / years * 100.0))
}

/// APR from the borrower's actual cashflows.
///
/// The borrower receives `loan_amount - total_fees` at closing and pays
/// `payments` monthly thereafter. Returns the nominal annual rate
/// (monthly IRR x 12) as a percentage rounded to 2 decimals, or `None`
/// when no rate solves the cashflows.
pub fn calculate_irr_apr(loan_amount: f64, total_fees: f64, payments: &[f64]) -> Option<f64> {
    LoanCashflows::new(loan_amount - total_fees, payments)
        .nominal_annual_irr()
        .map(|annual| round_cents(annual * 100.0))
}
