//! Payoff quotes and per-diem interest

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::money::{monthly_rate, round_cents};

/// Days in the interest year used for per-diem accrual
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Input for a payoff quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffRequest {
    pub remaining_balance: f64,
    /// Annual percentage (e.g. `10.0` for 10%)
    pub annual_interest_rate: f64,
    pub last_payment_date: NaiveDate,
    pub payoff_date: NaiveDate,
    #[serde(default)]
    pub prepayment_penalty: f64,
}

/// Amount required to retire a loan on a given date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffQuote {
    pub remaining_balance: f64,
    pub accrued_interest: f64,
    pub prepayment_penalty: f64,
    pub total_payoff: f64,
    pub per_diem_interest: f64,
    pub days_since_last_payment: i64,
}

/// Calculate the payoff amount as of `payoff_date`.
///
/// A payoff date before the last payment date yields a negative day count
/// and negative accrued interest; it is passed through, not rejected.
pub fn calculate_payoff_amount(request: &PayoffRequest) -> PayoffQuote {
    let days = request
        .payoff_date
        .signed_duration_since(request.last_payment_date)
        .num_days();

    if days < 0 {
        warn!(
            "Payoff date {} precedes last payment date {}; accrued interest will be negative",
            request.payoff_date, request.last_payment_date
        );
    }

    let per_diem = calculate_per_diem_interest(request.remaining_balance, request.annual_interest_rate);
    let accrued_interest = round_cents(per_diem * days as f64);
    let total_payoff =
        round_cents(request.remaining_balance + accrued_interest + request.prepayment_penalty);

    PayoffQuote {
        remaining_balance: request.remaining_balance,
        accrued_interest,
        prepayment_penalty: request.prepayment_penalty,
        total_payoff,
        per_diem_interest: per_diem,
        days_since_last_payment: days,
    }
}

/// Monthly interest due on an interest-only loan
pub fn calculate_interest_only_payment(loan_amount: f64, annual_interest_rate: f64) -> f64 {
    loan_amount * monthly_rate(annual_interest_rate)
}

/// Daily interest on a 365-day year
pub fn calculate_per_diem_interest(loan_amount: f64, annual_interest_rate: f64) -> f64 {
    loan_amount * annual_interest_rate / 100.0 / DAYS_PER_YEAR
}
