//! Core schedule engine for monthly loan amortization

use chrono::{Months, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::schedule::{AmortizationSchedule, PaymentScheduleEntry};
use super::state::AmortizationState;
use crate::error::{LoanError, LoanResult};
use crate::money::monthly_rate;

/// Repayment structure of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoanStructure {
    /// Interest each month, full principal at maturity
    InterestOnly,
    /// Level payment that retires the loan over the term
    FullyAmortizing,
    /// Level payment over a longer amortization period, remainder due at term
    Balloon,
}

impl LoanStructure {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStructure::InterestOnly => "interest-only",
            LoanStructure::FullyAmortizing => "fully-amortizing",
            LoanStructure::Balloon => "balloon",
        }
    }
}

impl fmt::Display for LoanStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStructure {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interest-only" => Ok(LoanStructure::InterestOnly),
            "fully-amortizing" => Ok(LoanStructure::FullyAmortizing),
            "balloon" => Ok(LoanStructure::Balloon),
            other => Err(LoanError::invalid(
                "structure",
                format!("Unknown loan structure: {}", other),
            )),
        }
    }
}

/// Configuration for a schedule run
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub structure: LoanStructure,

    /// Amortization period for balloon loans; defaults to the term
    pub balloon_months: Option<u32>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            structure: LoanStructure::FullyAmortizing,
            balloon_months: None,
        }
    }
}

/// Main amortization engine
pub struct AmortizationEngine {
    config: ScheduleConfig,
}

impl AmortizationEngine {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    /// Generate the full payment schedule for one loan
    pub fn generate(
        &self,
        loan_amount: f64,
        annual_interest_rate: f64,
        term_months: u32,
        origination_date: NaiveDate,
    ) -> LoanResult<AmortizationSchedule> {
        validate_loan_inputs(loan_amount, annual_interest_rate, term_months)?;

        let rate = monthly_rate(annual_interest_rate);
        let amortization_months = self.amortization_months(term_months)?;
        let payment = match self.config.structure {
            LoanStructure::InterestOnly => loan_amount * rate,
            LoanStructure::FullyAmortizing | LoanStructure::Balloon => {
                level_payment(loan_amount, rate, amortization_months)
            }
        };
        if !payment.is_finite() {
            return Err(LoanError::invalid(
                "payment",
                format!(
                    "Monthly payment on {} at {}% over {} months is not a finite amount",
                    loan_amount, annual_interest_rate, amortization_months
                ),
            ));
        }

        debug!(
            "Generating {} schedule: amount={:.2} rate={}% term={} amortization={} payment={:.6}",
            self.config.structure,
            loan_amount,
            annual_interest_rate,
            term_months,
            amortization_months,
            payment,
        );

        let mut result = AmortizationSchedule::new(loan_amount);
        let mut state = AmortizationState::new(loan_amount);

        for _month in 1..=term_months {
            state.advance_month();
            let is_final = state.payment_number == term_months;
            let payment_date = add_months(origination_date, state.payment_number)?;

            let row = self.calculate_month(&mut state, rate, payment, is_final, payment_date);
            result.add_row(row);
        }

        result.total_interest = state.cumulative_interest;
        result.final_payment = result
            .schedule
            .last()
            .map(|r| r.payment_amount)
            .unwrap_or(0.0);
        result.total_payments = match self.config.structure {
            LoanStructure::FullyAmortizing => payment * term_months as f64,
            LoanStructure::InterestOnly => payment * term_months as f64 + loan_amount,
            LoanStructure::Balloon => result.schedule.iter().map(|r| r.payment_amount).sum(),
        };

        Ok(result)
    }

    /// Months over which the level payment is computed
    fn amortization_months(&self, term_months: u32) -> LoanResult<u32> {
        if self.config.structure != LoanStructure::Balloon {
            return Ok(term_months);
        }
        let months = self.config.balloon_months.unwrap_or(term_months);
        if months < term_months {
            return Err(LoanError::invalid(
                "balloon_months",
                format!(
                    "Balloon amortization period ({}) cannot be shorter than the term ({})",
                    months, term_months
                ),
            ));
        }
        Ok(months)
    }

    /// Split one month's payment and advance the balance.
    ///
    /// The balloon row pays the whole remaining balance plus that month's
    /// interest, so `payment_amount == principal + interest` on every row.
    fn calculate_month(
        &self,
        state: &mut AmortizationState,
        rate: f64,
        payment: f64,
        is_final: bool,
        payment_date: NaiveDate,
    ) -> PaymentScheduleEntry {
        let interest = state.period_interest(rate);

        let (principal, payment_amount) = match self.config.structure {
            LoanStructure::FullyAmortizing => (payment - interest, payment),
            LoanStructure::InterestOnly => {
                if is_final {
                    (state.balance, payment + state.balance)
                } else {
                    (0.0, payment)
                }
            }
            LoanStructure::Balloon => {
                let scheduled_principal = payment - interest;
                if is_final {
                    // Whatever the level payment leaves behind comes due now
                    let balloon = state.balance - scheduled_principal;
                    (state.balance, payment + balloon)
                } else {
                    (scheduled_principal, payment)
                }
            }
        };

        state.apply_payment(principal, interest);

        PaymentScheduleEntry {
            payment_number: state.payment_number,
            payment_date,
            payment_amount,
            principal_amount: principal,
            interest_amount: interest,
            remaining_balance: state.reported_balance(),
            cumulative_principal: state.cumulative_principal,
            cumulative_interest: state.cumulative_interest,
        }
    }
}

/// Generate an amortization schedule for a loan
///
/// # Arguments
/// * `loan_amount` - Original principal, must be positive
/// * `annual_interest_rate` - Annual percentage (e.g. `6.0` for 6%), zero allowed
/// * `term_months` - Number of monthly payments, at least 1
/// * `origination_date` - Payment `k` falls `k` calendar months after this date
/// * `structure` - Repayment structure
/// * `balloon_months` - Amortization period for balloon loans (defaults to the term)
pub fn generate_amortization_schedule(
    loan_amount: f64,
    annual_interest_rate: f64,
    term_months: u32,
    origination_date: NaiveDate,
    structure: LoanStructure,
    balloon_months: Option<u32>,
) -> LoanResult<AmortizationSchedule> {
    let engine = AmortizationEngine::new(ScheduleConfig {
        structure,
        balloon_months,
    });
    engine.generate(loan_amount, annual_interest_rate, term_months, origination_date)
}

/// Level monthly payment that retires `principal` over `months` periods.
///
/// Written in discount form so very long periods tend to the interest-only
/// payment instead of overflowing.
pub fn level_payment(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    if monthly_rate == 0.0 {
        return principal / months as f64;
    }
    let discount = (1.0 + monthly_rate).powf(-(months as f64));
    principal * monthly_rate / (1.0 - discount)
}

/// Add calendar months to a date.
///
/// Days past the end of the target month clamp to its last day, so
/// Jan 31 + 1 month is Feb 28 (or 29).
pub fn add_months(date: NaiveDate, months: u32) -> LoanResult<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| LoanError::DateOverflow {
            reason: format!("Adding {} months to {} overflowed", months, date),
        })
}

fn validate_loan_inputs(
    loan_amount: f64,
    annual_interest_rate: f64,
    term_months: u32,
) -> LoanResult<()> {
    if !loan_amount.is_finite() || loan_amount <= 0.0 {
        return Err(LoanError::invalid(
            "loan_amount",
            "Loan amount must be a positive number",
        ));
    }
    if !annual_interest_rate.is_finite() || annual_interest_rate < 0.0 {
        return Err(LoanError::invalid(
            "annual_interest_rate",
            "Interest rate cannot be negative",
        ));
    }
    if term_months < 1 {
        return Err(LoanError::invalid(
            "term_months",
            "Term must be at least 1 month",
        ));
    }
    Ok(())
}
