//! Portfolio runner for batch schedules and payoff quotes
//!
//! Every loan is computed independently, so batches run in parallel with
//! no coordination. A loan that fails validation is reported alongside the
//! results instead of aborting the batch.

use chrono::{Datelike, NaiveDate};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::amortization::{calculate_payoff_amount, AmortizationSchedule, PayoffQuote, PayoffRequest};
use crate::error::LoanResult;
use crate::loan::LoanTerms;

/// Payoff position of one loan as of the run date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanPayoff {
    pub loan_id: u32,
    pub borrower: String,
    /// Scheduled payments due on or before the run date
    pub payments_made: u32,
    pub last_payment_date: NaiveDate,
    pub quote: PayoffQuote,
}

/// Schedule generated for one loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSchedule {
    pub loan_id: u32,
    pub schedule: AmortizationSchedule,
}

/// A loan the batch could not compute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanFailure {
    pub loan_id: u32,
    pub reason: String,
}

/// Results of a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRun<T> {
    pub completed: Vec<T>,
    pub failures: Vec<LoanFailure>,
}

/// Scheduled cashflows for one calendar month across the portfolio
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCashflow {
    pub year: i32,
    pub month: u32,
    pub loan_count: u32,
    pub total_payments: f64,
    pub total_principal: f64,
    pub total_interest: f64,
    pub total_remaining_balance: f64,
}

/// Batch runner pinned to a single as-of date
#[derive(Debug, Clone)]
pub struct PortfolioRunner {
    as_of_date: NaiveDate,
}

impl PortfolioRunner {
    pub fn new(as_of_date: NaiveDate) -> Self {
        Self { as_of_date }
    }

    pub fn as_of_date(&self) -> NaiveDate {
        self.as_of_date
    }

    /// Payoff quote for a single loan as of the run date.
    ///
    /// Payments are assumed made as scheduled, so the remaining balance is
    /// read from the schedule and interest accrues from the last due date.
    pub fn payoff_for(&self, loan: &LoanTerms) -> LoanResult<LoanPayoff> {
        let schedule = loan.schedule()?;
        let payments_made = schedule.payments_through(self.as_of_date);

        let last_payment_date = payments_made
            .checked_sub(1)
            .and_then(|i| schedule.schedule.get(i as usize))
            .map(|r| r.payment_date)
            .unwrap_or(loan.origination_date);

        let remaining_balance = schedule.balance_after(payments_made);
        let prepayment_penalty = loan.prepayment_penalty(remaining_balance, payments_made);

        let quote = calculate_payoff_amount(&PayoffRequest {
            remaining_balance,
            annual_interest_rate: loan.annual_interest_rate,
            last_payment_date,
            payoff_date: self.as_of_date,
            prepayment_penalty,
        });

        Ok(LoanPayoff {
            loan_id: loan.loan_id,
            borrower: loan.borrower.clone(),
            payments_made,
            last_payment_date,
            quote,
        })
    }

    /// Payoff quotes for every loan in the portfolio
    pub fn run_payoffs(&self, loans: &[LoanTerms]) -> BatchRun<LoanPayoff> {
        info!("Quoting payoffs for {} loans as of {}", loans.len(), self.as_of_date);
        let results: Vec<_> = loans
            .par_iter()
            .map(|loan| (loan.loan_id, self.payoff_for(loan)))
            .collect();
        collect_batch(results)
    }

    /// Payment schedules for every loan in the portfolio
    pub fn run_schedules(&self, loans: &[LoanTerms]) -> BatchRun<LoanSchedule> {
        info!("Generating schedules for {} loans", loans.len());
        let results: Vec<_> = loans
            .par_iter()
            .map(|loan| {
                let schedule = loan.schedule().map(|schedule| LoanSchedule {
                    loan_id: loan.loan_id,
                    schedule,
                });
                (loan.loan_id, schedule)
            })
            .collect();
        collect_batch(results)
    }
}

fn collect_batch<T>(results: Vec<(u32, LoanResult<T>)>) -> BatchRun<T> {
    let mut completed = Vec::with_capacity(results.len());
    let mut failures = Vec::new();

    for (loan_id, result) in results {
        match result {
            Ok(value) => completed.push(value),
            Err(e) => {
                warn!("Skipping loan {}: {}", loan_id, e);
                failures.push(LoanFailure {
                    loan_id,
                    reason: e.to_string(),
                });
            }
        }
    }

    BatchRun { completed, failures }
}

/// Aggregate scheduled cashflows by calendar month of the payment date
pub fn aggregate_by_month(schedules: &[LoanSchedule]) -> Vec<MonthlyCashflow> {
    let mut months: BTreeMap<(i32, u32), MonthlyCashflow> = BTreeMap::new();

    for loan in schedules {
        for row in &loan.schedule.schedule {
            let key = (row.payment_date.year(), row.payment_date.month());
            let agg = months.entry(key).or_insert_with(|| MonthlyCashflow {
                year: key.0,
                month: key.1,
                ..Default::default()
            });
            agg.loan_count += 1;
            agg.total_payments += row.payment_amount;
            agg.total_principal += row.principal_amount;
            agg.total_interest += row.interest_amount;
            agg.total_remaining_balance += row.remaining_balance;
        }
    }

    months.into_values().collect()
}
