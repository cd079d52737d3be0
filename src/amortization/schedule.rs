//! Schedule output structures for amortization runs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single row of an amortization table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentScheduleEntry {
    /// 1-based sequence number
    pub payment_number: u32,
    pub payment_date: NaiveDate,

    pub payment_amount: f64,
    pub principal_amount: f64,
    pub interest_amount: f64,

    /// Balance after this payment, floored at 0
    pub remaining_balance: f64,

    pub cumulative_principal: f64,
    pub cumulative_interest: f64,
}

/// Complete amortization result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Payment rows, ordered by payment number
    pub schedule: Vec<PaymentScheduleEntry>,

    /// Sum of all payment amounts
    pub total_payments: f64,

    /// Original loan amount
    pub total_principal: f64,

    /// Sum of the interest components
    pub total_interest: f64,

    /// Amount of the last payment (the balloon for balloon loans)
    pub final_payment: f64,
}

impl AmortizationSchedule {
    pub fn new(loan_amount: f64) -> Self {
        Self {
            schedule: Vec::new(),
            total_payments: 0.0,
            total_principal: loan_amount,
            total_interest: 0.0,
            final_payment: 0.0,
        }
    }

    /// Add a payment row
    pub fn add_row(&mut self, row: PaymentScheduleEntry) {
        self.schedule.push(row);
    }

    pub fn len(&self) -> usize {
        self.schedule.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
    }

    /// Remaining balance once `payment_number` payments have been made.
    ///
    /// `0` returns the original loan amount; anything past the last row
    /// returns 0.
    pub fn balance_after(&self, payment_number: u32) -> f64 {
        if payment_number == 0 {
            return self.total_principal;
        }
        self.schedule
            .get(payment_number as usize - 1)
            .map(|r| r.remaining_balance)
            .unwrap_or(0.0)
    }

    /// Number of payments falling due on or before `date`
    pub fn payments_through(&self, date: NaiveDate) -> u32 {
        self.schedule
            .iter()
            .take_while(|r| r.payment_date <= date)
            .count() as u32
    }

    /// Payment amounts in schedule order
    pub fn payment_amounts(&self) -> Vec<f64> {
        self.schedule.iter().map(|r| r.payment_amount).collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ScheduleSummary {
        let first = self.schedule.first();
        let last = self.schedule.last();

        let interest_to_principal = if self.total_principal > 0.0 {
            self.total_interest / self.total_principal
        } else {
            0.0
        };

        ScheduleSummary {
            payment_count: self.schedule.len() as u32,
            first_payment_date: first.map(|r| r.payment_date),
            last_payment_date: last.map(|r| r.payment_date),
            regular_payment: first.map(|r| r.payment_amount).unwrap_or(0.0),
            final_payment: self.final_payment,
            total_payments: self.total_payments,
            total_principal: self.total_principal,
            total_interest: self.total_interest,
            interest_to_principal,
        }
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub payment_count: u32,
    pub first_payment_date: Option<NaiveDate>,
    pub last_payment_date: Option<NaiveDate>,
    pub regular_payment: f64,
    pub final_payment: f64,
    pub total_payments: f64,
    pub total_principal: f64,
    pub total_interest: f64,
    pub interest_to_principal: f64,
}
